//! Paints a [`DocumentLayout`] onto a single printpdf page.

use ::image::{DynamicImage, Rgba, RgbImage};
use chrono::{Local, NaiveDate, NaiveTime};
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::layout::{
    self, Block, DocumentLayout, Frame, Issuer, Rgb8, TextRun, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
};
use crate::metrics::Weight;
use crate::model::{display_number, Invoice};

// ============================================================================
// Constants
// ============================================================================

const PT_TO_MM: f32 = 0.352_777_78;

const PAGE_WIDTH_MM: f32 = PAGE_WIDTH_PT * PT_TO_MM;
const PAGE_HEIGHT_MM: f32 = PAGE_HEIGHT_PT * PT_TO_MM;

/// Border width in points
const LINE_THICKNESS: f32 = 0.8;

// ============================================================================
// Logo
// ============================================================================

/// Where the issuer logo comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    /// Well-known asset path. Missing or unreadable means the monogram badge.
    Default(PathBuf),
    /// File path or http(s) URL given by the user. Must load.
    Explicit(String),
    None,
}

pub fn load_logo(source: &LogoSource) -> Result<Option<DynamicImage>> {
    match source {
        LogoSource::None => Ok(None),
        LogoSource::Default(path) => {
            if !path.exists() {
                debug!(path = %path.display(), "No logo asset, using monogram badge");
                return Ok(None);
            }
            let decoded = std::fs::read(path)
                .map_err(|e| AppError::LogoError(format!("{}: {}", path.display(), e)))
                .and_then(|bytes| decode_logo(&bytes));
            match decoded {
                Ok(img) => Ok(Some(img)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unusable logo asset, using monogram badge");
                    Ok(None)
                }
            }
        }
        LogoSource::Explicit(location) => {
            let image_bytes = if location.starts_with("http://") || location.starts_with("https://") {
                let response = ureq::get(location)
                    .call()
                    .map_err(|e| AppError::LogoError(format!("Failed to fetch URL: {}", e)))?;

                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| AppError::LogoError(format!("Failed to read response: {}", e)))?;
                bytes
            } else {
                std::fs::read(location)
                    .map_err(|e| AppError::LogoError(format!("{}: {}", location, e)))?
            };
            decode_logo(&image_bytes).map(Some)
        }
    }
}

fn decode_logo(bytes: &[u8]) -> Result<DynamicImage> {
    ::image::load_from_memory(bytes)
        .map_err(|e| AppError::LogoError(format!("Failed to decode image: {}", e)))
}

/// File name for a rendered invoice.
pub fn artifact_name(id: &str) -> String {
    format!("invoice-{}.pdf", id)
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders invoices for one issuer. Holds no per-invoice state.
pub struct InvoiceRenderer {
    issuer: Issuer,
    logo: Option<DynamicImage>,
}

impl InvoiceRenderer {
    pub fn new(issuer: Issuer, logo: Option<DynamicImage>) -> Self {
        InvoiceRenderer { issuer, logo }
    }

    /// Render with today's local date stamped on the document.
    pub fn render(&self, invoice: &Invoice, display_id: &str) -> Result<Vec<u8>> {
        self.render_at(invoice, display_id, Local::now().date_naive())
    }

    pub fn render_at(&self, invoice: &Invoice, display_id: &str, date: NaiveDate) -> Result<Vec<u8>> {
        let layout = self.layout(invoice, display_id, date);
        if let Some(overflow) = layout.overflow() {
            warn!(
                invoice = %display_number(display_id),
                overflow_pt = overflow,
                items = invoice.items.len(),
                installments = invoice.emi_details.len(),
                "Invoice content runs past the footer line"
            );
        }

        let bytes = paint(&layout, self.logo.as_ref(), display_id, date)?;
        info!(
            invoice = %display_number(display_id),
            bytes = bytes.len(),
            "Rendered invoice"
        );
        Ok(bytes)
    }

    pub fn layout(&self, invoice: &Invoice, display_id: &str, date: NaiveDate) -> DocumentLayout {
        layout::build(invoice, &self.issuer, display_id, date, self.logo.is_some())
    }
}

// ============================================================================
// PDF Generation
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn paint(
    layout: &DocumentLayout,
    logo: Option<&DynamicImage>,
    display_id: &str,
    date: NaiveDate,
) -> Result<Vec<u8>> {
    let stamp = document_timestamp(date)?;
    let (doc, page1, layer1) = PdfDocument::new(
        format!("Tax Invoice {}", display_number(display_id)),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let doc = doc
        .with_document_id(document_id(display_id))
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp)
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_xmp_metadata: false,
            ..Default::default()
        }));
    let layer = doc.get_page(page1).get_layer(layer1);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfError(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?,
    };

    for section in &layout.sections {
        for block in &section.blocks {
            match block {
                Block::Rect {
                    frame,
                    fill,
                    stroke,
                } => draw_rect(&layer, frame, *fill, *stroke),
                Block::Text(run) => draw_text(&layer, &fonts, run),
                Block::Logo { frame } => {
                    if let Some(img) = logo {
                        embed_logo(&layer, img, frame);
                    }
                }
            }
        }
    }

    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buf));
        doc.save(&mut writer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        writer.flush()?;
    }

    if buf.is_empty() {
        return Err(AppError::PdfError("document serialized to zero bytes".to_string()));
    }
    pin_trailer_id(&buf, display_id)
}

/// Midnight UTC of the invoice date, used for every metadata date.
fn document_timestamp(date: NaiveDate) -> Result<OffsetDateTime> {
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| AppError::PdfError(format!("invalid document date {}: {}", date, e)))
}

/// 32 hex characters derived from the invoice id.
fn document_id(display_id: &str) -> String {
    let mut hash: u128 = 0x6c62_272e_07bb_0142_62b8_2175_6295_c58d;
    for byte in display_id.bytes() {
        hash ^= byte as u128;
        hash = hash.wrapping_mul(0x0000_0000_0100_0000_0000_0000_0000_013b);
    }
    format!("{:032x}", hash)
}

/// printpdf fills the trailer `/ID` with a random instance id on every save.
/// Rewrite it from the invoice id so equal input gives equal bytes.
fn pin_trailer_id(bytes: &[u8], display_id: &str) -> Result<Vec<u8>> {
    let mut doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::PdfError(format!("Failed to reload document: {}", e)))?;

    let id = document_id(display_id).into_bytes();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Literal),
            Object::String(id, StringFormat::Literal),
        ]),
    );

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    Ok(out)
}

fn embed_logo(layer: &PdfLayerReference, logo_image: &DynamicImage, frame: &Frame) {
    // Convert to RGBA first to handle transparency
    let rgba_image = logo_image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();
    if width_px == 0 || height_px == 0 {
        return;
    }

    // Composite against white background
    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, ::image::Rgb([out_r, out_g, out_b]));
    }

    // Fit inside the frame preserving aspect ratio, centered
    let aspect_ratio = width_px as f32 / height_px as f32;
    let (final_width, final_height) = if frame.width / frame.height > aspect_ratio {
        (frame.height * aspect_ratio, frame.height)
    } else {
        (frame.width, frame.width / aspect_ratio)
    };
    let x = frame.x + (frame.width - final_width) / 2.0;
    let top = frame.y + (frame.height - final_height) / 2.0;

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI = pixels / inches
    let dpi = (width_px as f32) / (final_width * PT_TO_MM / 25.4);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pdf_x(x)),
            translate_y: Some(pdf_y(top + final_height)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

// ============================================================================
// Drawing Utilities
// ============================================================================

fn draw_rect(layer: &PdfLayerReference, frame: &Frame, fill: Option<Rgb8>, stroke: Option<Rgb8>) {
    let corners = [
        (frame.x, frame.y),
        (frame.x + frame.width, frame.y),
        (frame.x + frame.width, frame.bottom()),
        (frame.x, frame.bottom()),
    ];
    let points: Vec<(Point, bool)> = corners
        .iter()
        .map(|&(x, y)| (Point::new(pdf_x(x), pdf_y(y)), false))
        .collect();

    if let Some(color) = fill {
        layer.set_fill_color(pdf_color(color));
        layer.add_polygon(Polygon {
            rings: vec![points.clone()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    if let Some(color) = stroke {
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(LINE_THICKNESS);
        layer.add_line(Line {
            points,
            is_closed: true,
        });
    }
}

fn draw_text(layer: &PdfLayerReference, fonts: &Fonts, run: &TextRun) {
    let font = match run.weight {
        Weight::Regular => &fonts.regular,
        Weight::Bold => &fonts.bold,
    };
    layer.set_fill_color(pdf_color(run.color));
    layer.use_text(
        run.text.as_str(),
        run.size,
        pdf_x(run.x),
        pdf_y(run.baseline),
        font,
    );
}

fn pdf_color(color: Rgb8) -> Color {
    let Rgb8(r, g, b) = color;
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Layout x (points from the left edge) to PDF x.
fn pdf_x(x: f32) -> Mm {
    Mm(x * PT_TO_MM)
}

/// Layout y (points from the top edge) to PDF y (from the bottom edge).
fn pdf_y(y: f32) -> Mm {
    Mm((PAGE_HEIGHT_PT - y) * PT_TO_MM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmiInstallment, EmiStatus, LineItem};
    use rust_decimal::Decimal;

    fn renderer(logo: Option<DynamicImage>) -> InvoiceRenderer {
        InvoiceRenderer::new(
            Issuer {
                name: "Webmasterify and It Solution".to_string(),
                phone: "9307324014".to_string(),
                email: "webmasterifyy@gmail.com".to_string(),
                monogram: "WM".to_string(),
            },
            logo,
        )
    }

    fn invoice() -> Invoice {
        Invoice {
            client_name: "Asha Traders".to_string(),
            account_number: "ACC-0042".to_string(),
            items: vec![LineItem {
                item_name: "Website Design".to_string(),
                hsn: None,
                quantity: Decimal::from(2),
                price: Decimal::from(100),
            }],
            total_amount: Decimal::from(200),
            paid_amount: Decimal::from(50),
            remaining_amount: Decimal::from(150),
            emi_details: vec![EmiInstallment {
                amount: Decimal::from(150),
                due_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                status: EmiStatus::Paid,
            }],
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = renderer(None).render(&invoice(), "64f1a2b3c4d5e6f7a8b9c0d1").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_render_with_logo_image() {
        let logo = DynamicImage::ImageRgba8(::image::RgbaImage::from_pixel(
            40,
            20,
            Rgba([10, 20, 200, 128]),
        ));
        let bytes = renderer(Some(logo))
            .render_at(&invoice(), "abc123", NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_invoice() {
        let mut empty = invoice();
        empty.items.clear();
        empty.emi_details.clear();
        let bytes = renderer(None).render(&empty, "x").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_layout_is_stable_for_fixed_date() {
        let r = renderer(None);
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(r.layout(&invoice(), "abc", date), r.layout(&invoice(), "abc", date));
    }

    #[test]
    fn test_same_invoice_and_date_give_identical_bytes() {
        let r = renderer(None);
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let first = r.render_at(&invoice(), "64f1a2b3c4d5e6f7a8b9c0d1", date).unwrap();
        let second = r.render_at(&invoice(), "64f1a2b3c4d5e6f7a8b9c0d1", date).unwrap();
        assert!(first.starts_with(b"%PDF"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_ids_give_different_document_ids() {
        assert_eq!(document_id("abc").len(), 32);
        assert_eq!(document_id("abc"), document_id("abc"));
        assert_ne!(document_id("abc"), document_id("abd"));
    }

    #[test]
    fn test_missing_default_logo_falls_back() {
        let source = LogoSource::Default(PathBuf::from("/nonexistent/assets/logo.png"));
        assert!(load_logo(&source).unwrap().is_none());
    }

    #[test]
    fn test_missing_explicit_logo_is_an_error() {
        let source = LogoSource::Explicit("/nonexistent/assets/logo.png".to_string());
        assert!(matches!(load_logo(&source), Err(AppError::LogoError(_))));
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name("64f1a2b3"), "invoice-64f1a2b3.pdf");
    }
}
