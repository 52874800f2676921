//! Page layout for the tax invoice.
//!
//! [`build`] turns an invoice into a [`DocumentLayout`]: an ordered list of
//! sections, each holding boxes, text runs and image slots at absolute
//! positions. Nothing here touches the PDF library, so the whole layout can be
//! inspected and compared in tests. Coordinates are PDF points measured from
//! the top-left corner of the page, y growing downwards.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::metrics::{self, Weight, ASCENT};
use crate::model::{display_number, EmiInstallment, Invoice, LineItem};
use crate::words::amount_in_words;

// ============================================================================
// Constants
// ============================================================================

/// A4 dimensions in points
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// Top margin
pub const PAGE_MARGIN: f32 = 30.0;

/// Content column
pub const CONTENT_X: f32 = 40.0;
pub const CONTENT_WIDTH: f32 = 515.0;

/// The footer is pinned here whatever comes before it.
pub const FOOTER_Y: f32 = 780.0;

const BANNER_HEIGHT: f32 = 20.0;
const LETTERHEAD_HEIGHT: f32 = 90.0;
const ISSUER_RATIO: f32 = 0.6;
const ISSUER_TEXT_INSET: f32 = 80.0;
const META_TEXT_INSET: f32 = 10.0;
const BILL_TO_HEIGHT: f32 = 60.0;

const LOGO_INSET: f32 = 8.0;
const LOGO_WIDTH: f32 = 65.0;
const LOGO_HEIGHT: f32 = 75.0;
const BADGE_INSET: f32 = 10.0;
const BADGE_WIDTH: f32 = 60.0;
const BADGE_HEIGHT: f32 = 70.0;

/// Minimum height of a table or summary row
pub const ROW_HEIGHT: f32 = 20.0;
const CELL_PADDING: f32 = 5.0;
const TABLE_TEXT_TOP: f32 = 6.0;
const SUMMARY_TEXT_TOP: f32 = 5.0;
const LINE_SPACING: f32 = 1.2;

const SUMMARY_GAP: f32 = 10.0;
const SUMMARY_LABEL_RATIO: f32 = 0.7;

const EMI_GAP: f32 = 15.0;
const EMI_HEADING_HEIGHT: f32 = 15.0;
const EMI_LINE_HEIGHT: f32 = 12.0;
const EMI_INDENT: f32 = 10.0;

const EMPTY_ITEMS_TEXT: &str = "No items listed";
const FOOTER_TEXT: &str = "Thank you for your business! This is a computer generated invoice.";

// ============================================================================
// Styles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const MAIN_COLOR: Rgb8 = Rgb8(0x2d, 0x33, 0x4a);
pub const LIGHT_COLOR: Rgb8 = Rgb8(0xf4, 0xf6, 0xf9);
pub const ACCENT_COLOR: Rgb8 = Rgb8(0x63, 0x66, 0xf1);
pub const BADGE_COLOR: Rgb8 = Rgb8(0xef, 0xf6, 0xff);
pub const MUTED_COLOR: Rgb8 = Rgb8(0x66, 0x66, 0x66);
pub const WARNING_COLOR: Rgb8 = Rgb8(0xff, 0x00, 0x00);

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    size: f32,
    weight: Weight,
    color: Rgb8,
}

const fn style(size: f32, weight: Weight, color: Rgb8) -> TextStyle {
    TextStyle {
        size,
        weight,
        color,
    }
}

const BANNER_STYLE: TextStyle = style(10.0, Weight::Regular, MAIN_COLOR);
const MONOGRAM_STYLE: TextStyle = style(22.0, Weight::Bold, ACCENT_COLOR);
const ISSUER_NAME_STYLE: TextStyle = style(14.0, Weight::Bold, MAIN_COLOR);
const DETAIL_STYLE: TextStyle = style(8.0, Weight::Regular, MAIN_COLOR);
const META_STYLE: TextStyle = style(9.0, Weight::Regular, MAIN_COLOR);
const CLIENT_STYLE: TextStyle = style(10.0, Weight::Bold, MAIN_COLOR);
const ACCOUNT_STYLE: TextStyle = style(8.0, Weight::Regular, MUTED_COLOR);
const TABLE_STYLE: TextStyle = style(8.0, Weight::Regular, MAIN_COLOR);
const SUMMARY_STYLE: TextStyle = style(9.0, Weight::Regular, MAIN_COLOR);
const BALANCE_STYLE: TextStyle = style(9.0, Weight::Regular, WARNING_COLOR);
const EMI_HEADING_STYLE: TextStyle = style(10.0, Weight::Bold, MAIN_COLOR);
const EMI_STYLE: TextStyle = style(8.0, Weight::Regular, MAIN_COLOR);
const FOOTER_STYLE: TextStyle = style(7.0, Weight::Regular, MUTED_COLOR);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One column of the item table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub width: f32,
    pub align: Align,
}

const fn column(label: &'static str, width: f32, align: Align) -> Column {
    Column {
        label,
        width,
        align,
    }
}

pub const ITEM_COLUMNS: [Column; 6] = [
    column("#", 30.0, Align::Left),
    column("Item name", 225.0, Align::Left),
    column("HSN/ SAC", 60.0, Align::Left),
    column("Qty", 40.0, Align::Right),
    column("Price/ Unit(Rs)", 80.0, Align::Right),
    column("Amount(Rs)", 80.0, Align::Right),
];

// ============================================================================
// Layout model
// ============================================================================

/// Axis-aligned box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Frame {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Text placed at its left edge and baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
    pub weight: Weight,
    pub color: Rgb8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Rect {
        frame: Frame,
        fill: Option<Rgb8>,
        stroke: Option<Rgb8>,
    },
    Text(TextRun),
    /// Slot for the issuer logo image
    Logo { frame: Frame },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLine {
    SubTotal,
    Total,
    AmountInWords,
    Received,
    Balance,
}

impl SummaryLine {
    pub fn label(&self) -> &'static str {
        match self {
            SummaryLine::SubTotal => "Sub Total",
            SummaryLine::Total => "Total",
            SummaryLine::AmountInWords => "Invoice Amount in Words",
            SummaryLine::Received => "Received (Paid)",
            SummaryLine::Balance => "Balance (Remaining)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Banner,
    Issuer,
    InvoiceMeta,
    BillTo,
    ItemHeader,
    ItemRow(usize),
    EmptyItems,
    Summary(SummaryLine),
    EmiHeading,
    EmiLine(usize),
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub frame: Frame,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn texts(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Frames of the bordered boxes in this section, left to right.
    pub fn cells(&self) -> Vec<Frame> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Rect { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub sections: Vec<Section>,
    /// Lowest point reached by the flowing content, footer excluded
    pub content_bottom: f32,
}

impl DocumentLayout {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn item_rows(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|section| matches!(section.kind, SectionKind::ItemRow(_)))
    }

    pub fn emi_lines(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|section| matches!(section.kind, SectionKind::EmiLine(_)))
    }

    /// How far the content runs into the footer, if it does.
    pub fn overflow(&self) -> Option<f32> {
        (self.content_bottom > FOOTER_Y).then(|| self.content_bottom - FOOTER_Y)
    }
}

/// Vertical position threaded through the section builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f32,
}

impl LayoutCursor {
    pub fn at(y: f32) -> Self {
        LayoutCursor { y }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn advance(self, dy: f32) -> Self {
        LayoutCursor { y: self.y + dy }
    }
}

/// Issuer details printed in the letterhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Badge text drawn when no logo image is available
    pub monogram: String,
}

// ============================================================================
// Formatting
// ============================================================================

/// Two decimals, halves rounded away from zero.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Quantity without trailing zeros: `2`, `1.5`.
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

// ============================================================================
// Build
// ============================================================================

/// Lay out the complete invoice page.
///
/// `date` is the date stamped on the document; `has_logo` picks between the
/// logo slot and the monogram badge.
pub fn build(
    invoice: &Invoice,
    issuer: &Issuer,
    display_id: &str,
    date: NaiveDate,
    has_logo: bool,
) -> DocumentLayout {
    let mut sections = Vec::new();
    let cursor = LayoutCursor::at(PAGE_MARGIN);

    let (section, cursor) = banner(cursor);
    sections.push(section);

    let (group, cursor) = letterhead(cursor, issuer, display_id, date, has_logo);
    sections.extend(group);

    let (section, cursor) = bill_to(cursor, invoice);
    sections.push(section);

    let (group, cursor) = item_table(cursor, &invoice.items);
    sections.extend(group);

    let (group, cursor) = summary(cursor.advance(SUMMARY_GAP), invoice);
    sections.extend(group);

    let (group, cursor) = emi_schedule(cursor.advance(EMI_GAP), &invoice.emi_details);
    sections.extend(group);

    sections.push(footer());

    DocumentLayout {
        sections,
        content_bottom: cursor.y(),
    }
}

fn banner(cursor: LayoutCursor) -> (Section, LayoutCursor) {
    let frame = Frame::new(CONTENT_X, cursor.y(), CONTENT_WIDTH, BANNER_HEIGHT);
    let blocks = vec![
        Block::Rect {
            frame,
            fill: Some(LIGHT_COLOR),
            stroke: Some(MAIN_COLOR),
        },
        Block::Text(place_text(
            "Tax Invoice",
            frame.x,
            frame.width,
            frame.y + (BANNER_HEIGHT - BANNER_STYLE.size) / 2.0,
            BANNER_STYLE,
            Align::Center,
        )),
    ];
    let section = Section {
        kind: SectionKind::Banner,
        frame,
        blocks,
    };
    (section, cursor.advance(BANNER_HEIGHT))
}

/// Issuer box on the left, invoice number and date on the right.
fn letterhead(
    cursor: LayoutCursor,
    issuer: &Issuer,
    display_id: &str,
    date: NaiveDate,
    has_logo: bool,
) -> (Vec<Section>, LayoutCursor) {
    let issuer_width = CONTENT_WIDTH * ISSUER_RATIO;
    let issuer_frame = Frame::new(CONTENT_X, cursor.y(), issuer_width, LETTERHEAD_HEIGHT);
    let meta_frame = Frame::new(
        CONTENT_X + issuer_width,
        cursor.y(),
        CONTENT_WIDTH - issuer_width,
        LETTERHEAD_HEIGHT,
    );

    let mut issuer_blocks = vec![outline(issuer_frame)];
    if has_logo {
        issuer_blocks.push(Block::Logo {
            frame: Frame::new(
                issuer_frame.x + LOGO_INSET,
                issuer_frame.y + LOGO_INSET,
                LOGO_WIDTH,
                LOGO_HEIGHT,
            ),
        });
    } else {
        issuer_blocks.extend(monogram_badge(issuer_frame, &issuer.monogram));
    }

    let text_x = issuer_frame.x + ISSUER_TEXT_INSET;
    let text_width = issuer_frame.width - ISSUER_TEXT_INSET;
    issuer_blocks.extend([
        Block::Text(place_text(
            &issuer.name,
            text_x,
            text_width,
            issuer_frame.y + 20.0,
            ISSUER_NAME_STYLE,
            Align::Left,
        )),
        Block::Text(place_text(
            &format!("Phone: {}", issuer.phone),
            text_x,
            text_width,
            issuer_frame.y + 45.0,
            DETAIL_STYLE,
            Align::Left,
        )),
        Block::Text(place_text(
            &format!("Email: {}", issuer.email),
            text_x,
            text_width,
            issuer_frame.y + 58.0,
            DETAIL_STYLE,
            Align::Left,
        )),
    ]);

    let meta_x = meta_frame.x + META_TEXT_INSET;
    let meta_width = meta_frame.width - 2.0 * META_TEXT_INSET;
    let meta_blocks = vec![
        outline(meta_frame),
        Block::Text(place_text(
            &format!("Invoice No.: {}", display_number(display_id)),
            meta_x,
            meta_width,
            meta_frame.y + 15.0,
            META_STYLE,
            Align::Left,
        )),
        Block::Text(place_text(
            &format!("Date: {}", format_date(date)),
            meta_x,
            meta_width,
            meta_frame.y + 35.0,
            META_STYLE,
            Align::Left,
        )),
    ];

    let sections = vec![
        Section {
            kind: SectionKind::Issuer,
            frame: issuer_frame,
            blocks: issuer_blocks,
        },
        Section {
            kind: SectionKind::InvoiceMeta,
            frame: meta_frame,
            blocks: meta_blocks,
        },
    ];
    (sections, cursor.advance(LETTERHEAD_HEIGHT))
}

fn monogram_badge(issuer_frame: Frame, monogram: &str) -> [Block; 2] {
    let badge = Frame::new(
        issuer_frame.x + BADGE_INSET,
        issuer_frame.y + BADGE_INSET,
        BADGE_WIDTH,
        BADGE_HEIGHT,
    );
    [
        Block::Rect {
            frame: badge,
            fill: Some(BADGE_COLOR),
            stroke: Some(ACCENT_COLOR),
        },
        Block::Text(place_text(
            monogram,
            badge.x,
            badge.width,
            badge.y + (badge.height - MONOGRAM_STYLE.size) / 2.0,
            MONOGRAM_STYLE,
            Align::Center,
        )),
    ]
}

fn bill_to(cursor: LayoutCursor, invoice: &Invoice) -> (Section, LayoutCursor) {
    let frame = Frame::new(CONTENT_X, cursor.y(), CONTENT_WIDTH, BILL_TO_HEIGHT);
    let x = frame.x + CELL_PADDING;
    let width = frame.width - 2.0 * CELL_PADDING;
    let blocks = vec![
        outline(frame),
        Block::Text(place_text("Bill To:", x, width, frame.y + 5.0, DETAIL_STYLE, Align::Left)),
        Block::Text(place_text(
            &invoice.client_name,
            x,
            width,
            frame.y + 20.0,
            CLIENT_STYLE,
            Align::Left,
        )),
        Block::Text(place_text(
            &format!("Account: {}", invoice.account_number),
            x,
            width,
            frame.y + 38.0,
            ACCOUNT_STYLE,
            Align::Left,
        )),
    ];
    let section = Section {
        kind: SectionKind::BillTo,
        frame,
        blocks,
    };
    (section, cursor.advance(BILL_TO_HEIGHT))
}

fn item_table(cursor: LayoutCursor, items: &[LineItem]) -> (Vec<Section>, LayoutCursor) {
    let mut sections = Vec::with_capacity(items.len().max(1) + 1);

    let header: Vec<Cell> = ITEM_COLUMNS
        .iter()
        .map(|col| Cell::new(col.label, col.width, Align::Center))
        .collect();
    let (section, cursor) = table_row(
        cursor,
        SectionKind::ItemHeader,
        &header,
        TABLE_STYLE,
        Some(LIGHT_COLOR),
        TABLE_TEXT_TOP,
    );
    sections.push(section);

    if items.is_empty() {
        let cells = [Cell::new(EMPTY_ITEMS_TEXT, CONTENT_WIDTH, Align::Left)];
        let (section, cursor) = table_row(
            cursor,
            SectionKind::EmptyItems,
            &cells,
            TABLE_STYLE,
            None,
            TABLE_TEXT_TOP,
        );
        sections.push(section);
        return (sections, cursor);
    }

    let mut cursor = cursor;
    for (idx, item) in items.iter().enumerate() {
        let values = [
            (idx + 1).to_string(),
            item.item_name.clone(),
            item.hsn.clone().unwrap_or_default(),
            format_quantity(item.quantity),
            format_money(item.price),
            format_money(item.amount()),
        ];
        let cells: Vec<Cell> = ITEM_COLUMNS
            .iter()
            .zip(values)
            .map(|(col, value)| Cell::new(value, col.width, col.align))
            .collect();
        let (section, next) = table_row(
            cursor,
            SectionKind::ItemRow(idx),
            &cells,
            TABLE_STYLE,
            None,
            TABLE_TEXT_TOP,
        );
        sections.push(section);
        cursor = next;
    }
    (sections, cursor)
}

fn summary(cursor: LayoutCursor, invoice: &Invoice) -> (Vec<Section>, LayoutCursor) {
    let total = format!("Rs {}", format_money(invoice.total_amount));
    let lines = [
        (SummaryLine::SubTotal, total.clone()),
        (SummaryLine::Total, total),
        (SummaryLine::AmountInWords, amount_in_words(invoice.total_amount)),
        (
            SummaryLine::Received,
            format!("Rs {}", format_money(invoice.paid_amount)),
        ),
        (
            SummaryLine::Balance,
            format!("Rs {}", format_money(invoice.remaining_amount)),
        ),
    ];

    let label_width = CONTENT_WIDTH * SUMMARY_LABEL_RATIO;
    let value_width = CONTENT_WIDTH - label_width;

    let mut sections = Vec::with_capacity(lines.len());
    let mut cursor = cursor;
    for (line, value) in lines {
        let text_style = match line {
            SummaryLine::Balance => BALANCE_STYLE,
            _ => SUMMARY_STYLE,
        };
        let cells = [
            Cell::new(line.label(), label_width, Align::Left),
            Cell::new(value, value_width, Align::Right),
        ];
        let (section, next) = table_row(
            cursor,
            SectionKind::Summary(line),
            &cells,
            text_style,
            None,
            SUMMARY_TEXT_TOP,
        );
        sections.push(section);
        cursor = next;
    }
    (sections, cursor)
}

fn emi_schedule(cursor: LayoutCursor, emis: &[EmiInstallment]) -> (Vec<Section>, LayoutCursor) {
    let mut sections = Vec::with_capacity(emis.len() + 1);

    let frame = Frame::new(CONTENT_X, cursor.y(), CONTENT_WIDTH, EMI_HEADING_HEIGHT);
    sections.push(Section {
        kind: SectionKind::EmiHeading,
        frame,
        blocks: vec![Block::Text(place_text(
            "EMI Payment Schedule:",
            frame.x,
            frame.width,
            frame.y,
            EMI_HEADING_STYLE,
            Align::Left,
        ))],
    });
    let mut cursor = cursor.advance(EMI_HEADING_HEIGHT);

    for (idx, emi) in emis.iter().enumerate() {
        let text = format!(
            "{}. Rs {} | Due: {} | Status: {}",
            idx + 1,
            format_money(emi.amount),
            format_date(emi.due_date),
            emi.status.as_str().to_uppercase()
        );
        let frame = Frame::new(
            CONTENT_X + EMI_INDENT,
            cursor.y(),
            CONTENT_WIDTH - EMI_INDENT,
            EMI_LINE_HEIGHT,
        );
        sections.push(Section {
            kind: SectionKind::EmiLine(idx),
            frame,
            blocks: vec![Block::Text(place_text(
                &text,
                frame.x,
                frame.width,
                frame.y,
                EMI_STYLE,
                Align::Left,
            ))],
        });
        cursor = cursor.advance(EMI_LINE_HEIGHT);
    }
    (sections, cursor)
}

fn footer() -> Section {
    let frame = Frame::new(
        CONTENT_X,
        FOOTER_Y,
        CONTENT_WIDTH,
        FOOTER_STYLE.size * LINE_SPACING,
    );
    Section {
        kind: SectionKind::Footer,
        frame,
        blocks: vec![Block::Text(place_text(
            FOOTER_TEXT,
            frame.x,
            frame.width,
            frame.y,
            FOOTER_STYLE,
            Align::Center,
        ))],
    }
}

// ============================================================================
// Helpers
// ============================================================================

struct Cell {
    text: String,
    width: f32,
    align: Align,
}

impl Cell {
    fn new(text: impl Into<String>, width: f32, align: Align) -> Self {
        Cell {
            text: text.into(),
            width,
            align,
        }
    }
}

/// A row of individually bordered cells starting at the left content edge.
///
/// Cell text wraps inside its padding; the row grows by one line height per
/// extra wrapped line.
fn table_row(
    cursor: LayoutCursor,
    kind: SectionKind,
    cells: &[Cell],
    text_style: TextStyle,
    fill: Option<Rgb8>,
    text_top: f32,
) -> (Section, LayoutCursor) {
    let line_height = text_style.size * LINE_SPACING;
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .map(|cell| {
            metrics::wrap(
                &cell.text,
                text_style.size,
                text_style.weight,
                cell.width - 2.0 * CELL_PADDING,
            )
        })
        .collect();
    let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    let height = ROW_HEIGHT + line_count.saturating_sub(1) as f32 * line_height;

    let top = cursor.y();
    let mut blocks = Vec::with_capacity(cells.len() * 2);
    let mut x = CONTENT_X;
    for (cell, lines) in cells.iter().zip(wrapped) {
        blocks.push(Block::Rect {
            frame: Frame::new(x, top, cell.width, height),
            fill,
            stroke: Some(MAIN_COLOR),
        });
        for (line_idx, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            blocks.push(Block::Text(place_text(
                line,
                x + CELL_PADDING,
                cell.width - 2.0 * CELL_PADDING,
                top + text_top + line_idx as f32 * line_height,
                text_style,
                cell.align,
            )));
        }
        x += cell.width;
    }

    let section = Section {
        kind,
        frame: Frame::new(CONTENT_X, top, x - CONTENT_X, height),
        blocks,
    };
    (section, cursor.advance(height))
}

fn outline(frame: Frame) -> Block {
    Block::Rect {
        frame,
        fill: None,
        stroke: Some(MAIN_COLOR),
    }
}

/// Position `text` inside the horizontal span `[left, left + width]` with its
/// top edge at `top`.
fn place_text(
    text: &str,
    left: f32,
    width: f32,
    top: f32,
    text_style: TextStyle,
    align: Align,
) -> TextRun {
    let text_width = metrics::text_width(text, text_style.size, text_style.weight);
    let x = match align {
        Align::Left => left,
        Align::Center => left + (width - text_width) / 2.0,
        Align::Right => left + width - text_width,
    };
    TextRun {
        text: text.to_string(),
        x,
        baseline: top + text_style.size * ASCENT,
        size: text_style.size,
        weight: text_style.weight,
        color: text_style.color,
    }
}
