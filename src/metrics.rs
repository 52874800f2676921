//! Advance widths for the two built-in PDF fonts the invoice uses.
//!
//! printpdf places built-in font text by its start point only, so centering,
//! right alignment and wrapping need the Helvetica AFM widths (1/1000 em).

/// Helvetica ascender height as a fraction of the font size.
pub const ASCENT: f32 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Rendered width of `text` in points.
pub fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    let table = match weight {
        Weight::Regular => &HELVETICA,
        Weight::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..127).contains(&code) {
                table[(code - 32) as usize] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap so that no line exceeds `max_width` points.
///
/// A single word wider than the limit stays on its own line.
pub fn wrap(text: &str, size: f32, weight: Weight, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, size, weight) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        // "Tax" = 611 + 556 + 500
        assert!((text_width("Tax", 10.0, Weight::Regular) - 16.67).abs() < 0.01);
        assert!(text_width("Tax", 10.0, Weight::Bold) > text_width("Tax", 10.0, Weight::Regular));
        assert_eq!(text_width("", 10.0, Weight::Regular), 0.0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "One Thousand Two Hundred and Fifty Rupees only";
        let lines = wrap(text, 9.0, Weight::Regular, 100.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            assert!(text_width(line, 9.0, Weight::Regular) <= 100.0);
        }
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        assert_eq!(wrap("Rs 250.00", 9.0, Weight::Regular, 100.0), vec!["Rs 250.00"]);
        assert_eq!(wrap("", 9.0, Weight::Regular, 100.0), vec![String::new()]);
    }
}
