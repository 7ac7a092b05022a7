//! Text measurement, word wrapping and column-width balancing.
//!
//! Widths are measured with the metrics of the standard Helvetica faces the
//! PDF writer uses. All lengths are in points unless stated otherwise.

/// Font face used for measuring and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

// Advance widths (1/1000 em) for U+0020..=U+007E.
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

/// Fallback advance for characters outside printable ASCII.
const DEFAULT_ADVANCE: u16 = 556;

/// Advance width of `c` in 1/1000 em.
pub fn char_advance(c: char, face: FontFace) -> u16 {
    let table = match face {
        FontFace::Regular => &HELVETICA,
        FontFace::Bold => &HELVETICA_BOLD,
    };
    match u32::from(c) {
        code @ 0x20..=0x7E => table[(code - 0x20) as usize],
        _ => DEFAULT_ADVANCE,
    }
}

/// Width of `text` at `size` points.
pub fn text_width(text: &str, face: FontFace, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_advance(c, face))).sum();
    f64::from(units) * size / 1000.0
}

/// Wraps `text` into lines no wider than `max_width`.
///
/// Embedded newlines start new lines (blank ones included). Words longer than
/// a whole line are broken between characters.
pub fn wrap_text(text: &str, face: FontFace, size: f64, max_width: f64) -> Vec<String> {
    let space = text_width(" ", face, size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, face, size);
            if !line.is_empty() && line_width + space + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space + word_width;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
            } else {
                let mut pieces = break_word(word, face, size, max_width);
                let last = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                line_width = text_width(&last, face, size);
                line = last;
            }
        }
        lines.push(line);
    }

    lines
}

fn break_word(word: &str, face: FontFace, size: f64, max_width: f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;
    for c in word.chars() {
        let w = f64::from(char_advance(c, face)) * size / 1000.0;
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    pieces.push(piece);
    pieces
}

/// Balances table column widths against the usable page width.
///
/// Each column starts at `longest_chars * char_factor`, is clamped to
/// `[0.5, 2.0]` times the equal split, and the result is scaled so the widths
/// sum to `usable_width`. A non-positive `usable_width` yields zero widths.
///
/// # Example
///
/// ```
/// use chatdoc::core::layout::balance_column_widths;
///
/// let widths = balance_column_widths(&[3, 40, 12], 500.0, 7.0);
/// let total: f64 = widths.iter().sum();
/// assert!((total - 500.0).abs() < 1e-9);
/// assert!(widths.iter().all(|w| *w > 0.0));
/// ```
pub fn balance_column_widths(longest_chars: &[usize], usable_width: f64, char_factor: f64) -> Vec<f64> {
    if longest_chars.is_empty() {
        return Vec::new();
    }
    if !(usable_width.is_finite() && usable_width > 0.0) {
        return vec![0.0; longest_chars.len()];
    }
    let equal = usable_width / longest_chars.len() as f64;
    let raw: Vec<f64> = longest_chars
        .iter()
        .map(|&len| (len as f64 * char_factor).clamp(equal * 0.5, equal * 2.0))
        .collect();
    scale_to_width(&raw, usable_width)
}

/// Scales `widths` proportionally so they sum to `usable_width`.
///
/// Non-positive inputs are treated as equal shares.
pub fn scale_to_width(widths: &[f64], usable_width: f64) -> Vec<f64> {
    let total: f64 = widths.iter().sum();
    if widths.is_empty() || total <= 0.0 || widths.iter().any(|w| *w <= 0.0) {
        let equal = usable_width / widths.len().max(1) as f64;
        return vec![equal; widths.len()];
    }
    let mut scaled: Vec<f64> = widths.iter().map(|w| w * usable_width / total).collect();
    // Absorb floating-point residue in the last column.
    let sum_but_last: f64 = scaled[..scaled.len() - 1].iter().sum();
    if let Some(last) = scaled.last_mut() {
        *last = usable_width - sum_but_last;
    }
    scaled
}
