//! # Text Metrics
//!
//! Highlight boxes and wrapped paragraphs are sized from the rendered width of
//! their text, so the layout engine needs advance widths before anything is
//! drawn. [`TimesMetrics`] carries the standard Times-Roman and Times-Bold
//! advance widths (thousandths of an em) for printable ASCII plus the few
//! symbols the reports use.

use serde::{Deserialize, Serialize};

/// Millimetres per typographic point
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Serif face weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
}

/// Anything that can report glyph advance widths.
pub trait TextMeasure {
    /// Advance width of `ch` in thousandths of an em.
    fn advance(&self, ch: char, face: FontFace) -> u16;

    /// Width of `text` in millimetres at `size_pt`.
    fn text_width(&self, text: &str, face: FontFace, size_pt: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c, face))).sum();
        f64::from(units) / 1000.0 * size_pt * MM_PER_PT
    }
}

/// Adobe Times-Roman / Times-Bold widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimesMetrics;

/// Widths for U+0020 ..= U+007E
#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

/// Width used for glyphs outside the table
const FALLBACK_WIDTH: u16 = 500;

impl TextMeasure for TimesMetrics {
    fn advance(&self, ch: char, face: FontFace) -> u16 {
        let bold = face == FontFace::Bold;
        match ch {
            ' '..='~' => {
                let index = ch as usize - 0x20;
                if bold {
                    TIMES_BOLD[index]
                } else {
                    TIMES_ROMAN[index]
                }
            }
            '²' | '³' | '¹' => 300,
            '°' => 400,
            '×' => if bold { 570 } else { 564 },
            'µ' => if bold { 556 } else { 500 },
            '–' => 500,
            '—' => 1000,
            '‘' | '’' => 333,
            '“' | '”' => if bold { 500 } else { 444 },
            '\u{a0}' => 250,
            _ => FALLBACK_WIDTH,
        }
    }
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Words longer than a full line are broken between characters. Whitespace
/// runs collapse to single spaces. Empty input yields no lines.
pub fn wrap_text(
    metrics: &dyn TextMeasure,
    text: &str,
    face: FontFace,
    size_pt: f64,
    max_width: f64,
) -> Vec<String> {
    let fits = |candidate: &str| metrics.text_width(candidate, face, size_pt) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                let mut extended = current.clone();
                extended.push(ch);
                if !current.is_empty() && !fits(&extended) {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = extended;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
