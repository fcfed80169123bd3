//! # Drawing Primitives
//!
//! The layout engine produces a display list: rectangles, lines and text runs
//! at absolute millimetre coordinates, grouped per page. Nothing here knows
//! about PDF; [`crate::pdf`] turns a finished [`ReportDocument`] into Typst
//! markup and then into PDF bytes.
//!
//! Coordinates are measured from the top-left corner of the page, `y`
//! growing downward. Text `y` is the baseline.

use serde::{Deserialize, Serialize};

use super::metrics::{FontFace, TextMeasure};

// ============================================================================
// Colour and stroke
// ============================================================================

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Color::rgb(level, level, level)
    }

    pub const BLACK: Color = Color::gray(0);
    /// Shaded label cells
    pub const LABEL_FILL: Color = Color::gray(240);
    /// Accreditation mark and stamp placeholders
    pub const PLACEHOLDER_FILL: Color = Color::gray(200);
    pub const PLACEHOLDER_TEXT: Color = Color::gray(100);
    pub const LOGO_BORDER: Color = Color::gray(128);
    /// Value highlight
    pub const HIGHLIGHT: Color = Color::rgb(255, 255, 0);
    /// Laboratory name
    pub const DARK_RED: Color = Color::rgb(180, 0, 0);
    /// Subtitle and signatures
    pub const BLUE: Color = Color::rgb(0, 80, 160);
    /// Footer address and contacts
    pub const RED: Color = Color::rgb(255, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line width in mm
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    /// Table cell borders
    pub const CELL: Stroke = Stroke {
        width: 0.2,
        color: Color::BLACK,
    };

    /// Header rules and logo frame
    pub const HEAVY: Stroke = Stroke {
        width: 0.8,
        color: Color::BLACK,
    };

    pub const fn new(width: f64, color: Color) -> Self {
        Stroke { width, color }
    }
}

// ============================================================================
// Text
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f64,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size_pt: f64) -> Self {
        TextStyle {
            face: FontFace::Regular,
            size_pt,
            color: Color::BLACK,
        }
    }

    pub const fn bold(size_pt: f64) -> Self {
        TextStyle {
            face: FontFace::Bold,
            size_pt,
            color: Color::BLACK,
        }
    }

    pub const fn colored(self, color: Color) -> Self {
        TextStyle { color, ..self }
    }
}

/// Which point of the text run `x` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Left,
    Center,
    Right,
}

// ============================================================================
// Display list
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        anchor: Anchor,
        /// Measured width in mm, used to resolve the anchor
        width: f64,
        text: String,
        style: TextStyle,
    },
}

impl DrawOp {
    /// Left edge of a text run, or the x origin of a shape.
    pub fn left(&self) -> f64 {
        match self {
            DrawOp::Rect { x, .. } => *x,
            DrawOp::Line { x1, x2, .. } => x1.min(*x2),
            DrawOp::Text { x, anchor, width, .. } => match anchor {
                Anchor::Left => *x,
                Anchor::Center => x - width / 2.0,
                Anchor::Right => x - width,
            },
        }
    }
}

/// One printed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based
    pub number: u32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Page {
            number,
            ops: Vec::new(),
        }
    }

    /// All text runs on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A finished, immutable report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// Drawing surface for one page.
pub struct Canvas<'a> {
    ops: &'a mut Vec<DrawOp>,
    metrics: &'a dyn TextMeasure,
}

impl<'a> Canvas<'a> {
    pub fn new(page: &'a mut Page, metrics: &'a dyn TextMeasure) -> Self {
        Canvas {
            ops: &mut page.ops,
            metrics,
        }
    }

    pub fn metrics(&self) -> &dyn TextMeasure {
        self.metrics
    }

    pub fn text_width(&self, text: &str, style: TextStyle) -> f64 {
        self.metrics.text_width(text, style.face, style.size_pt)
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Color>, stroke: Option<Stroke>) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    /// Bordered table cell, optionally shaded
    pub fn cell(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Color>) {
        self.rect(x, y, width, height, fill, Some(Stroke::CELL));
    }

    /// Yellow box behind a value
    pub fn highlight(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.rect(x, y, width, height, Some(Color::HIGHLIGHT), None);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2, stroke });
    }

    /// Draw a text run and return its measured width.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle, anchor: Anchor) -> f64 {
        let width = self.text_width(text, style);
        self.ops.push(DrawOp::Text {
            x,
            y,
            anchor,
            width,
            text: text.to_string(),
            style,
        });
        width
    }
}
