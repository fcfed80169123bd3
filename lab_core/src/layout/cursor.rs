//! Page geometry and the vertical layout cursor.

use serde::{Deserialize, Serialize};

/// Fixed positions on the report page, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Standard table row height
    pub row_height: f64,
    /// First content y below the header
    pub content_top: f64,
    /// Content may not extend past this y
    pub content_bottom: f64,
    /// Baseline of the end-of-report marker
    pub end_marker_y: f64,
    /// Baseline of the first footer line
    pub footer_y: f64,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin: 10.0,
        row_height: 4.0,
        content_top: 44.0,
        content_bottom: 262.0,
        end_marker_y: 265.0,
        footer_y: 271.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::A4
    }
}

/// Current page and y position.
///
/// Within a page `y` only ever moves down; moving back up means starting a
/// new page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// 1-based page number
    pub page: u32,
    pub y: f64,
}

impl Cursor {
    pub fn start(top: f64) -> Self {
        Cursor { page: 1, y: top }
    }

    /// Move down by `dy`. Negative amounts are ignored.
    pub fn advance(&mut self, dy: f64) {
        if dy > 0.0 {
            self.y += dy;
        }
    }

    pub fn next_page(&mut self, top: f64) {
        self.page += 1;
        self.y = top;
    }

    /// Whether a block of `height` fits above `bottom`.
    pub fn fits(&self, height: f64, bottom: f64) -> bool {
        self.y + height <= bottom + 1e-9
    }
}
