//! Page furniture repeated on every page: the letterhead, the footer lines
//! and the end-of-report marker on the last page.

use serde::{Deserialize, Serialize};

use super::cursor::PageGeometry;
use super::primitives::{Anchor, Canvas, Color, Stroke, TextStyle};

// ============================================================================
// Header
// ============================================================================

/// Accreditation mark printed in the top-right corner of page 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accreditation {
    /// Placeholder text inside the mark box
    pub mark: String,
    /// Certificate number printed under the mark
    pub certificate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub company: String,
    pub subtitle: String,
    pub logo_placeholder: String,
    pub accreditation: Option<Accreditation>,
}

const LOGO: (f64, f64, f64, f64) = (10.0, 8.0, 40.0, 25.0);
const MARK: (f64, f64, f64, f64) = (170.0, 8.0, 25.0, 25.0);
const COMPANY_BASELINE: f64 = 22.0;
const SUBTITLE_BASELINE: f64 = 29.0;
const RULE_Y: f64 = 33.0;
const RULE_START: f64 = 55.0;
/// Rule stops short of the accreditation mark on page 1
const RULE_END_FIRST_PAGE: f64 = 162.0;
const TITLE_BASELINE: f64 = 40.0;
const TITLE_UNDERLINE: f64 = 42.0;

impl Header {
    /// Draw the letterhead for `page` (1-based).
    pub fn draw(&self, page: u32, title: Option<&str>, geometry: &PageGeometry, canvas: &mut Canvas<'_>) {
        let (lx, ly, lw, lh) = LOGO;
        canvas.rect(lx, ly, lw, lh, None, Some(Stroke::new(0.8, Color::LOGO_BORDER)));
        canvas.rect(lx + 1.0, ly + 1.0, lw - 2.0, lh - 2.0, Some(Color::LABEL_FILL), None);
        canvas.text(
            lx + lw / 2.0,
            ly + lh / 2.0,
            &self.logo_placeholder,
            TextStyle::regular(8.0).colored(Color::PLACEHOLDER_TEXT),
            Anchor::Center,
        );

        let first_page = page == 1;
        if let (true, Some(accreditation)) = (first_page, &self.accreditation) {
            let (mx, my, mw, mh) = MARK;
            canvas.rect(mx, my, mw, mh, Some(Color::PLACEHOLDER_FILL), None);
            canvas.text(
                mx + mw / 2.0,
                my + mh / 2.0,
                &accreditation.mark,
                TextStyle::regular(6.0).colored(Color::PLACEHOLDER_TEXT),
                Anchor::Center,
            );
            canvas.text(
                mx + mw / 2.0,
                my + mh + 5.0,
                &accreditation.certificate,
                TextStyle::bold(8.0),
                Anchor::Center,
            );
        }

        let center = geometry.center_x();
        canvas.text(
            center,
            COMPANY_BASELINE,
            &self.company,
            TextStyle::bold(22.0).colored(Color::DARK_RED),
            Anchor::Center,
        );
        canvas.text(
            center,
            SUBTITLE_BASELINE,
            &self.subtitle,
            TextStyle::bold(14.0).colored(Color::BLUE),
            Anchor::Center,
        );

        let rule_end = if first_page { RULE_END_FIRST_PAGE } else { geometry.right() };
        canvas.line(RULE_START, RULE_Y, rule_end, RULE_Y, Stroke::HEAVY);

        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            let width = canvas.text(center, TITLE_BASELINE, title, TextStyle::bold(14.0), Anchor::Center);
            let start = center - width / 2.0;
            canvas.line(start, TITLE_UNDERLINE, start + width, TITLE_UNDERLINE, Stroke::HEAVY);
        }
    }
}

// ============================================================================
// Footer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub address: String,
    pub contact: String,
    /// Controlled document code, bottom left
    pub document_code: String,
    /// Issue number, bottom right
    pub issue: String,
}

const FOOTER_LINE_GAP: f64 = 4.0;

impl Footer {
    pub fn draw(&self, page: u32, total: u32, geometry: &PageGeometry, canvas: &mut Canvas<'_>) {
        let style = TextStyle::regular(8.0);
        let red = style.colored(Color::RED);
        let first = geometry.footer_y;
        let second = first + FOOTER_LINE_GAP;

        canvas.text(geometry.center_x(), first, &self.address, red, Anchor::Center);
        canvas.text(
            geometry.right(),
            first,
            &format!("Page {} of {}", page, total),
            style,
            Anchor::Right,
        );

        canvas.text(geometry.margin, second, &self.document_code, style, Anchor::Left);
        canvas.text(geometry.center_x(), second, &self.contact, red, Anchor::Center);
        canvas.text(geometry.right(), second, &self.issue, style, Anchor::Right);
    }
}

/// Closing line drawn once, on the last page.
pub fn draw_end_of_report(marker: &str, geometry: &PageGeometry, canvas: &mut Canvas<'_>) {
    canvas.text(
        geometry.center_x(),
        geometry.end_marker_y,
        marker,
        TextStyle::bold(10.0),
        Anchor::Center,
    );
}
