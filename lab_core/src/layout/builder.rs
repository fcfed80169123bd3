//! # Report Builder
//!
//! Owns the page list and the [`Cursor`]. Sections are pushed in reading
//! order; each is placed at the cursor and the cursor moves down by the
//! section's declared height. A section that would run past the content
//! bottom starts a new page with the header re-drawn.
//!
//! Footers carry "Page n of N", so they are drawn in [`ReportBuilder::finish`]
//! once the page count is known.

use tracing::{debug, info, warn};

use super::cursor::{Cursor, PageGeometry};
use super::frame::{draw_end_of_report, Footer, Header};
use super::metrics::{TextMeasure, TimesMetrics};
use super::primitives::{Canvas, Page, ReportDocument};
use super::sections::Section;

/// Letterhead, footer and closing marker shared by every report of a lab.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    pub header: Header,
    pub footer: Footer,
    pub end_marker: String,
}

pub struct ReportBuilder<M: TextMeasure = TimesMetrics> {
    frame: PageFrame,
    geometry: PageGeometry,
    metrics: M,
    title: Option<String>,
    finished: Vec<Page>,
    current: Page,
    cursor: Cursor,
}

impl ReportBuilder<TimesMetrics> {
    /// Start page 1 with the given frame and optional underlined title.
    pub fn new(frame: PageFrame, title: Option<&str>) -> Self {
        Self::with_metrics(frame, title, PageGeometry::A4, TimesMetrics)
    }
}

impl<M: TextMeasure> ReportBuilder<M> {
    pub fn with_metrics(frame: PageFrame, title: Option<&str>, geometry: PageGeometry, metrics: M) -> Self {
        let mut builder = ReportBuilder {
            frame,
            geometry,
            metrics,
            title: title.map(str::to_string),
            finished: Vec::new(),
            current: Page::new(1),
            cursor: Cursor::start(geometry.content_top),
        };
        builder.draw_header();
        builder
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn draw_header(&mut self) {
        let page = self.current.number;
        let mut canvas = Canvas::new(&mut self.current, &self.metrics);
        self.frame
            .header
            .draw(page, self.title.as_deref(), &self.geometry, &mut canvas);
    }

    fn page_has_content(&self) -> bool {
        self.cursor.y > self.geometry.content_top
    }

    fn start_page(&mut self) {
        self.cursor.next_page(self.geometry.content_top);
        let next = Page::new(self.cursor.page);
        self.finished.push(std::mem::replace(&mut self.current, next));
        self.draw_header();
        debug!(page = self.cursor.page, "started new page");
    }

    /// Place `section` at the cursor and return where it was placed.
    pub fn push(&mut self, section: &dyn Section) -> Cursor {
        let height = section.height(&self.metrics);
        let bottom = self.geometry.content_bottom;

        if !self.cursor.fits(height, bottom) && self.page_has_content() {
            self.start_page();
        }
        if !self.cursor.fits(height, bottom) {
            warn!(
                section = section.name(),
                height,
                page = self.cursor.page,
                "section taller than the page body, content will overflow"
            );
        }

        let placed = self.cursor;
        let mut canvas = Canvas::new(&mut self.current, &self.metrics);
        section.draw(placed.y, &mut canvas);
        self.cursor.advance(height);

        debug!(
            section = section.name(),
            page = placed.page,
            y = placed.y,
            height,
            "placed section"
        );
        placed
    }

    /// Draw the end-of-report marker and footers, and hand back the document.
    pub fn finish(mut self) -> ReportDocument {
        if self.cursor.y > self.geometry.end_marker_y - self.geometry.row_height {
            warn!(y = self.cursor.y, "content reaches the end-of-report marker");
        }
        {
            let mut canvas = Canvas::new(&mut self.current, &self.metrics);
            draw_end_of_report(&self.frame.end_marker, &self.geometry, &mut canvas);
        }

        let mut pages = self.finished;
        pages.push(self.current);
        let total = pages.len() as u32;
        for page in pages.iter_mut() {
            let number = page.number;
            let mut canvas = Canvas::new(page, &self.metrics);
            self.frame.footer.draw(number, total, &self.geometry, &mut canvas);
        }

        info!(pages = total, "report layout finished");
        ReportDocument {
            title: self.title.unwrap_or_default(),
            width_mm: self.geometry.width,
            height_mm: self.geometry.height,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::frame::Accreditation;
    use crate::layout::primitives::DrawOp;
    use crate::layout::sections::{Field, KeyValueRow, Spacer};

    fn frame() -> PageFrame {
        PageFrame {
            header: Header {
                company: "LAB".to_string(),
                subtitle: "(Testing)".to_string(),
                logo_placeholder: "LOGO".to_string(),
                accreditation: Some(Accreditation {
                    mark: "NABL".to_string(),
                    certificate: "TC-1".to_string(),
                }),
            },
            footer: Footer {
                address: "Address".to_string(),
                contact: "Contact".to_string(),
                document_code: "CODE".to_string(),
                issue: "Issue 1".to_string(),
            },
            end_marker: "END".to_string(),
        }
    }

    fn row(label: &str) -> KeyValueRow {
        KeyValueRow::split(Field::new(label, "value"))
    }

    #[test]
    fn test_sections_stack_without_overlap() {
        let mut builder = ReportBuilder::new(frame(), Some("TEST REPORT"));
        let first = builder.push(&row("a"));
        let second = builder.push(&row("b"));
        assert_eq!(first.y, 44.0);
        assert_eq!(second.y, 48.0);
        assert_eq!(builder.cursor().y, 52.0);
    }

    #[test]
    fn test_single_page_footer_and_marker() {
        let mut builder = ReportBuilder::new(frame(), None);
        builder.push(&row("a"));
        let doc = builder.finish();
        assert_eq!(doc.page_count(), 1);
        let texts: Vec<_> = doc.pages[0].texts().collect();
        assert!(texts.contains(&"Page 1 of 1"));
        assert!(texts.contains(&"END"));
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let mut builder = ReportBuilder::new(frame(), None);
        builder.push(&Spacer(200.0));
        let placed = builder.push(&Spacer(30.0));
        assert_eq!(placed.page, 2);
        assert_eq!(placed.y, 44.0);

        let doc = builder.finish();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].texts().any(|t| t == "Page 1 of 2"));
        assert!(doc.pages[1].texts().any(|t| t == "Page 2 of 2"));
        // accreditation on page 1 only, marker on the last page only
        assert!(doc.pages[0].texts().any(|t| t == "TC-1"));
        assert!(!doc.pages[1].texts().any(|t| t == "TC-1"));
        assert!(!doc.pages[0].texts().any(|t| t == "END"));
        assert!(doc.pages[1].texts().any(|t| t == "END"));
    }

    #[test]
    fn test_oversized_section_on_empty_page_stays() {
        let mut builder = ReportBuilder::new(frame(), None);
        let placed = builder.push(&Spacer(500.0));
        assert_eq!(placed.page, 1);
    }

    #[test]
    fn test_second_page_header_rule_full_width() {
        let mut builder = ReportBuilder::new(frame(), None);
        builder.push(&Spacer(210.0));
        builder.push(&Spacer(20.0));
        let doc = builder.finish();
        let rule_end = |page: &Page| {
            page.ops.iter().find_map(|op| match op {
                DrawOp::Line { y1, x2, .. } if *y1 == 33.0 => Some(*x2),
                _ => None,
            })
        };
        assert_eq!(rule_end(&doc.pages[0]), Some(162.0));
        assert_eq!(rule_end(&doc.pages[1]), Some(200.0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let build = || {
            let mut builder = ReportBuilder::new(frame(), Some("TEST REPORT"));
            builder.push(&row("a"));
            builder.push(&KeyValueRow::full(Field::new("b", "c").highlighted()));
            builder.finish()
        };
        assert_eq!(
            serde_json::to_string(&build()).unwrap(),
            serde_json::to_string(&build()).unwrap()
        );
    }
}
