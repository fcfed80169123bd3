//! # PDF Generation Module
//!
//! Renders a laid-out [`ReportDocument`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - Every draw operation becomes an absolutely placed Typst element, so the
//!   positions decided by the layout engine are kept exactly
//! - Text is passed as Typst string literals, never as markup
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use lab_core::pdf::render_pdf;
//! use lab_core::profile::LabProfile;
//! use lab_core::report::{compose_cube_report, ReportContext, TestRecord};
//!
//! let document = compose_cube_report(&TestRecord::default(), &LabProfile::default(), &ReportContext::today());
//! let pdf_bytes = render_pdf(&document).unwrap();
//! std::fs::write("Test_Report_unknown.pdf", pdf_bytes).unwrap();
//! ```

use std::fmt::Write as _;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{LabError, LabResult};
use crate::layout::{Anchor, Color, DrawOp, FontFace, ReportDocument, Stroke, TextStyle};

/// Serif face bundled with typst-assets
const REPORT_FONT: &str = "Libertinus Serif";

// ============================================================================
// Typst World Implementation
// ============================================================================

static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Display list to Typst
// ============================================================================

/// Typst source for a laid-out document.
///
/// The output depends only on the document, so equal documents produce
/// byte-identical sources.
pub fn to_typst_source(document: &ReportDocument) -> String {
    let mut source = String::new();
    let _ = writeln!(source, "#set document(title: \"{}\")", escape_string(&document.title));
    let _ = writeln!(
        source,
        "#set page(width: {}mm, height: {}mm, margin: 0mm)",
        mm(document.width_mm),
        mm(document.height_mm)
    );
    let _ = writeln!(
        source,
        "#set text(font: \"{}\", top-edge: \"baseline\", bottom-edge: \"baseline\")",
        REPORT_FONT
    );

    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            source.push_str("#pagebreak()\n");
        }
        let _ = writeln!(source, "// page {}", page.number);
        for op in &page.ops {
            source.push_str(&place(op));
            source.push('\n');
        }
    }
    source
}

/// Compile a document to PDF bytes.
pub fn render_pdf(document: &ReportDocument) -> LabResult<Vec<u8>> {
    let world = PdfWorld::new(to_typst_source(document));
    let warned = typst::compile(&world);

    let compiled = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        LabError::render_failed("typst compile", error_msgs.join("; "))
    })?;

    let pdf_bytes = typst_pdf::pdf(&compiled, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        LabError::render_failed("pdf export", error_msgs.join("; "))
    })?;

    debug!(pages = document.page_count(), bytes = pdf_bytes.len(), "rendered pdf");
    Ok(pdf_bytes)
}

fn place(op: &DrawOp) -> String {
    match op {
        DrawOp::Rect { x, y, width, height, fill, stroke } => format!(
            "#place(top + left, dx: {}mm, dy: {}mm, rect(width: {}mm, height: {}mm, fill: {}, stroke: {}))",
            mm(*x),
            mm(*y),
            mm(*width),
            mm(*height),
            fill.map(rgb).unwrap_or_else(|| "none".to_string()),
            stroke.map(stroke_spec).unwrap_or_else(|| "none".to_string()),
        ),
        DrawOp::Line { x1, y1, x2, y2, stroke } => format!(
            "#place(top + left, line(start: ({}mm, {}mm), end: ({}mm, {}mm), stroke: {}))",
            mm(*x1),
            mm(*y1),
            mm(*x2),
            mm(*y2),
            stroke_spec(*stroke),
        ),
        DrawOp::Text { x, y, anchor, width, text, style } => {
            let run = text_run(text, style);
            match anchor {
                Anchor::Left => format!("#place(top + left, dx: {}mm, dy: {}mm, {})", mm(*x), mm(*y), run),
                // Aligned inside a slack box so the PDF font's own advance decides the edge
                Anchor::Center => {
                    let boxed = width + 40.0;
                    format!(
                        "#place(top + left, dx: {}mm, dy: {}mm, box(width: {}mm, align(center, {})))",
                        mm(x - boxed / 2.0),
                        mm(*y),
                        mm(boxed),
                        run
                    )
                }
                Anchor::Right => {
                    let boxed = width + 20.0;
                    format!(
                        "#place(top + left, dx: {}mm, dy: {}mm, box(width: {}mm, align(right, {})))",
                        mm(x - boxed),
                        mm(*y),
                        mm(boxed),
                        run
                    )
                }
            }
        }
    }
}

fn text_run(text: &str, style: &TextStyle) -> String {
    let weight = match style.face {
        FontFace::Regular => "regular",
        FontFace::Bold => "bold",
    };
    format!(
        "text(size: {}pt, weight: \"{}\", fill: {}, \"{}\")",
        mm(style.size_pt),
        weight,
        rgb(style.color),
        escape_string(text)
    )
}

fn rgb(color: Color) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

fn stroke_spec(stroke: Stroke) -> String {
    format!("{}mm + {}", mm(stroke.width), rgb(stroke.color))
}

/// Fixed three-place formatting keeps the source stable.
fn mm(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

/// Escape text for a Typst string literal.
fn escape_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\\' => "\\\\".to_string(),
            '"' => "\\\"".to_string(),
            '\n' | '\r' | '\t' => " ".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Page, TextStyle};

    fn document() -> ReportDocument {
        let mut first = Page::new(1);
        first.ops.push(DrawOp::Rect {
            x: 10.0,
            y: 44.0,
            width: 45.6,
            height: 4.0,
            fill: Some(Color::LABEL_FILL),
            stroke: Some(Stroke::CELL),
        });
        first.ops.push(DrawOp::Text {
            x: 105.0,
            y: 40.0,
            anchor: Anchor::Center,
            width: 30.0,
            text: "TEST \"REPORT\"".to_string(),
            style: TextStyle::bold(14.0),
        });
        let mut second = Page::new(2);
        second.ops.push(DrawOp::Line {
            x1: 10.0,
            y1: 271.0,
            x2: 200.0,
            y2: 271.0,
            stroke: Stroke::CELL,
        });
        ReportDocument {
            title: "TEST REPORT".to_string(),
            width_mm: 210.0,
            height_mm: 297.0,
            pages: vec![first, second],
        }
    }

    #[test]
    fn test_source_places_ops() {
        let source = to_typst_source(&document());
        assert!(source.contains("#set page(width: 210.000mm, height: 297.000mm, margin: 0mm)"));
        assert!(source.contains(
            "rect(width: 45.600mm, height: 4.000mm, fill: rgb(240, 240, 240), stroke: 0.200mm + rgb(0, 0, 0))"
        ));
        assert!(source.contains("line(start: (10.000mm, 271.000mm), end: (200.000mm, 271.000mm)"));
        // 105 - (30 + 40) / 2
        assert!(source.contains("dx: 70.000mm, dy: 40.000mm, box(width: 70.000mm, align(center,"));
        assert!(source.contains("\"TEST \\\"REPORT\\\"\""));
        assert_eq!(source.matches("#pagebreak()").count(), 1);
    }

    #[test]
    fn test_source_is_deterministic() {
        assert_eq!(to_typst_source(&document()), to_typst_source(&document()));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string(r#"a\b"c"#), r#"a\\b\"c"#);
        assert_eq!(escape_string("X----X # *bold*"), "X----X # *bold*");
        assert_eq!(escape_string("two\nlines"), "two lines");
    }

    #[test]
    fn test_mm_formatting() {
        assert_eq!(mm(4.0), "4.000");
        assert_eq!(mm(-0.0001), "0.000");
        assert_eq!(mm(1.0 / 3.0), "0.333");
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_pdf(&document());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
