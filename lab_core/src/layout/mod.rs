//! # Report Layout Engine
//!
//! Cursor-based layout of A4 test reports. A [`ReportBuilder`] draws the
//! letterhead, stacks [`Section`]s down the page, breaks pages when a section
//! no longer fits, and finishes with the end-of-report marker and numbered
//! footers. The result is a [`ReportDocument`]: a deterministic display list
//! that [`crate::pdf`] can turn into Typst source or PDF bytes.
//!
//! ```text
//!  y=8   ┌ logo ┐   COMPANY NAME          ┌ mark ┐   (mark on page 1 only)
//!  y=33  ───────────────────────────── rule ───
//!  y=44  sections, 4 mm rows ...
//!  y=265 X---- END OF REPORT ----X             (last page)
//!  y=271 footer line 1 / y=275 footer line 2
//! ```

pub mod builder;
pub mod cursor;
pub mod frame;
pub mod metrics;
pub mod primitives;
pub mod sections;

pub use builder::{PageFrame, ReportBuilder};
pub use cursor::{Cursor, PageGeometry};
pub use frame::{Accreditation, Footer, Header};
pub use metrics::{wrap_text, FontFace, TextMeasure, TimesMetrics};
pub use primitives::{Anchor, Canvas, Color, DrawOp, Page, ReportDocument, Stroke, TextStyle};
pub use sections::{
    or_na, Column, CustomerBlock, DataTable, Field, KeyValueRow, ResultRow, ResultsTable, RowPair, Section,
    Signatory, SignatureBlock, Spacer, SpecimenRow, SpecimenTable, TermsBlock, NOT_AVAILABLE,
};
