//! # Report Composition
//!
//! Turns test records into laid-out [`ReportDocument`]s.
//!
//! - [`record`] - Test record types as stored by the laboratory
//! - [`cube_report`] - Concrete cube compressive strength report
//! - [`sheet_report`] - Single-page observation sheet reports (Atterberg limits, admixture)
//!
//! The report date is passed in through [`ReportContext`] rather than read
//! from the clock, so composing the same record twice yields the same document.
//!
//! [`ReportDocument`]: crate::layout::ReportDocument

pub mod cube_report;
pub mod record;
pub mod sheet_report;

use chrono::NaiveDate;

pub use cube_report::compose_cube_report;
pub use record::{display_date, CustomerInfo, MainTest, ReviewerInfo, SpecimenType, TestRecord, TestRequest};
pub use sheet_report::{compose_sheet_report, SheetInfo, SheetRecord, SheetReport};

/// Inputs to a report that do not come from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub report_date: NaiveDate,
}

impl ReportContext {
    pub fn new(report_date: NaiveDate) -> Self {
        ReportContext { report_date }
    }

    /// Today's date in local time.
    pub fn today() -> Self {
        ReportContext::new(chrono::Local::now().date_naive())
    }

    pub fn report_date_text(&self) -> String {
        self.report_date.format("%d/%m/%Y").to_string()
    }
}

/// Download filename for a record's report: `Test_Report_<job>.pdf`.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`. A record with no job
/// number gets `Test_Report_unknown.pdf`.
pub fn report_filename(record: &TestRecord) -> String {
    let job: String = record
        .test_request
        .job_number
        .as_deref()
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .unwrap_or("unknown")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("Test_Report_{}.pdf", job)
}
