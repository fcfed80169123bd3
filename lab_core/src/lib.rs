//! # lab_core - Construction Materials Test Reports
//!
//! `lab_core` turns raw laboratory observations into derived results and
//! paginated A4 test reports. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Blank, never fail**: a missing or malformed reading yields a blank
//!   derived value, not an error
//! - **Recompute everything**: derived values are always computed from the
//!   measurements, never trusted from storage
//! - **Deterministic layout**: the same record and report date give the same
//!   display list, page for page
//!
//! ## Quick Start
//!
//! ```rust
//! use lab_core::calculations::{compute_area, compute_density};
//! use lab_core::readings::Reading;
//!
//! let area = compute_area(Reading::new(150.0), Reading::new(150.0));
//! assert_eq!(area.display(1), "22500.0");
//!
//! let density = compute_density(
//!     Reading::parse("150"),
//!     Reading::parse("150"),
//!     Reading::parse("150"),
//!     Reading::parse("8.5"),
//! );
//! assert_eq!(density.display(1), "2518.5");
//!
//! // Bad input is blank, not an error
//! assert!(compute_area(Reading::parse("abc"), Reading::new(150.0)).is_blank());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Derived-field calculator and per-test observation sheets
//! - [`layout`] - Cursor-based A4 report layout engine
//! - [`report`] - Report composition from test records
//! - [`pdf`] - Typst-backed PDF rendering
//! - [`profile`] - Laboratory letterhead, terms and signatories
//! - [`file_io`] - Record files with atomic saves and the observation store
//! - [`readings`] - Parse-or-blank numeric readings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod layout;
pub mod pdf;
pub mod profile;
pub mod readings;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{LabError, LabResult};
pub use file_io::{load_record, save_record, JsonDirectorySource, ObservationSource};
pub use layout::ReportDocument;
pub use profile::LabProfile;
pub use readings::Reading;
pub use report::{ReportContext, TestRecord};
