//! # Error Types
//!
//! Structured error types for lab_core.
//!
//! Bad numeric input is *not* an error anywhere in this crate: calculators
//! return blank values and the layout engine prints `N/A`. The variants here
//! cover the collaborators around the core (record files, the observation
//! store, profile files and the Typst compiler).
//!
//! ## Example
//!
//! ```rust
//! use lab_core::errors::{LabError, LabResult};
//!
//! fn require_job(id: u64, job: Option<&str>) -> LabResult<&str> {
//!     job.ok_or_else(|| LabError::record_not_found(id))
//! }
//!
//! assert_eq!(require_job(1042, None).unwrap_err().error_code(), "RECORD_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lab_core operations
pub type LabResult<T> = Result<T, LabError>;

/// Structured error type for lab_core operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LabError {
    /// A non-numeric input is invalid (unknown report kind, bad date, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The observation store has no record for the requested test request
    #[error("Test record not found: {test_request_id}")]
    RecordNotFound { test_request_id: u64 },

    /// Typst compilation or PDF export failed
    #[error("Render failed at {stage}: {reason}")]
    RenderFailed { stage: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Lab profile could not be parsed
    #[error("Config error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },
}

impl LabError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(test_request_id: u64) -> Self {
        LabError::RecordNotFound { test_request_id }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same operation could succeed.
    ///
    /// A missing record may simply not have been entered yet.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LabError::RecordNotFound { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LabError::InvalidInput { .. } => "INVALID_INPUT",
            LabError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            LabError::RenderFailed { .. } => "RENDER_FAILED",
            LabError::FileError { .. } => "FILE_ERROR",
            LabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LabError::VersionMismatch { .. } => "VERSION_MISMATCH",
            LabError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(e: serde_json::Error) -> Self {
        LabError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LabError::render_failed("typst compile", "unknown font family");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"RenderFailed\""));
        let roundtrip: LabError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LabError::invalid_input("sheet", "Sieve", "no layout").error_code(), "INVALID_INPUT");
        assert_eq!(LabError::record_not_found(42).error_code(), "RECORD_NOT_FOUND");
        assert_eq!(LabError::config_error("lab.toml", "bad key").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_recoverable() {
        assert!(LabError::record_not_found(7).is_recoverable());
        assert!(!LabError::render_failed("pdf export", "boom").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = LabError::record_not_found(1201);
        assert_eq!(error.to_string(), "Test record not found: 1201");
    }
}
