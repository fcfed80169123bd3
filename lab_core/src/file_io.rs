//! # File I/O Module
//!
//! Test record files and the directory-backed observation store.
//!
//! - **Atomic saves**: write to `.tmp`, sync, verify it parses back, rename
//! - **Version validation**: envelopes carry the schema version they were
//!   written with; incompatible files are rejected
//! - **Bare records**: files exported straight from the laboratory database
//!   (a plain [`TestRecord`] object with no envelope) load as well
//!
//! ## Example
//!
//! ```rust,no_run
//! use lab_core::file_io::{load_record, save_record, JsonDirectorySource, ObservationSource};
//! use lab_core::report::TestRecord;
//! use std::path::Path;
//!
//! let record = TestRecord::default();
//! save_record(&record, Path::new("store/1042.json"))?;
//!
//! let store = JsonDirectorySource::new("store");
//! let fetched = store.fetch(1042)?;
//! assert_eq!(fetched, load_record(Path::new("store/1042.json"))?);
//! # Ok::<(), lab_core::errors::LabError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{LabError, LabResult};
use crate::report::TestRecord;

/// Current schema version for record files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// On-disk wrapper around a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFile {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub record: TestRecord,
}

/// Save a record with atomic write semantics.
///
/// 1. Serialize the record inside a versioned envelope
/// 2. Write to `<path>.tmp` and fsync
/// 3. Read the temp file back and parse it
/// 4. Rename over `path`
pub fn save_record(record: &TestRecord, path: &Path) -> LabResult<()> {
    let envelope = RecordFile {
        version: SCHEMA_VERSION.to_string(),
        saved_at: Utc::now(),
        record: record.clone(),
    };
    let json = serde_json::to_string_pretty(&envelope)?;

    let tmp_path = tmp_path_for(path);
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        LabError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        LabError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        LabError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    if let Err(e) = read_envelope(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LabError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), "saved test record");
    Ok(())
}

/// Load a record file, enveloped or bare.
pub fn load_record(path: &Path) -> LabResult<TestRecord> {
    read_envelope(path).map(|file| file.record)
}

fn read_envelope(path: &Path) -> LabResult<RecordFile> {
    let contents = fs::read_to_string(path)
        .map_err(|e| LabError::file_error("read", path.display().to_string(), e.to_string()))?;

    let value: Value = serde_json::from_str(&contents).map_err(|e| LabError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    let invalid = |e: serde_json::Error| LabError::SerializationError {
        reason: format!("Invalid record in {}: {}", path.display(), e),
    };

    let is_envelope = value.get("version").is_some() && value.get("record").is_some();
    if is_envelope {
        let file: RecordFile = serde_json::from_value(value).map_err(invalid)?;
        validate_version(&file.version)?;
        Ok(file)
    } else {
        let record: TestRecord = serde_json::from_value(value).map_err(invalid)?;
        Ok(RecordFile {
            version: SCHEMA_VERSION.to_string(),
            saved_at: DateTime::<Utc>::UNIX_EPOCH,
            record,
        })
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> LabResult<()> {
    let mismatch = || LabError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        // For 0.x versions a newer minor may carry breaking changes
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

// ============================================================================
// Observation store
// ============================================================================

/// Where test records come from.
pub trait ObservationSource {
    /// Fetch the record for one test request.
    fn fetch(&self, test_request_id: u64) -> LabResult<TestRecord>;
}

/// A directory of `<id>.json` record files.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDirectorySource { root: root.into() }
    }

    pub fn path_for(&self, test_request_id: u64) -> PathBuf {
        self.root.join(format!("{}.json", test_request_id))
    }
}

impl ObservationSource for JsonDirectorySource {
    fn fetch(&self, test_request_id: u64) -> LabResult<TestRecord> {
        let path = self.path_for(test_request_id);
        if !path.is_file() {
            warn!(test_request_id, root = %self.root.display(), "no record in observation store");
            return Err(LabError::record_not_found(test_request_id));
        }
        debug!(test_request_id, path = %path.display(), "fetching record");
        load_record(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record() -> TestRecord {
        let mut record = TestRecord::default();
        record.test_request.job_number = Some("VA-1042".to_string());
        record.main_test.grade = Some("M25".to_string());
        record
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1042.json");

        save_record(&sample_record(), &path).unwrap();
        let loaded = load_record(&path).unwrap();
        assert_eq!(loaded, sample_record());
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1042.json");
        save_record(&sample_record(), &path).unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
        assert_eq!(tmp_path_for(&path), dir.path().join("1042.json.tmp"));
    }

    #[test]
    fn test_bare_record_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("7.json");
        fs::write(&path, r#"{"test_request": {"job_number": 7}}"#).unwrap();
        let record = load_record(&path).unwrap();
        assert_eq!(record.test_request.job_number.as_deref(), Some("7"));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_record(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_newer_envelope_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.json");
        fs::write(
            &path,
            r#"{"version": "0.9.0", "saved_at": "2025-09-05T00:00:00Z", "record": {}}"#,
        )
        .unwrap();
        assert_eq!(load_record(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_directory_source_fetch() {
        let dir = tempdir().unwrap();
        let source = JsonDirectorySource::new(dir.path());
        save_record(&sample_record(), &source.path_for(1042)).unwrap();

        assert_eq!(source.fetch(1042).unwrap(), sample_record());
    }

    #[test]
    fn test_directory_source_missing_record() {
        let dir = tempdir().unwrap();
        let err = JsonDirectorySource::new(dir.path()).fetch(99).unwrap_err();
        assert_eq!(err, LabError::record_not_found(99));
        assert!(err.is_recoverable());
    }
}
