//! # Test Records
//!
//! A [`TestRecord`] is everything the report composer needs for one test
//! request: the customer, the request itself, the main test with its
//! specimens, and the reviewer who signed it off.
//!
//! Every field is optional. Text fields accept JSON strings or numbers (job
//! numbers are often stored as integers). Specimens may be given directly or,
//! as older records store them, as a JSON array encoded in
//! `main_test.test_results_json`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::calculations::compression::SpecimenMeasurement;
use crate::calculations::{age_in_days, parse_lab_date};
use crate::layout::{or_na, NOT_AVAILABLE};
use crate::readings::Reading;

/// Accept a string, number or boolean; anything else is absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    #[serde(default, deserialize_with = "text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub site_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub ulr_number: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub job_number: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub receipt_date: Option<String>,
    /// "CC", "MT" or an NDT code
    #[serde(default, deserialize_with = "text")]
    pub test_type: Option<String>,
}

/// What kind of specimen the request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecimenType {
    ConcreteCube,
    MaterialTest,
    NonDestructive,
}

impl SpecimenType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "CC" => SpecimenType::ConcreteCube,
            "MT" => SpecimenType::MaterialTest,
            _ => SpecimenType::NonDestructive,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpecimenType::ConcreteCube => "Concrete Cube",
            SpecimenType::MaterialTest => "Material Test",
            SpecimenType::NonDestructive => "NDT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainTest {
    #[serde(default, deserialize_with = "text")]
    pub sample_code_number: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub location_nature: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub casting_date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub testing_date: Option<String>,
    #[serde(default)]
    pub age_in_days: Reading,
    #[serde(default, deserialize_with = "text")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub cube_condition: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub curing_condition: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub machine_used: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub test_method: Option<String>,
    /// Legacy encoding of the specimen list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results_json: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerInfo {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub graduation: Option<String>,
}

/// One test request as fetched from the observation store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default)]
    pub test_request: TestRequest,
    #[serde(default)]
    pub main_test: MainTest,
    #[serde(default)]
    pub specimens: Vec<SpecimenMeasurement>,
    #[serde(default, alias = "reviewer_info")]
    pub reviewer: Option<ReviewerInfo>,
}

impl TestRecord {
    /// The specimen list, falling back to the legacy JSON string.
    ///
    /// A malformed legacy string is logged and treated as no specimens.
    pub fn specimens(&self) -> Vec<SpecimenMeasurement> {
        if !self.specimens.is_empty() {
            return self.specimens.clone();
        }
        let Some(encoded) = self.main_test.test_results_json.as_deref() else {
            return Vec::new();
        };
        if encoded.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<SpecimenMeasurement>>(encoded) {
            Ok(specimens) => specimens,
            Err(e) => {
                warn!(
                    job = self.test_request.job_number.as_deref().unwrap_or(NOT_AVAILABLE),
                    error = %e,
                    "could not parse test_results_json, rendering without specimens"
                );
                Vec::new()
            }
        }
    }

    pub fn customer_name(&self) -> String {
        or_na(self.customer.name.as_deref().or(self.test_request.customer_name.as_deref()))
    }

    pub fn customer_address(&self) -> String {
        or_na(self.customer.address.as_deref().or(self.test_request.site_name.as_deref()))
    }

    pub fn specimen_type(&self) -> Option<SpecimenType> {
        self.test_request
            .test_type
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .map(SpecimenType::from_code)
    }

    /// Stored age, or the span between casting and testing dates.
    pub fn age_in_days(&self) -> Reading {
        if !self.main_test.age_in_days.is_blank() {
            return self.main_test.age_in_days;
        }
        match (self.main_test.casting_date.as_deref(), self.main_test.testing_date.as_deref()) {
            (Some(casting), Some(testing)) => age_in_days(casting, testing),
            _ => Reading::BLANK,
        }
    }
}

/// Print a record date as dd/mm/yyyy, passing unrecognised text through.
pub fn display_date(text: Option<&str>) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => parse_lab_date(t)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| t.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}
