//! # Readings
//!
//! [`Reading`] is the one parse-or-blank numeric type used for every operator
//! entry in the crate. Observation forms submit numbers as text, leave fields
//! empty, or send `null`; all of those collapse into a `Reading` that either
//! holds a finite `f64` or is blank.
//!
//! Calculators never see raw strings. They ask a reading for its
//! [`value`](Reading::value) or, when a quantity must be physically
//! meaningful, its [`positive`](Reading::positive) value.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::readings::Reading;
//!
//! assert_eq!(Reading::parse(" 8.5 ").value(), Some(8.5));
//! assert_eq!(Reading::parse("abc").value(), None);
//! assert_eq!(Reading::parse("0").positive(), None);
//! assert_eq!(Reading::parse("24.66").display(1), "24.7");
//! ```

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A single measured value that may be blank.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Reading(Option<f64>);

impl Reading {
    /// A blank reading
    pub const BLANK: Reading = Reading(None);

    /// Wrap a number. Non-finite values are blank.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Reading(Some(value))
        } else {
            Reading::BLANK
        }
    }

    /// Parse operator text. Anything that is not a finite decimal number is blank.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(value) => Reading::new(value),
            Err(_) => Reading::BLANK,
        }
    }

    /// The parsed value, if any
    pub fn value(self) -> Option<f64> {
        self.0
    }

    /// The value only when strictly positive
    pub fn positive(self) -> Option<f64> {
        self.0.filter(|v| *v > 0.0)
    }

    pub fn is_blank(self) -> bool {
        self.0.is_none()
    }

    /// Fixed-point text with `places` decimals, empty when blank.
    pub fn display(self, places: usize) -> String {
        self.0.map(|v| format_fixed(v, places)).unwrap_or_default()
    }

    /// Fixed-point text, or `placeholder` when blank.
    pub fn display_or(self, places: usize, placeholder: &str) -> String {
        self.0
            .map(|v| format_fixed(v, places))
            .unwrap_or_else(|| placeholder.to_string())
    }

    /// The value as entered (shortest form, `150` rather than `150.0`),
    /// or `placeholder` when blank.
    pub fn raw_or(self, placeholder: &str) -> String {
        self.0
            .map(|v| v.to_string())
            .unwrap_or_else(|| placeholder.to_string())
    }
}

/// Format `value` with exactly `places` decimals.
///
/// Negative zero prints as `0.0` so blank-adjacent arithmetic never shows `-0.0`.
pub fn format_fixed(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::new(value)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map(Reading::new).unwrap_or(Reading::BLANK)
    }
}

impl From<&str> for Reading {
    fn from(text: &str) -> Self {
        Reading::parse(text)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

struct ReadingVisitor;

impl<'de> Visitor<'de> for ReadingVisitor {
    type Value = Reading;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, an empty string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Reading, E> {
        Ok(Reading::new(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Reading, E> {
        Ok(Reading::new(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Reading, E> {
        Ok(Reading::new(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Reading, E> {
        Ok(Reading::parse(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Reading, E> {
        Ok(Reading::BLANK)
    }

    fn visit_none<E: de::Error>(self) -> Result<Reading, E> {
        Ok(Reading::BLANK)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Reading, E> {
        Ok(Reading::BLANK)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Reading, D::Error> {
        deserializer.deserialize_any(ReadingVisitor)
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ReadingVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Reading::parse("150").value(), Some(150.0));
        assert_eq!(Reading::parse("  25.3\t").value(), Some(25.3));
        assert_eq!(Reading::parse("-4").value(), Some(-4.0));
        assert!(Reading::parse("").is_blank());
        assert!(Reading::parse("12 kg").is_blank());
        assert!(Reading::parse("NaN").is_blank());
        assert!(Reading::parse("inf").is_blank());
    }

    #[test]
    fn test_positive() {
        assert_eq!(Reading::new(3.0).positive(), Some(3.0));
        assert_eq!(Reading::new(0.0).positive(), None);
        assert_eq!(Reading::new(-1.0).positive(), None);
        assert_eq!(Reading::BLANK.positive(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Reading::new(2518.5185).display(1), "2518.5");
        assert_eq!(Reading::BLANK.display(1), "");
        assert_eq!(Reading::BLANK.display_or(1, "N/A"), "N/A");
        assert_eq!(Reading::new(150.0).raw_or("N/A"), "150");
        assert_eq!(Reading::new(8.5).to_string(), "8.5");
    }

    #[test]
    fn test_format_fixed_negative_zero() {
        assert_eq!(format_fixed(-0.0001, 2), "0.00");
        assert_eq!(format_fixed(-1.26, 1), "-1.3");
    }

    #[test]
    fn test_deserialize_mixed_sources() {
        let values: Vec<Reading> =
            serde_json::from_str(r#"[8.5, "8.4", "", null, "x", 7, true]"#).unwrap();
        assert_eq!(values[0].value(), Some(8.5));
        assert_eq!(values[1].value(), Some(8.4));
        assert!(values[2].is_blank());
        assert!(values[3].is_blank());
        assert!(values[4].is_blank());
        assert_eq!(values[5].value(), Some(7.0));
        assert!(values[6].is_blank());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&[Reading::new(1.5), Reading::BLANK]).unwrap();
        assert_eq!(json, "[1.5,null]");
    }

    #[test]
    fn test_missing_field_defaults_blank() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default)]
            weight: Reading,
        }
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.weight.is_blank());
    }
}
