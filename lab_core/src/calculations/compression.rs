//! # Compression Specimens
//!
//! Concrete cubes (IS 516) and AAC blocks (IS 2185) are both tested by
//! crushing a measured, weighed prism. Each specimen yields an area, a density
//! and a compressive strength; a set of replicates yields averages over the
//! specimens that produced a positive value.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "specimens": [
//!     { "id_mark": "C1", "dimension_length": 150, "dimension_width": 150,
//!       "dimension_height": 150, "weight": 8.5, "crushing_load": 562.5 }
//!   ]
//! }
//! ```
//!
//! The legacy field names (`dimension_length`, `crushing_load`) are accepted
//! alongside the short ones.

use serde::{Deserialize, Serialize};

use super::{compute_area, compute_average, compute_compressive_strength, compute_density};
use crate::readings::Reading;

/// Raw measurements for one crushed specimen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecimenMeasurement {
    /// Mark painted on the specimen (e.g. "C1")
    #[serde(default)]
    pub id_mark: String,

    /// Length in mm
    #[serde(default, alias = "dimension_length")]
    pub length: Reading,

    /// Width in mm
    #[serde(default, alias = "dimension_width")]
    pub width: Reading,

    /// Height in mm
    #[serde(default, alias = "dimension_height")]
    pub height: Reading,

    /// Weight in kg
    #[serde(default)]
    pub weight: Reading,

    /// Failure load in kN
    #[serde(default, alias = "crushing_load", alias = "load_max")]
    pub max_load: Reading,

    /// Observed failure pattern, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_type: Option<String>,
}

impl SpecimenMeasurement {
    /// Convenience constructor for fully measured specimens
    pub fn new(id_mark: impl Into<String>, dims_mm: (f64, f64, f64), weight_kg: f64, max_load_kn: f64) -> Self {
        SpecimenMeasurement {
            id_mark: id_mark.into(),
            length: Reading::new(dims_mm.0),
            width: Reading::new(dims_mm.1),
            height: Reading::new(dims_mm.2),
            weight: Reading::new(weight_kg),
            max_load: Reading::new(max_load_kn),
            failure_type: None,
        }
    }

    /// Derive area, density and strength.
    pub fn derive(&self) -> SpecimenResult {
        let area = compute_area(self.length, self.width);
        SpecimenResult {
            id_mark: self.id_mark.clone(),
            area,
            density: compute_density(self.length, self.width, self.height, self.weight),
            strength: compute_compressive_strength(self.max_load, area),
        }
    }
}

/// Derived values for one specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecimenResult {
    pub id_mark: String,
    /// mm²
    pub area: Reading,
    /// kg/m³
    pub density: Reading,
    /// N/mm²
    pub strength: Reading,
}

/// A set of replicate specimens tested together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressionSet {
    #[serde(default)]
    pub specimens: Vec<SpecimenMeasurement>,
}

/// Per-specimen rows plus set averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionSetResult {
    pub rows: Vec<SpecimenResult>,
    pub average_strength: Reading,
    pub average_density: Reading,
    pub average_load: Reading,
}

impl CompressionSet {
    pub fn derive(&self) -> CompressionSetResult {
        derive_set(&self.specimens)
    }
}

/// Derive every specimen and the set averages.
pub fn derive_set(specimens: &[SpecimenMeasurement]) -> CompressionSetResult {
    let rows: Vec<SpecimenResult> = specimens.iter().map(SpecimenMeasurement::derive).collect();

    CompressionSetResult {
        average_strength: compute_average(rows.iter().map(|r| r.strength)),
        average_density: compute_average(rows.iter().map(|r| r.density)),
        average_load: compute_average(specimens.iter().map(|s| s.max_load)),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{DENSITY_PLACES, STRENGTH_PLACES};

    fn cube_set() -> Vec<SpecimenMeasurement> {
        vec![
            SpecimenMeasurement::new("C1", (150.0, 150.0, 150.0), 8.5, 562.5),
            SpecimenMeasurement::new("C2", (150.0, 150.0, 150.0), 8.4, 555.75),
            SpecimenMeasurement::new("C3", (150.0, 150.0, 150.0), 8.6, 569.25),
        ]
    }

    #[test]
    fn test_single_specimen() {
        let result = cube_set()[0].derive();
        assert_eq!(result.area.value(), Some(22_500.0));
        assert_eq!(result.density.display(DENSITY_PLACES), "2518.5");
        assert_eq!(result.strength.value(), Some(25.0));
    }

    #[test]
    fn test_set_average() {
        let result = derive_set(&cube_set());
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[1].strength.display(STRENGTH_PLACES), "24.7");
        assert_eq!(result.rows[2].strength.display(STRENGTH_PLACES), "25.3");
        assert_eq!(result.average_strength.display(STRENGTH_PLACES), "25.0");
    }

    #[test]
    fn test_unmeasured_specimen_excluded_from_average() {
        let mut set = cube_set();
        set[1].max_load = Reading::BLANK;
        let result = derive_set(&set);
        assert!(result.rows[1].strength.is_blank());
        let avg = result.average_strength.value().unwrap();
        assert!((avg - 25.15).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set() {
        let result = derive_set(&[]);
        assert!(result.rows.is_empty());
        assert!(result.average_strength.is_blank());
        assert!(result.average_density.is_blank());
    }

    #[test]
    fn test_legacy_field_names() {
        let json = r#"{
            "cube_id": 1, "id_mark": "C1",
            "dimension_length": "150", "dimension_width": 150, "dimension_height": 150,
            "weight": "8.5", "crushing_load": 562.5, "compressive_strength": 25.0
        }"#;
        let specimen: SpecimenMeasurement = serde_json::from_str(json).unwrap();
        assert_eq!(specimen.length.value(), Some(150.0));
        assert_eq!(specimen.max_load.value(), Some(562.5));
        assert_eq!(specimen.derive().strength.value(), Some(25.0));
    }
}
