//! # Derived-Field Calculations
//!
//! Pure functions that turn raw laboratory readings into derived quantities.
//! Every calculation follows the same contract:
//!
//! - inputs are [`Reading`]s (parse-or-blank numbers)
//! - outputs are [`Reading`]s, blank whenever the inputs cannot produce a
//!   meaningful value
//! - nothing panics and nothing returns an error for bad numbers
//!
//! Per-test sheets build on the core helpers in this module:
//!
//! - [`compression`] - concrete cubes and AAC blocks
//! - [`soil`] - moisture, Atterberg limits, compaction, free swell, grain size
//! - [`aggregate`] - bulk density, specific gravity, impact value, sieve analysis
//! - [`cement`] - fineness and soundness
//! - [`admixture`] - liquid admixture relative density
//!
//! [`ObservationSheet`] wraps all of them so a heterogeneous batch of sheets
//! can be stored and derived through one JSON shape, mirroring how the
//! observation forms submit them.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::{compute_area, compute_average, compute_density};
//! use lab_core::readings::Reading;
//!
//! let side = Reading::new(150.0);
//! assert_eq!(compute_area(side, side).value(), Some(22_500.0));
//!
//! let density = compute_density(side, side, side, Reading::new(8.5));
//! assert_eq!(density.display(1), "2518.5");
//!
//! let avg = compute_average([Reading::new(10.0), Reading::new(0.0), Reading::new(20.0)]);
//! assert_eq!(avg.value(), Some(15.0));
//! ```

pub mod admixture;
pub mod aggregate;
pub mod cement;
pub mod compression;
pub mod soil;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::readings::Reading;
use crate::units::{CubicMeters, Kilograms, Kilonewtons, Millimeters, Newtons, SquareMillimeters};

pub use compression::{CompressionSet, CompressionSetResult, SpecimenMeasurement, SpecimenResult};

// ============================================================================
// Display precision
// ============================================================================

/// Decimals used when printing area (mm²)
pub const AREA_PLACES: usize = 1;
/// Decimals used when printing density (kg/m³)
pub const DENSITY_PLACES: usize = 1;
/// Decimals used when printing compressive strength (N/mm²)
pub const STRENGTH_PLACES: usize = 1;
/// Decimals used when printing moisture content (%)
pub const MOISTURE_PLACES: usize = 2;
/// Decimals used when printing relative density
pub const RELATIVE_DENSITY_PLACES: usize = 4;
/// Decimals used when printing aggregate bulk density (kg/L)
pub const BULK_DENSITY_PLACES: usize = 3;

// ============================================================================
// Core operations
// ============================================================================

/// Cross-sectional area `length × width` in mm².
///
/// Blank unless both dimensions are strictly positive.
pub fn compute_area(length: Reading, width: Reading) -> Reading {
    match (length.positive(), width.positive()) {
        (Some(l), Some(w)) => Reading::new(Millimeters(l).by(Millimeters(w)).value()),
        _ => Reading::BLANK,
    }
}

/// Density in kg/m³ of a prism measured in mm and weighed in kg.
///
/// `weight / (length·width·height / 1e9)`. Blank unless all four inputs are
/// strictly positive.
pub fn compute_density(length: Reading, width: Reading, height: Reading, weight: Reading) -> Reading {
    let (Some(l), Some(w), Some(h), Some(kg)) = (
        length.positive(),
        width.positive(),
        height.positive(),
        weight.positive(),
    ) else {
        return Reading::BLANK;
    };

    let volume: CubicMeters = Millimeters(l).by(Millimeters(w)).times(Millimeters(h)).into();
    Reading::new((Kilograms(kg) / volume).value())
}

/// Mean of the strictly positive readings.
///
/// Zero, negative and blank readings are excluded from both the sum and the
/// count. Blank when nothing qualifies.
pub fn compute_average<I>(values: I) -> Reading
where
    I: IntoIterator<Item = Reading>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(Reading::positive)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        Reading::BLANK
    } else {
        Reading::new(sum / count as f64)
    }
}

/// Mean of every non-blank reading, zero and negative included.
///
/// Used for signed results (swell, expansion, moisture) where zero is a real
/// outcome rather than an unfilled cell.
pub fn compute_mean<I>(values: I) -> Reading
where
    I: IntoIterator<Item = Reading>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(Reading::value)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        Reading::BLANK
    } else {
        Reading::new(sum / count as f64)
    }
}

/// Moisture content in percent of dry mass.
///
/// `((wet − dry) × 100) / (dry − container)` where all three are gross
/// weights including the container. Blank when any weight is blank or when the
/// dry soil mass `dry − container` is not strictly positive.
pub fn compute_moisture_content(wet: Reading, dry: Reading, container: Reading) -> Reading {
    let (Some(wet), Some(dry), Some(container)) = (wet.value(), dry.value(), container.value()) else {
        return Reading::BLANK;
    };

    ratio_percent(wet - dry, dry - container)
}

/// Compressive strength in N/mm² from a failure load in kN over an area in mm².
pub fn compute_compressive_strength(max_load_kn: Reading, area_mm2: Reading) -> Reading {
    match (max_load_kn.positive(), area_mm2.positive()) {
        (Some(load), Some(area)) => {
            let stress = Newtons::from(Kilonewtons(load)) / SquareMillimeters(area);
            Reading::new(stress.value())
        }
        _ => Reading::BLANK,
    }
}

/// `numerator × 100 / denominator`, blank unless the denominator is strictly positive.
pub fn ratio_percent(numerator: f64, denominator: f64) -> Reading {
    if denominator > 0.0 {
        Reading::new(numerator * 100.0 / denominator)
    } else {
        Reading::BLANK
    }
}

/// Whole days between casting and testing.
///
/// Accepts ISO `YYYY-MM-DD` or `DD/MM/YYYY`. Blank when either date does not
/// parse or testing precedes casting.
pub fn age_in_days(casting: &str, testing: &str) -> Reading {
    match (parse_lab_date(casting), parse_lab_date(testing)) {
        (Some(cast), Some(test)) if test >= cast => {
            Reading::new((test - cast).num_days() as f64)
        }
        _ => Reading::BLANK,
    }
}

/// Parse the date formats the observation forms produce.
pub fn parse_lab_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    // Timestamps from the store carry a time part after the date
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

// ============================================================================
// Sheet wrapper
// ============================================================================

/// Any observation sheet the laboratory records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObservationSheet {
    ConcreteCube(CompressionSet),
    AacBlock(CompressionSet),
    AtterbergLimits(soil::AtterbergInput),
    Compaction(soil::CompactionInput),
    FreeSwell(soil::FreeSwellInput),
    GrainSize(soil::GrainSizeInput),
    WaterContent(soil::WaterContentInput),
    AggregateBulkDensity(aggregate::BulkDensityInput),
    SpecificGravity(aggregate::SpecificGravityInput),
    ImpactValue(aggregate::ImpactValueInput),
    ShapeIndices(aggregate::ShapeIndexInput),
    SieveAnalysis(aggregate::SieveAnalysisInput),
    BlockDensityMoisture(aggregate::BlockDensityInput),
    CementFineness(cement::FinenessInput),
    CementSoundness(cement::SoundnessInput),
    AdmixtureDensity(admixture::RelativeDensityInput),
}

/// Derived values for an [`ObservationSheet`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DerivedSheet {
    ConcreteCube(CompressionSetResult),
    AacBlock(CompressionSetResult),
    AtterbergLimits(soil::AtterbergResult),
    Compaction(soil::CompactionResult),
    FreeSwell(soil::FreeSwellResult),
    GrainSize(soil::GrainSizeResult),
    WaterContent(soil::WaterContentResult),
    AggregateBulkDensity(aggregate::BulkDensityResult),
    SpecificGravity(aggregate::SpecificGravityResult),
    ImpactValue(aggregate::ImpactValueResult),
    ShapeIndices(aggregate::ShapeIndexResult),
    SieveAnalysis(aggregate::SieveAnalysisResult),
    BlockDensityMoisture(aggregate::BlockDensityResult),
    CementFineness(cement::FinenessResult),
    CementSoundness(cement::SoundnessResult),
    AdmixtureDensity(admixture::RelativeDensityResult),
}

impl ObservationSheet {
    /// Human-readable test name
    pub fn test_name(&self) -> &'static str {
        match self {
            ObservationSheet::ConcreteCube(_) => "Compressive Strength of Concrete Cubes",
            ObservationSheet::AacBlock(_) => "Compressive Strength of AAC Blocks",
            ObservationSheet::AtterbergLimits(_) => "Liquid Limit and Plastic Limit",
            ObservationSheet::Compaction(_) => "Proctor Compaction",
            ObservationSheet::FreeSwell(_) => "Free Swell Index",
            ObservationSheet::GrainSize(_) => "Grain Size Analysis",
            ObservationSheet::WaterContent(_) => "Water Content",
            ObservationSheet::AggregateBulkDensity(_) => "Bulk Density of Aggregate",
            ObservationSheet::SpecificGravity(_) => "Specific Gravity and Water Absorption",
            ObservationSheet::ImpactValue(_) => "Aggregate Impact Value",
            ObservationSheet::ShapeIndices(_) => "Flakiness and Elongation Index",
            ObservationSheet::SieveAnalysis(_) => "Sieve Analysis",
            ObservationSheet::BlockDensityMoisture(_) => "Bulk Density and Moisture Content",
            ObservationSheet::CementFineness(_) => "Fineness of Cement by Dry Sieving",
            ObservationSheet::CementSoundness(_) => "Soundness of Cement",
            ObservationSheet::AdmixtureDensity(_) => "Relative Density of Liquid Admixture",
        }
    }

    /// Recompute every derived field from the sheet's current readings.
    pub fn derive(&self) -> DerivedSheet {
        match self {
            ObservationSheet::ConcreteCube(set) => DerivedSheet::ConcreteCube(set.derive()),
            ObservationSheet::AacBlock(set) => DerivedSheet::AacBlock(set.derive()),
            ObservationSheet::AtterbergLimits(input) => DerivedSheet::AtterbergLimits(input.derive()),
            ObservationSheet::Compaction(input) => DerivedSheet::Compaction(input.derive()),
            ObservationSheet::FreeSwell(input) => DerivedSheet::FreeSwell(input.derive()),
            ObservationSheet::GrainSize(input) => DerivedSheet::GrainSize(input.derive()),
            ObservationSheet::WaterContent(input) => DerivedSheet::WaterContent(input.derive()),
            ObservationSheet::AggregateBulkDensity(input) => {
                DerivedSheet::AggregateBulkDensity(input.derive())
            }
            ObservationSheet::SpecificGravity(input) => DerivedSheet::SpecificGravity(input.derive()),
            ObservationSheet::ImpactValue(input) => DerivedSheet::ImpactValue(input.derive()),
            ObservationSheet::ShapeIndices(input) => DerivedSheet::ShapeIndices(input.derive()),
            ObservationSheet::SieveAnalysis(input) => DerivedSheet::SieveAnalysis(input.derive()),
            ObservationSheet::BlockDensityMoisture(input) => {
                DerivedSheet::BlockDensityMoisture(input.derive())
            }
            ObservationSheet::CementFineness(input) => DerivedSheet::CementFineness(input.derive()),
            ObservationSheet::CementSoundness(input) => DerivedSheet::CementSoundness(input.derive()),
            ObservationSheet::AdmixtureDensity(input) => DerivedSheet::AdmixtureDensity(input.derive()),
        }
    }
}
