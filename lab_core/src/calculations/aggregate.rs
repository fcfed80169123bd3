//! # Aggregate and Block Tests (IS 2386, IS 2185)
//!
//! Fine and coarse aggregate sheets share most calculations, so they live
//! together. The block bulk-density sheet is here too because it is the same
//! weigh-and-measure pattern applied to masonry units.
//!
//! All replicate means use the positive-only average. The legacy forms
//! divided by a fixed three regardless of how many cells were filled; that is
//! deliberately not reproduced.

use serde::{Deserialize, Serialize};

use super::{compute_average, compute_density, ratio_percent};
use crate::readings::Reading;

// ============================================================================
// Sieve grading (shared with soil grain size analysis)
// ============================================================================

/// Mass retained on one sieve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SieveReading {
    /// Sieve designation as printed, e.g. "4.75 mm" or "600 micron"
    pub sieve: String,
    #[serde(default)]
    pub retained: Reading,
}

/// One graded sieve row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveRow {
    pub sieve: String,
    pub retained: Reading,
    pub percent_retained: Reading,
    pub cumulative_retained: Reading,
    pub percent_passing: Reading,
}

/// Grade a stack of sieves, coarsest first.
///
/// Blank retained masses count as zero toward the cumulative total but leave
/// their own percentage blank. Every row is blank when the total sample mass
/// is not positive.
pub fn grade_sieves(total_weight: Reading, sieves: &[SieveReading]) -> Vec<SieveRow> {
    let total = total_weight.positive();
    let mut cumulative = 0.0;

    sieves
        .iter()
        .map(|s| {
            let Some(total) = total else {
                return SieveRow {
                    sieve: s.sieve.clone(),
                    retained: s.retained,
                    percent_retained: Reading::BLANK,
                    cumulative_retained: Reading::BLANK,
                    percent_passing: Reading::BLANK,
                };
            };

            let percent_retained = s
                .retained
                .value()
                .map(|mass| ratio_percent(mass, total))
                .unwrap_or(Reading::BLANK);
            cumulative += percent_retained.value().unwrap_or(0.0);

            SieveRow {
                sieve: s.sieve.clone(),
                retained: s.retained,
                percent_retained,
                cumulative_retained: Reading::new(cumulative),
                percent_passing: Reading::new(100.0 - cumulative),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SieveAnalysisInput {
    #[serde(default)]
    pub total_weight: Reading,
    #[serde(default)]
    pub sieves: Vec<SieveReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveAnalysisResult {
    pub rows: Vec<SieveRow>,
    /// Σ cumulative % retained / 100
    pub fineness_modulus: Reading,
}

impl SieveAnalysisInput {
    pub fn derive(&self) -> SieveAnalysisResult {
        let rows = grade_sieves(self.total_weight, &self.sieves);
        let fineness_modulus = if rows.is_empty() || self.total_weight.positive().is_none() {
            Reading::BLANK
        } else {
            let sum: f64 = rows.iter().filter_map(|r| r.cumulative_retained.value()).sum();
            Reading::new(sum / 100.0)
        };

        SieveAnalysisResult {
            rows,
            fineness_modulus,
        }
    }
}

// ============================================================================
// Bulk density
// ============================================================================

/// One filling of the cylindrical measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDensityTrial {
    /// Measure volume (litres)
    #[serde(default)]
    pub volume: Reading,
    /// Net weight rodded (kg)
    #[serde(default)]
    pub rodded_weight: Reading,
    /// Net weight loose (kg)
    #[serde(default)]
    pub loose_weight: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDensityInput {
    #[serde(default)]
    pub trials: Vec<BulkDensityTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDensityResult {
    /// kg/L per trial
    pub rodded: Vec<Reading>,
    pub loose: Vec<Reading>,
    pub mean_rodded: Reading,
    pub mean_loose: Reading,
}

fn per_volume(weight: Reading, volume: Reading) -> Reading {
    match (weight.positive(), volume.positive()) {
        (Some(w), Some(v)) => Reading::new(w / v),
        _ => Reading::BLANK,
    }
}

impl BulkDensityInput {
    pub fn derive(&self) -> BulkDensityResult {
        let rodded: Vec<Reading> = self.trials.iter().map(|t| per_volume(t.rodded_weight, t.volume)).collect();
        let loose: Vec<Reading> = self.trials.iter().map(|t| per_volume(t.loose_weight, t.volume)).collect();

        BulkDensityResult {
            mean_rodded: compute_average(rodded.iter().copied()),
            mean_loose: compute_average(loose.iter().copied()),
            rodded,
            loose,
        }
    }
}

// ============================================================================
// Specific gravity and water absorption
// ============================================================================

/// Pycnometer weighings (g).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecificGravityTrial {
    /// A, saturated surface-dry sample
    #[serde(default)]
    pub saturated_surface_dry: Reading,
    /// B, pycnometer + sample + water
    #[serde(default)]
    pub pycnometer_sample_water: Reading,
    /// C, pycnometer + water
    #[serde(default)]
    pub pycnometer_water: Reading,
    /// D, oven-dried sample
    #[serde(default)]
    pub oven_dried: Reading,
}

impl SpecificGravityTrial {
    fn weighings(&self) -> Option<(f64, f64, f64, f64)> {
        Some((
            self.saturated_surface_dry.positive()?,
            self.pycnometer_sample_water.positive()?,
            self.pycnometer_water.positive()?,
            self.oven_dried.positive()?,
        ))
    }

    /// `D / (A − (B − C))`
    pub fn specific_gravity(&self) -> Reading {
        match self.weighings() {
            Some((a, b, c, d)) if a - (b - c) > 0.0 => Reading::new(d / (a - (b - c))),
            _ => Reading::BLANK,
        }
    }

    /// `(A − D) × 100 / D`
    pub fn water_absorption(&self) -> Reading {
        match self.weighings() {
            Some((a, _, _, d)) => ratio_percent(a - d, d),
            None => Reading::BLANK,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecificGravityInput {
    #[serde(default)]
    pub trials: Vec<SpecificGravityTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificGravityResult {
    pub specific_gravity: Vec<Reading>,
    pub water_absorption: Vec<Reading>,
    pub mean_specific_gravity: Reading,
    pub mean_water_absorption: Reading,
}

impl SpecificGravityInput {
    pub fn derive(&self) -> SpecificGravityResult {
        let specific_gravity: Vec<Reading> = self.trials.iter().map(|t| t.specific_gravity()).collect();
        let water_absorption: Vec<Reading> = self.trials.iter().map(|t| t.water_absorption()).collect();

        SpecificGravityResult {
            mean_specific_gravity: compute_average(specific_gravity.iter().copied()),
            mean_water_absorption: compute_average(water_absorption.iter().copied()),
            specific_gravity,
            water_absorption,
        }
    }
}

// ============================================================================
// Aggregate impact value
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTrial {
    /// Oven-dry sample weight (g)
    #[serde(default)]
    pub sample_weight: Reading,
    /// Fraction passing 2.36 mm after impact (g)
    #[serde(default)]
    pub passing: Reading,
    /// Fraction retained on 2.36 mm (g)
    #[serde(default)]
    pub retained: Reading,
}

impl ImpactTrial {
    /// `passing × 100 / (passing + retained)`
    pub fn impact_value(&self) -> Reading {
        if self.sample_weight.positive().is_none() {
            return Reading::BLANK;
        }
        let passing = self.passing.value().unwrap_or(0.0);
        let retained = self.retained.value().unwrap_or(0.0);
        ratio_percent(passing, passing + retained)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactValueInput {
    #[serde(default)]
    pub trials: Vec<ImpactTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactValueResult {
    pub values: Vec<Reading>,
    pub mean: Reading,
}

impl ImpactValueInput {
    pub fn derive(&self) -> ImpactValueResult {
        let values: Vec<Reading> = self.trials.iter().map(ImpactTrial::impact_value).collect();
        ImpactValueResult {
            mean: compute_average(values.iter().copied()),
            values,
        }
    }
}

// ============================================================================
// Flakiness and elongation
// ============================================================================

/// Replicate index readings for one size fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeFraction {
    /// e.g. "20 mm"
    pub size: String,
    #[serde(default)]
    pub flakiness: Vec<Reading>,
    #[serde(default)]
    pub elongation: Vec<Reading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeIndexInput {
    #[serde(default)]
    pub fractions: Vec<SizeFraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionMeans {
    pub size: String,
    pub flakiness: Reading,
    pub elongation: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeIndexResult {
    pub fractions: Vec<FractionMeans>,
    /// Sum of the fraction means
    pub total_flakiness: Reading,
    pub total_elongation: Reading,
}

fn sum_present<'a>(values: impl Iterator<Item = &'a Reading>) -> Reading {
    values
        .filter_map(|r| r.value())
        .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
        .map(Reading::new)
        .unwrap_or(Reading::BLANK)
}

impl ShapeIndexInput {
    pub fn derive(&self) -> ShapeIndexResult {
        let fractions: Vec<FractionMeans> = self
            .fractions
            .iter()
            .map(|f| FractionMeans {
                size: f.size.clone(),
                flakiness: compute_average(f.flakiness.iter().copied()),
                elongation: compute_average(f.elongation.iter().copied()),
            })
            .collect();

        ShapeIndexResult {
            total_flakiness: sum_present(fractions.iter().map(|f| &f.flakiness)),
            total_elongation: sum_present(fractions.iter().map(|f| &f.elongation)),
            fractions,
        }
    }
}

// ============================================================================
// Block bulk density and moisture
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSpecimen {
    /// mm
    #[serde(default)]
    pub length: Reading,
    #[serde(default)]
    pub breadth: Reading,
    #[serde(default)]
    pub depth: Reading,
    /// As received (kg)
    #[serde(default)]
    pub weight_before: Reading,
    /// Oven dry (kg)
    #[serde(default)]
    pub weight_after: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDensityInput {
    #[serde(default)]
    pub specimens: Vec<BlockSpecimen>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDensityResult {
    /// kg/m³ on oven-dry weight
    pub bulk_density: Vec<Reading>,
    /// % of oven-dry weight
    pub moisture: Vec<Reading>,
    pub average_bulk_density: Reading,
    pub average_moisture: Reading,
}

impl BlockDensityInput {
    pub fn derive(&self) -> BlockDensityResult {
        let bulk_density: Vec<Reading> = self
            .specimens
            .iter()
            .map(|s| compute_density(s.length, s.breadth, s.depth, s.weight_after))
            .collect();
        let moisture: Vec<Reading> = self
            .specimens
            .iter()
            .map(|s| match (s.weight_before.positive(), s.weight_after.positive()) {
                (Some(before), Some(after)) => ratio_percent(before - after, after),
                _ => Reading::BLANK,
            })
            .collect();

        BlockDensityResult {
            average_bulk_density: compute_average(bulk_density.iter().copied()),
            average_moisture: compute_average(moisture.iter().copied()),
            bulk_density,
            moisture,
        }
    }
}
