//! # Soil Tests (IS 2720)
//!
//! Every soil sheet is built on the same weighing: an empty container `W1`,
//! container plus wet soil `W2`, container plus oven-dried soil `W3`, giving
//! `w% = (W2 − W3) × 100 / (W3 − W1)`.
//!
//! - Water content: mean of the trial moisture contents
//! - Liquid limit: moisture at 25 blows read off the flow curve
//! - Plastic limit: mean of the thread-rolling trials; PI = LL − PL
//! - Compaction: wet and dry density per trial, MDD and OMC
//! - Free swell index: `(V1 − V2) × 100 / V2`
//! - Grain size: % retained, cumulative % retained and % passing per sieve

use serde::{Deserialize, Serialize};

use super::aggregate::{grade_sieves, SieveReading, SieveRow};
use super::{compute_average, compute_mean, compute_moisture_content, ratio_percent};
use crate::readings::Reading;

/// Trials per sheet on the observation forms
pub const MAX_TRIALS: usize = 5;

/// Blow count the liquid limit is defined at
pub const LIQUID_LIMIT_BLOWS: f64 = 25.0;

// ============================================================================
// Moisture trial
// ============================================================================

/// One container weighed wet and dry, in grams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoistureTrial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_no: Option<String>,
    /// W1
    #[serde(default)]
    pub container_weight: Reading,
    /// W2
    #[serde(default)]
    pub wet_weight: Reading,
    /// W3
    #[serde(default)]
    pub dry_weight: Reading,
}

impl MoistureTrial {
    pub fn new(container: f64, wet: f64, dry: f64) -> Self {
        MoistureTrial {
            container_no: None,
            container_weight: Reading::new(container),
            wet_weight: Reading::new(wet),
            dry_weight: Reading::new(dry),
        }
    }

    /// Mass of water `W2 − W3`
    pub fn water_mass(&self) -> Reading {
        match (self.wet_weight.value(), self.dry_weight.value()) {
            (Some(wet), Some(dry)) => Reading::new(wet - dry),
            _ => Reading::BLANK,
        }
    }

    /// Mass of dry soil `W3 − W1`
    pub fn dry_soil_mass(&self) -> Reading {
        match (self.dry_weight.value(), self.container_weight.value()) {
            (Some(dry), Some(container)) => Reading::new(dry - container),
            _ => Reading::BLANK,
        }
    }

    /// Moisture content in percent
    pub fn moisture(&self) -> Reading {
        compute_moisture_content(self.wet_weight, self.dry_weight, self.container_weight)
    }
}

// ============================================================================
// Water content
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterContentInput {
    #[serde(default)]
    pub trials: Vec<MoistureTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterContentResult {
    pub water_mass: Vec<Reading>,
    pub dry_soil_mass: Vec<Reading>,
    pub moisture: Vec<Reading>,
    pub average: Reading,
}

impl WaterContentInput {
    pub fn derive(&self) -> WaterContentResult {
        let trials = &self.trials[..self.trials.len().min(MAX_TRIALS)];
        let moisture: Vec<Reading> = trials.iter().map(MoistureTrial::moisture).collect();
        WaterContentResult {
            water_mass: trials.iter().map(MoistureTrial::water_mass).collect(),
            dry_soil_mass: trials.iter().map(MoistureTrial::dry_soil_mass).collect(),
            average: compute_mean(moisture.iter().copied()),
            moisture,
        }
    }
}

// ============================================================================
// Atterberg limits
// ============================================================================

/// A Casagrande cup trial: blows to close the groove plus the moisture weighing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidLimitTrial {
    #[serde(default)]
    pub blows: Reading,
    #[serde(flatten)]
    pub weighing: MoistureTrial,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtterbergInput {
    #[serde(default)]
    pub liquid_limit_trials: Vec<LiquidLimitTrial>,
    #[serde(default)]
    pub plastic_limit_trials: Vec<MoistureTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtterbergResult {
    pub liquid_trial_moisture: Vec<Reading>,
    pub liquid_limit: Reading,
    pub plastic_trial_moisture: Vec<Reading>,
    pub plastic_limit: Reading,
    pub plasticity_index: Reading,
    /// Plastic limit at or above the liquid limit
    pub non_plastic: bool,
}

impl AtterbergInput {
    pub fn derive(&self) -> AtterbergResult {
        let liquid = &self.liquid_limit_trials[..self.liquid_limit_trials.len().min(MAX_TRIALS)];
        let plastic = &self.plastic_limit_trials[..self.plastic_limit_trials.len().min(MAX_TRIALS)];

        let liquid_trial_moisture: Vec<Reading> = liquid.iter().map(|t| t.weighing.moisture()).collect();
        let plastic_trial_moisture: Vec<Reading> = plastic.iter().map(MoistureTrial::moisture).collect();

        let liquid_limit = liquid_limit(liquid);
        let plastic_limit = compute_average(plastic_trial_moisture.iter().copied());

        let (plasticity_index, non_plastic) = match (liquid_limit.value(), plastic_limit.value()) {
            (Some(ll), Some(pl)) if pl >= ll => (Reading::BLANK, true),
            (Some(ll), Some(pl)) => (Reading::new(ll - pl), false),
            _ => (Reading::BLANK, false),
        };

        AtterbergResult {
            liquid_trial_moisture,
            liquid_limit,
            plastic_trial_moisture,
            plastic_limit,
            plasticity_index,
            non_plastic,
        }
    }
}

/// Moisture content at 25 blows from a least-squares flow curve.
///
/// The flow curve is moisture against `log10(blows)`. Trials without a
/// positive blow count or a computable moisture are skipped. At least two
/// distinct blow counts are needed, except that a lone trial at exactly 25
/// blows is its own answer.
pub fn liquid_limit(trials: &[LiquidLimitTrial]) -> Reading {
    let points: Vec<(f64, f64)> = trials
        .iter()
        .filter_map(|t| {
            let blows = t.blows.positive()?;
            let w = t.weighing.moisture().value()?;
            Some((blows.log10(), w))
        })
        .collect();

    let target = LIQUID_LIMIT_BLOWS.log10();

    match points.as_slice() {
        [] => Reading::BLANK,
        [(x, w)] if (x - target).abs() < 1e-12 => Reading::new(*w),
        [_] => Reading::BLANK,
        _ => {
            let n = points.len() as f64;
            let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
            let mean_w = points.iter().map(|(_, w)| w).sum::<f64>() / n;
            let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
            if sxx < 1e-12 {
                return Reading::BLANK;
            }
            let sxw: f64 = points.iter().map(|(x, w)| (x - mean_x) * (w - mean_w)).sum();
            let slope = sxw / sxx;
            Reading::new(mean_w + slope * (target - mean_x))
        }
    }
}

// ============================================================================
// Compaction
// ============================================================================

/// One compacted layer set: mould weighed full, plus a moisture sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactionTrial {
    /// W, mould + compacted soil (g)
    #[serde(default)]
    pub mould_and_soil: Reading,
    #[serde(default)]
    pub moisture: MoistureTrial,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactionInput {
    /// Wm (g)
    #[serde(default)]
    pub mould_weight: Reading,
    /// Vm (cm³)
    #[serde(default)]
    pub mould_volume: Reading,
    #[serde(default)]
    pub trials: Vec<CompactionTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionPoint {
    /// γm (g/cm³)
    pub wet_density: Reading,
    /// w (%)
    pub moisture: Reading,
    /// γd (g/cm³)
    pub dry_density: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionResult {
    pub points: Vec<CompactionPoint>,
    pub max_dry_density: Reading,
    pub optimum_moisture: Reading,
}

impl CompactionInput {
    pub fn derive(&self) -> CompactionResult {
        let points: Vec<CompactionPoint> = self
            .trials
            .iter()
            .take(MAX_TRIALS)
            .map(|trial| self.point(trial))
            .collect();

        let peak = points
            .iter()
            .filter_map(|p| Some((p.dry_density.positive()?, p.moisture)))
            .fold(None, |best: Option<(f64, Reading)>, (gd, w)| match best {
                Some((best_gd, _)) if best_gd >= gd => best,
                _ => Some((gd, w)),
            });

        CompactionResult {
            max_dry_density: peak.map(|(gd, _)| Reading::new(gd)).unwrap_or(Reading::BLANK),
            optimum_moisture: peak.map(|(_, w)| w).unwrap_or(Reading::BLANK),
            points,
        }
    }

    fn point(&self, trial: &CompactionTrial) -> CompactionPoint {
        let wet_density = match (
            trial.mould_and_soil.value(),
            self.mould_weight.value(),
            self.mould_volume.positive(),
        ) {
            (Some(w), Some(wm), Some(vm)) if w > wm => Reading::new((w - wm) / vm),
            _ => Reading::BLANK,
        };
        let moisture = trial.moisture.moisture();
        let dry_density = match (wet_density.value(), moisture.value()) {
            (Some(gm), Some(w)) if w > -100.0 => Reading::new(gm / (1.0 + w / 100.0)),
            _ => Reading::BLANK,
        };

        CompactionPoint {
            wet_density,
            moisture,
            dry_density,
        }
    }
}

// ============================================================================
// Free swell index
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeSwellReplicate {
    /// V1, volume read in distilled water (cm³)
    #[serde(default)]
    pub water_volume: Reading,
    /// V2, volume read in kerosene (cm³)
    #[serde(default)]
    pub kerosene_volume: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeSwellInput {
    #[serde(default)]
    pub replicates: Vec<FreeSwellReplicate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSwellResult {
    pub indices: Vec<Reading>,
    pub average: Reading,
}

impl FreeSwellInput {
    pub fn derive(&self) -> FreeSwellResult {
        let indices: Vec<Reading> = self
            .replicates
            .iter()
            .map(|r| match (r.water_volume.value(), r.kerosene_volume.value()) {
                (Some(v1), Some(v2)) => ratio_percent(v1 - v2, v2),
                _ => Reading::BLANK,
            })
            .collect();

        FreeSwellResult {
            average: compute_mean(indices.iter().copied()),
            indices,
        }
    }
}

// ============================================================================
// Grain size
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrainSizeInput {
    /// Oven-dry sample mass (g)
    #[serde(default)]
    pub total_weight: Reading,
    #[serde(default)]
    pub sieves: Vec<SieveReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainSizeResult {
    pub rows: Vec<SieveRow>,
}

impl GrainSizeInput {
    pub fn derive(&self) -> GrainSizeResult {
        GrainSizeResult {
            rows: grade_sieves(self.total_weight, &self.sieves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::MOISTURE_PLACES;

    fn ll_trial(blows: f64, container: f64, wet: f64, dry: f64) -> LiquidLimitTrial {
        LiquidLimitTrial {
            blows: Reading::new(blows),
            weighing: MoistureTrial::new(container, wet, dry),
        }
    }

    #[test]
    fn test_moisture_trial() {
        let trial = MoistureTrial::new(20.0, 70.0, 60.0);
        assert_eq!(trial.water_mass().value(), Some(10.0));
        assert_eq!(trial.dry_soil_mass().value(), Some(40.0));
        assert_eq!(trial.moisture().value(), Some(25.0));
    }

    #[test]
    fn test_water_content_average() {
        let input = WaterContentInput {
            trials: vec![MoistureTrial::new(20.0, 70.0, 60.0), MoistureTrial::new(10.0, 60.0, 50.0)],
        };
        let result = input.derive();
        assert_eq!(result.moisture[1].value(), Some(25.0));
        assert_eq!(result.average.display(MOISTURE_PLACES), "25.00");
    }

    #[test]
    fn test_liquid_limit_on_flow_curve() {
        // Two trials straddling 25 blows on a straight flow curve
        let trials = vec![
            ll_trial(10.0, 0.0, 150.0, 100.0), // 50 %
            ll_trial(100.0, 0.0, 130.0, 100.0), // 30 %
        ];
        let ll = liquid_limit(&trials).value().unwrap();
        // w = 50 - 20 * log10(25 / 10)
        let expected = 50.0 - 20.0 * (2.5f64).log10();
        assert!((ll - expected).abs() < 1e-9);
    }

    #[test]
    fn test_liquid_limit_needs_two_blow_counts() {
        assert!(liquid_limit(&[ll_trial(20.0, 0.0, 150.0, 100.0)]).is_blank());
        assert_eq!(liquid_limit(&[ll_trial(25.0, 0.0, 150.0, 100.0)]).value(), Some(50.0));
        let same_blows = [ll_trial(20.0, 0.0, 150.0, 100.0), ll_trial(20.0, 0.0, 140.0, 100.0)];
        assert!(liquid_limit(&same_blows).is_blank());
        assert!(liquid_limit(&[]).is_blank());
    }

    #[test]
    fn test_atterberg_plasticity_index() {
        let input = AtterbergInput {
            liquid_limit_trials: vec![ll_trial(25.0, 0.0, 145.0, 100.0)],
            plastic_limit_trials: vec![
                MoistureTrial::new(0.0, 120.0, 100.0),
                MoistureTrial::new(0.0, 122.0, 100.0),
            ],
        };
        let result = input.derive();
        assert_eq!(result.liquid_limit.value(), Some(45.0));
        assert_eq!(result.plastic_limit.value(), Some(21.0));
        assert_eq!(result.plasticity_index.value(), Some(24.0));
        assert!(!result.non_plastic);
    }

    #[test]
    fn test_atterberg_non_plastic() {
        let input = AtterbergInput {
            liquid_limit_trials: vec![ll_trial(25.0, 0.0, 120.0, 100.0)],
            plastic_limit_trials: vec![MoistureTrial::new(0.0, 125.0, 100.0)],
        };
        let result = input.derive();
        assert!(result.non_plastic);
        assert!(result.plasticity_index.is_blank());
    }

    #[test]
    fn test_trials_capped_at_five() {
        let input = WaterContentInput {
            trials: vec![MoistureTrial::new(0.0, 110.0, 100.0); 7],
        };
        assert_eq!(input.derive().moisture.len(), MAX_TRIALS);
    }

    #[test]
    fn test_compaction_peak() {
        let trial = |w: f64, dry_pct: f64| CompactionTrial {
            mould_and_soil: Reading::new(w),
            moisture: MoistureTrial::new(0.0, 100.0 + dry_pct, 100.0),
        };
        let input = CompactionInput {
            mould_weight: Reading::new(4000.0),
            mould_volume: Reading::new(1000.0),
            trials: vec![trial(5900.0, 8.0), trial(6100.0, 12.0), trial(6050.0, 16.0)],
        };
        let result = input.derive();
        // 2.1 / 1.12 = 1.875
        assert!((result.max_dry_density.value().unwrap() - 1.875).abs() < 1e-9);
        assert_eq!(result.optimum_moisture.value(), Some(12.0));
        assert!((result.points[0].wet_density.value().unwrap() - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_compaction_without_mould_volume() {
        let input = CompactionInput {
            mould_weight: Reading::new(4000.0),
            mould_volume: Reading::BLANK,
            trials: vec![CompactionTrial::default()],
        };
        let result = input.derive();
        assert!(result.max_dry_density.is_blank());
        assert!(result.points[0].wet_density.is_blank());
    }

    #[test]
    fn test_free_swell() {
        let input = FreeSwellInput {
            replicates: vec![
                FreeSwellReplicate { water_volume: Reading::new(15.0), kerosene_volume: Reading::new(10.0) },
                FreeSwellReplicate { water_volume: Reading::new(10.0), kerosene_volume: Reading::new(10.0) },
                FreeSwellReplicate { water_volume: Reading::new(12.0), kerosene_volume: Reading::new(0.0) },
            ],
        };
        let result = input.derive();
        assert_eq!(result.indices[0].value(), Some(50.0));
        assert_eq!(result.indices[1].value(), Some(0.0));
        assert!(result.indices[2].is_blank());
        assert_eq!(result.average.value(), Some(25.0));
    }

    #[test]
    fn test_flattened_liquid_limit_json() {
        let json = r#"{ "blows": "25", "container_weight": 0, "wet_weight": "150", "dry_weight": 100 }"#;
        let trial: LiquidLimitTrial = serde_json::from_str(json).unwrap();
        assert_eq!(trial.weighing.moisture().value(), Some(50.0));
    }
}
