//! # Cement Tests (IS 4031)
//!
//! - Fineness by dry sieving (Part 1): residue on the 90 µm sieve as a
//!   percentage of the sample weight, averaged over the trials.
//! - Soundness by Le Chatelier (Part 3): pointer separation after boiling
//!   minus separation at 27 °C, averaged.

use serde::{Deserialize, Serialize};

use super::{compute_average, ratio_percent};
use crate::readings::Reading;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinenessTrial {
    /// Sample weight (g)
    #[serde(default)]
    pub cement_weight: Reading,
    /// Residue on sieve (g)
    #[serde(default)]
    pub residue_weight: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinenessInput {
    #[serde(default)]
    pub trials: Vec<FinenessTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinenessResult {
    pub residue_percent: Vec<Reading>,
    pub average_residue: Reading,
}

impl FinenessInput {
    pub fn derive(&self) -> FinenessResult {
        let residue_percent: Vec<Reading> = self
            .trials
            .iter()
            .map(|t| match (t.residue_weight.value(), t.cement_weight.positive()) {
                (Some(residue), Some(cement)) => ratio_percent(residue, cement),
                _ => Reading::BLANK,
            })
            .collect();

        FinenessResult {
            average_residue: compute_average(residue_percent.iter().copied()),
            residue_percent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundnessTrial {
    /// Pointer separation at 27 °C (mm)
    #[serde(default)]
    pub distance_27c: Reading,
    /// Pointer separation after boiling (mm)
    #[serde(default)]
    pub distance_boiled: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundnessInput {
    #[serde(default)]
    pub trials: Vec<SoundnessTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundnessResult {
    /// mm per trial
    pub expansion: Vec<Reading>,
    pub average_expansion: Reading,
}

impl SoundnessInput {
    pub fn derive(&self) -> SoundnessResult {
        let expansion: Vec<Reading> = self
            .trials
            .iter()
            .map(|t| match (t.distance_boiled.value(), t.distance_27c.value()) {
                (Some(boiled), Some(initial)) => Reading::new(boiled - initial),
                _ => Reading::BLANK,
            })
            .collect();

        // Zero and negative expansions drop out of the average
        SoundnessResult {
            average_expansion: compute_average(expansion.iter().copied()),
            expansion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fineness() {
        let input = FinenessInput {
            trials: vec![
                FinenessTrial { cement_weight: Reading::new(100.0), residue_weight: Reading::new(6.0) },
                FinenessTrial { cement_weight: Reading::new(100.0), residue_weight: Reading::new(8.0) },
                FinenessTrial { cement_weight: Reading::BLANK, residue_weight: Reading::new(5.0) },
            ],
        };
        let result = input.derive();
        assert_eq!(result.residue_percent[0].value(), Some(6.0));
        assert!(result.residue_percent[2].is_blank());
        assert_eq!(result.average_residue.value(), Some(7.0));
    }

    #[test]
    fn test_soundness_average_skips_zero_expansion() {
        let input = SoundnessInput {
            trials: vec![
                SoundnessTrial { distance_27c: Reading::new(10.0), distance_boiled: Reading::new(12.0) },
                SoundnessTrial { distance_27c: Reading::new(11.0), distance_boiled: Reading::new(11.0) },
                SoundnessTrial::default(),
            ],
        };
        let result = input.derive();
        assert_eq!(result.expansion[0].value(), Some(2.0));
        assert_eq!(result.expansion[1].value(), Some(0.0));
        assert!(result.expansion[2].is_blank());
        assert_eq!(result.average_expansion.value(), Some(2.0));
    }

    #[test]
    fn test_soundness_all_zero_expansion_is_blank() {
        let input = SoundnessInput {
            trials: vec![SoundnessTrial { distance_27c: Reading::new(11.0), distance_boiled: Reading::new(11.0) }],
        };
        assert!(input.derive().average_expansion.is_blank());
    }
}
