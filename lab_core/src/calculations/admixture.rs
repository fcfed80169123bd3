//! # Liquid Admixture (IS 9103)
//!
//! Relative density by hydrometer, reported to four decimals as the mean of
//! the positive readings.

use serde::{Deserialize, Serialize};

use super::compute_average;
use crate::readings::Reading;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeDensityInput {
    /// Hydrometer temperature per reading (°C), informational only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temperatures: Vec<Reading>,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeDensityResult {
    pub average: Reading,
    /// Readings that contributed to the average
    pub counted: usize,
}

impl RelativeDensityInput {
    pub fn derive(&self) -> RelativeDensityResult {
        RelativeDensityResult {
            average: compute_average(self.readings.iter().copied()),
            counted: self.readings.iter().filter(|r| r.positive().is_some()).count(),
        }
    }
}
