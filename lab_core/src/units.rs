//! # Unit Types
//!
//! Type-safe wrappers for the SI units the laboratory works in. They are
//! plain `f64` newtypes that serialize as bare numbers.
//!
//! ## Units in use
//!
//! - Length: millimetres (mm)
//! - Area: square millimetres (mm²)
//! - Volume: cubic millimetres (mm³), cubic metres (m³)
//! - Mass: kilograms (kg)
//! - Force: kilonewtons (kN), newtons (N)
//! - Density: kg/m³
//! - Stress: N/mm² (numerically equal to MPa)
//!
//! Specimen dimensions are recorded in millimetres but densities are
//! reported per cubic metre, hence the `1e9` factor in
//! [`CubicMillimeters`] → [`CubicMeters`].
//!
//! ## Example
//!
//! ```rust
//! use lab_core::units::{CubicMeters, Millimeters, Kilonewtons, Newtons};
//!
//! let side = Millimeters(150.0);
//! let volume: CubicMeters = side.cube_volume().into();
//! assert!((volume.0 - 0.003375).abs() < 1e-12);
//!
//! let load: Newtons = Kilonewtons(562.5).into();
//! assert_eq!(load.0, 562_500.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length / Area / Volume
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

/// Volume in cubic millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMillimeters(pub f64);

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// mm³ per m³
pub const MM3_PER_M3: f64 = 1e9;

impl Millimeters {
    /// Area of a `self × other` rectangle
    pub fn by(self, other: Millimeters) -> SquareMillimeters {
        SquareMillimeters(self.0 * other.0)
    }

    /// Volume of a cube with this side
    pub fn cube_volume(self) -> CubicMillimeters {
        CubicMillimeters(self.0 * self.0 * self.0)
    }
}

impl SquareMillimeters {
    /// Prism volume for the given height
    pub fn times(self, height: Millimeters) -> CubicMillimeters {
        CubicMillimeters(self.0 * height.0)
    }
}

impl From<CubicMillimeters> for CubicMeters {
    fn from(mm3: CubicMillimeters) -> Self {
        CubicMeters(mm3.0 / MM3_PER_M3)
    }
}

impl From<CubicMeters> for CubicMillimeters {
    fn from(m3: CubicMeters) -> Self {
        CubicMillimeters(m3.0 * MM3_PER_M3)
    }
}

// ============================================================================
// Mass / Force
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (1 kN = 1000 N)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Derived Quantities
// ============================================================================

/// Density in kilograms per cubic metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerCubicMeter(pub f64);

/// Stress in newtons per square millimetre (MPa)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonsPerSqMm(pub f64);

impl Div<CubicMeters> for Kilograms {
    type Output = KgPerCubicMeter;
    fn div(self, rhs: CubicMeters) -> KgPerCubicMeter {
        KgPerCubicMeter(self.0 / rhs.0)
    }
}

impl Div<SquareMillimeters> for Newtons {
    type Output = NewtonsPerSqMm;
    fn div(self, rhs: SquareMillimeters) -> NewtonsPerSqMm {
        NewtonsPerSqMm(self.0 / rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(SquareMillimeters);
impl_arithmetic!(CubicMillimeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Newtons);
impl_arithmetic!(Kilonewtons);
impl_arithmetic!(KgPerCubicMeter);
impl_arithmetic!(NewtonsPerSqMm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm3_to_m3() {
        let v: CubicMeters = CubicMillimeters(3_375_000.0).into();
        assert!((v.0 - 0.003375).abs() < 1e-12);
    }

    #[test]
    fn test_kn_to_n() {
        let n: Newtons = Kilonewtons(562.5).into();
        assert_eq!(n.0, 562_500.0);
    }

    #[test]
    fn test_cube_density() {
        let side = Millimeters(150.0);
        let volume: CubicMeters = side.by(side).times(side).into();
        let density = Kilograms(8.5) / volume;
        assert!((density.0 - 2518.518_518).abs() < 1e-3);
    }

    #[test]
    fn test_stress() {
        let stress = Newtons::from(Kilonewtons(562.5)) / SquareMillimeters(22_500.0);
        assert_eq!(stress.0, 25.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(10.0);
        let b = Millimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let kg = Kilograms(8.5);
        let json = serde_json::to_string(&kg).unwrap();
        assert_eq!(json, "8.5");

        let roundtrip: Kilograms = serde_json::from_str(&json).unwrap();
        assert_eq!(kg, roundtrip);
    }
}
