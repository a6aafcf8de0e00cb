//! # Unit Types
//!
//! Type-safe wrappers for the few unit conversions the formulas perform
//! internally. Everything else is a plain `f64` whose unit is carried as
//! display metadata in the formula registry.
//!
//! ## Units Used Internally
//!
//! - Temperature: degrees Celsius (inputs), kelvin (Arrhenius and
//!   Larson-Miller terms)
//! - Unit cell volume: cubic ångström (Å³), cubic centimeter (cm³)
//!
//! ## Example
//!
//! ```rust
//! use matprop_core::units::{Celsius, CubicAngstrom, CubicCm, Kelvin};
//!
//! let t: Kelvin = Celsius(600.0).into();
//! assert!((t.0 - 873.15).abs() < 1e-9);
//!
//! let v: CubicCm = CubicAngstrom(1.0e24).into();
//! assert!((v.0 - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Cubic centimeters per cubic ångström
const CM3_PER_A3: f64 = 1e-24;

// ============================================================================
// Temperature Units
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

/// Absolute temperature in kelvin
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Self {
        Kelvin(c.0 + CELSIUS_TO_KELVIN)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic ångström (unit cell scale)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicAngstrom(pub f64);

/// Volume in cubic centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCm(pub f64);

impl From<CubicAngstrom> for CubicCm {
    fn from(v: CubicAngstrom) -> Self {
        CubicCm(v.0 * CM3_PER_A3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_kelvin() {
        let k: Kelvin = Celsius(25.0).into();
        assert!((k.0 - 298.15).abs() < 1e-12);

        let zero: Kelvin = Celsius(-273.15).into();
        assert!(zero.0.abs() < 1e-12);
    }

    #[test]
    fn test_volume_conversion() {
        let cm3: CubicCm = CubicAngstrom(66.43).into();
        assert!((cm3.0 - 66.43e-24).abs() < 1e-30);
    }

    #[test]
    fn test_serialization() {
        let t = Celsius(650.0);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "650.0");

        let roundtrip: Celsius = serde_json::from_str(&json).unwrap();
        assert_eq!(t, roundtrip);
    }
}
