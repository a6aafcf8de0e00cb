//! # Calculation Settings
//!
//! Tunable defaults shared by the numeric utilities and formulas. The
//! library never reads these from disk; front ends deserialize them (the
//! CLI uses a TOML file) and pass them explicitly.
//!
//! ## Example
//!
//! ```rust
//! use matprop_core::settings::CalcSettings;
//!
//! let settings: CalcSettings = serde_json::from_str(r#"{ "regression": { "curve_samples": 101 } }"#).unwrap();
//! assert_eq!(settings.regression.curve_samples, 101);
//! assert_eq!(settings.solver.pivot_tolerance, 1e-10);
//! assert!(settings.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Pivot magnitude below which a linear system is treated as singular
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// Points sampled along a fitted curve (50 increments, both ends included)
pub const DEFAULT_CURVE_SAMPLES: usize = 51;

/// Cu K-alpha wavelength in ångström
pub const CU_K_ALPHA_ANGSTROM: f64 = 1.5406;

/// Highest Miller index enumerated for XRD peak lists
pub const DEFAULT_MAX_MILLER_INDEX: u8 = 4;

/// Larson-Miller constant C for steels
pub const DEFAULT_LARSON_MILLER_CONSTANT: f64 = 20.0;

/// Points in a synthesized stress-strain curve
pub const DEFAULT_STRESS_STRAIN_POINTS: usize = 100;

/// All tunable calculation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcSettings {
    pub solver: SolverSettings,
    pub regression: RegressionSettings,
    pub crystal: CrystalSettings,
    pub creep: CreepSettings,
    pub curve: CurveSettings,
}

/// Linear solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Singularity threshold for the pivot after row exchange
    pub pivot_tolerance: f64,
}

/// Curve fitting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionSettings {
    /// Number of points in a sampled fit curve
    pub curve_samples: usize,
}

/// Crystallography settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalSettings {
    /// X-ray wavelength (Å)
    pub wavelength_angstrom: f64,
    /// Highest h, k, l enumerated
    pub max_index: u8,
}

/// Creep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreepSettings {
    /// Larson-Miller constant C
    pub larson_miller_constant: f64,
}

/// Stress-strain curve synthesis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    /// Number of points per synthesized curve
    pub points: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl Default for RegressionSettings {
    fn default() -> Self {
        RegressionSettings {
            curve_samples: DEFAULT_CURVE_SAMPLES,
        }
    }
}

impl Default for CrystalSettings {
    fn default() -> Self {
        CrystalSettings {
            wavelength_angstrom: CU_K_ALPHA_ANGSTROM,
            max_index: DEFAULT_MAX_MILLER_INDEX,
        }
    }
}

impl Default for CreepSettings {
    fn default() -> Self {
        CreepSettings {
            larson_miller_constant: DEFAULT_LARSON_MILLER_CONSTANT,
        }
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        CurveSettings {
            points: DEFAULT_STRESS_STRAIN_POINTS,
        }
    }
}

impl CalcSettings {
    /// Validate settings loaded from an external source.
    pub fn validate(&self) -> CalcResult<()> {
        let tol = self.solver.pivot_tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(CalcError::invalid_input(
                "solver.pivot_tolerance",
                tol.to_string(),
                "Tolerance must be a positive finite number",
            ));
        }
        if self.regression.curve_samples < 2 {
            return Err(CalcError::invalid_input(
                "regression.curve_samples",
                self.regression.curve_samples.to_string(),
                "At least 2 samples are needed to draw a curve",
            ));
        }
        let wl = self.crystal.wavelength_angstrom;
        if !(wl.is_finite() && wl > 0.0) {
            return Err(CalcError::invalid_input(
                "crystal.wavelength_angstrom",
                wl.to_string(),
                "Wavelength must be positive",
            ));
        }
        if self.crystal.max_index == 0 {
            return Err(CalcError::invalid_input(
                "crystal.max_index",
                "0",
                "Max Miller index must be at least 1",
            ));
        }
        if !self.creep.larson_miller_constant.is_finite() {
            return Err(CalcError::invalid_input(
                "creep.larson_miller_constant",
                self.creep.larson_miller_constant.to_string(),
                "Constant must be finite",
            ));
        }
        if self.curve.points < 10 {
            return Err(CalcError::invalid_input(
                "curve.points",
                self.curve.points.to_string(),
                "A stress-strain curve needs at least 10 points",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalcSettings::default();
        assert_eq!(settings.solver.pivot_tolerance, 1e-10);
        assert_eq!(settings.regression.curve_samples, 51);
        assert_eq!(settings.crystal.max_index, 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{ "crystal": { "wavelength_angstrom": 0.7093 } }"#;
        let settings: CalcSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.crystal.wavelength_angstrom, 0.7093);
        assert_eq!(settings.crystal.max_index, DEFAULT_MAX_MILLER_INDEX);
        assert_eq!(settings.creep.larson_miller_constant, 20.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = CalcSettings::default();
        settings.solver.pivot_tolerance = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = CalcSettings::default();
        settings.regression.curve_samples = 1;
        assert!(settings.validate().is_err());

        let mut settings = CalcSettings::default();
        settings.crystal.max_index = 0;
        assert!(settings.validate().is_err());
    }
}
