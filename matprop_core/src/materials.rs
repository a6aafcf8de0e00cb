//! # Reference Materials
//!
//! Typical room-temperature properties for a handful of common engineering
//! alloys. Values are handbook midpoints for the listed condition and are
//! meant to prefill calculations, not to replace certified mill data.
//!
//! ## Example
//!
//! ```rust
//! use matprop_core::materials;
//!
//! let al = materials::find("6061-t6").unwrap();
//! assert_eq!(al.density_kg_m3, 2700.0);
//! assert!(materials::find("unobtainium").is_err());
//! ```

use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::formulas::fatigue::{FatigueInput, MeanStressModel};
use crate::formulas::mechanics::TensileProperties;

/// Handbook properties of one alloy and condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialProperties {
    /// Lookup key (case-insensitive)
    pub key: &'static str,
    pub name: &'static str,
    pub condition: &'static str,
    /// Young's modulus (GPa)
    pub youngs_modulus_gpa: f64,
    pub poisson_ratio: f64,
    /// 0.2% offset yield strength (MPa)
    pub yield_strength_mpa: f64,
    /// Ultimate tensile strength (MPa)
    pub tensile_strength_mpa: f64,
    /// Elongation at fracture (fraction)
    pub elongation: f64,
    /// Density (kg/m³)
    pub density_kg_m3: f64,
    /// Linear expansion coefficient (1/K)
    pub expansion_coefficient: f64,
    /// Thermal conductivity (W/(m·K))
    pub thermal_conductivity: f64,
    /// Specific heat (J/(kg·K))
    pub specific_heat: f64,
    /// Endurance limit, or fatigue strength at 5·10⁸ cycles for aluminium (MPa)
    pub endurance_limit_mpa: f64,
}

impl MaterialProperties {
    /// Properties needed to draw a stress-strain curve
    pub fn tensile_properties(&self) -> TensileProperties {
        TensileProperties {
            youngs_modulus_gpa: self.youngs_modulus_gpa,
            yield_strength_mpa: self.yield_strength_mpa,
            tensile_strength_mpa: self.tensile_strength_mpa,
            elongation: self.elongation,
        }
    }

    /// Fatigue input with strengths taken from this material
    pub fn fatigue_input(&self, stress_amplitude: f64, mean_stress: f64, model: MeanStressModel) -> FatigueInput {
        FatigueInput {
            stress_amplitude,
            mean_stress,
            tensile_strength: self.tensile_strength_mpa,
            yield_strength: Some(self.yield_strength_mpa),
            endurance_limit: self.endurance_limit_mpa,
            model,
        }
    }
}

static CATALOG: &[MaterialProperties] = &[
    MaterialProperties {
        key: "1020",
        name: "AISI 1020 Steel",
        condition: "Hot rolled",
        youngs_modulus_gpa: 207.0,
        poisson_ratio: 0.30,
        yield_strength_mpa: 210.0,
        tensile_strength_mpa: 380.0,
        elongation: 0.25,
        density_kg_m3: 7850.0,
        expansion_coefficient: 11.7e-6,
        thermal_conductivity: 51.9,
        specific_heat: 486.0,
        endurance_limit_mpa: 190.0,
    },
    MaterialProperties {
        key: "4340",
        name: "AISI 4340 Steel",
        condition: "Quenched and tempered at 315 C",
        youngs_modulus_gpa: 205.0,
        poisson_ratio: 0.29,
        yield_strength_mpa: 1470.0,
        tensile_strength_mpa: 1720.0,
        elongation: 0.10,
        density_kg_m3: 7850.0,
        expansion_coefficient: 12.3e-6,
        thermal_conductivity: 44.5,
        specific_heat: 475.0,
        endurance_limit_mpa: 700.0,
    },
    MaterialProperties {
        key: "304",
        name: "AISI 304 Stainless Steel",
        condition: "Annealed",
        youngs_modulus_gpa: 193.0,
        poisson_ratio: 0.29,
        yield_strength_mpa: 215.0,
        tensile_strength_mpa: 505.0,
        elongation: 0.40,
        density_kg_m3: 8000.0,
        expansion_coefficient: 17.3e-6,
        thermal_conductivity: 16.2,
        specific_heat: 500.0,
        endurance_limit_mpa: 240.0,
    },
    MaterialProperties {
        key: "6061-T6",
        name: "Aluminum 6061",
        condition: "T6",
        youngs_modulus_gpa: 69.0,
        poisson_ratio: 0.33,
        yield_strength_mpa: 276.0,
        tensile_strength_mpa: 310.0,
        elongation: 0.12,
        density_kg_m3: 2700.0,
        expansion_coefficient: 23.6e-6,
        thermal_conductivity: 167.0,
        specific_heat: 896.0,
        endurance_limit_mpa: 97.0,
    },
    MaterialProperties {
        key: "7075-T6",
        name: "Aluminum 7075",
        condition: "T6",
        youngs_modulus_gpa: 71.7,
        poisson_ratio: 0.33,
        yield_strength_mpa: 503.0,
        tensile_strength_mpa: 572.0,
        elongation: 0.11,
        density_kg_m3: 2810.0,
        expansion_coefficient: 23.4e-6,
        thermal_conductivity: 130.0,
        specific_heat: 960.0,
        endurance_limit_mpa: 159.0,
    },
    MaterialProperties {
        key: "Ti-6Al-4V",
        name: "Titanium Ti-6Al-4V",
        condition: "Annealed",
        youngs_modulus_gpa: 114.0,
        poisson_ratio: 0.34,
        yield_strength_mpa: 880.0,
        tensile_strength_mpa: 950.0,
        elongation: 0.14,
        density_kg_m3: 4430.0,
        expansion_coefficient: 8.6e-6,
        thermal_conductivity: 6.7,
        specific_heat: 526.0,
        endurance_limit_mpa: 510.0,
    },
    MaterialProperties {
        key: "C11000",
        name: "Copper C11000",
        condition: "Annealed",
        youngs_modulus_gpa: 115.0,
        poisson_ratio: 0.31,
        yield_strength_mpa: 69.0,
        tensile_strength_mpa: 220.0,
        elongation: 0.45,
        density_kg_m3: 8890.0,
        expansion_coefficient: 17.0e-6,
        thermal_conductivity: 388.0,
        specific_heat: 385.0,
        endurance_limit_mpa: 76.0,
    },
];

/// Every catalog entry
pub fn all() -> &'static [MaterialProperties] {
    CATALOG
}

/// Look up a material by key, ignoring case.
pub fn find(key: &str) -> CalcResult<&'static MaterialProperties> {
    let key = key.trim();
    CATALOG
        .iter()
        .find(|m| m.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| CalcError::material_not_found(key))
}
