//! # Formula Registry
//!
//! Central registry of the scalar material formulas. Each formula carries
//! metadata (formula text, input schema, units, reference, source location)
//! and can be evaluated from a key/value map of inputs.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe formula identification via the `Formula` enum
//! - Lookup by stable string id (`Formula::from_id`)
//! - Input-schema validation before any arithmetic runs
//! - Markdown generation for the audit reference (`FORMULAS.md`)
//!
//! ## Usage
//!
//! ```rust
//! use matprop_core::formulas::registry::{Formula, FormulaInputs};
//!
//! let formula = Formula::from_id("stress").unwrap();
//! let mut inputs = FormulaInputs::new();
//! inputs.insert("force_n".to_string(), 10_000.0);
//! inputs.insert("area_mm2".to_string(), 50.0);
//!
//! assert_eq!(formula.evaluate(&inputs).unwrap(), 200.0);
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

use crate::errors::{require_finite, CalcError, CalcResult};
use crate::formulas::crystal::{cell_volume, CrystalSystem, LatticeParameters};
use crate::formulas::fatigue::{equivalent_stress, MeanStressModel};
use crate::formulas::fracture::{stress_intensity, FractureInput, Geometry};
use crate::formulas::{creep, hardness, mechanics, physical};
use crate::units::Celsius;

/// Named inputs for `Formula::evaluate`
pub type FormulaInputs = HashMap<String, f64>;

// ============================================================================
// References
// ============================================================================

/// Textbook or standard a formula is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Reference {
    /// Callister, Materials Science and Engineering: An Introduction
    Callister { edition: u8, chapter: u8 },
    /// Shigley's Mechanical Engineering Design
    Shigley { edition: u8, section: &'static str },
    /// Dieter, Mechanical Metallurgy
    Dieter { edition: u8, chapter: u8 },
    /// ASTM standard
    Astm { standard: &'static str, section: &'static str },
    /// Fundamental mechanics (no specific reference needed)
    Mechanics,
}

impl Reference {
    pub fn citation(&self) -> String {
        match self {
            Reference::Callister { edition, chapter } => {
                format!("Callister {}ed, Ch. {}", edition, chapter)
            }
            Reference::Shigley { edition, section } => {
                format!("Shigley {}ed, Section {}", edition, section)
            }
            Reference::Dieter { edition, chapter } => {
                format!("Dieter {}ed, Ch. {}", edition, chapter)
            }
            Reference::Astm { standard, section } => format!("ASTM {} {}", standard, section),
            Reference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormulaCategory {
    Mechanics,
    Physical,
    Fatigue,
    Creep,
    Fracture,
    Hardness,
    Crystallography,
}

impl FormulaCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Mechanics => "Mechanical Properties",
            FormulaCategory::Physical => "Physical Properties",
            FormulaCategory::Fatigue => "Fatigue",
            FormulaCategory::Creep => "Creep",
            FormulaCategory::Fracture => "Fracture Toughness",
            FormulaCategory::Hardness => "Hardness",
            FormulaCategory::Crystallography => "Crystallography",
        }
    }

    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaCategory::Mechanics => 1,
            FormulaCategory::Physical => 2,
            FormulaCategory::Fatigue => 3,
            FormulaCategory::Creep => 4,
            FormulaCategory::Fracture => 5,
            FormulaCategory::Hardness => 6,
            FormulaCategory::Crystallography => 7,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// One declared input of a formula.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaInput {
    /// Key in `FormulaInputs`
    pub key: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    /// Representative value, used in documentation and smoke tests
    pub example: f64,
}

impl FormulaInput {
    pub const fn new(key: &'static str, description: &'static str, unit: &'static str, example: f64) -> Self {
        Self { key, description, unit, example }
    }
}

/// Complete metadata for a registered formula.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Inputs in evaluation order
    pub inputs: Vec<FormulaInput>,
    /// Unit of the result
    pub unit: &'static str,
    pub category: FormulaCategory,
    pub reference: Reference,
    pub assumptions: Vec<&'static str>,
    /// Source module where the implementation lives
    pub source_module: &'static str,
    /// Function implementing the formula
    pub source_function: &'static str,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// Every scalar formula exposed through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
pub enum Formula {
    // -------------------------------------------------------------------------
    // Mechanics
    // -------------------------------------------------------------------------
    /// σ = F/A
    Stress,
    /// ε = ΔL/L0
    Strain,
    /// E = σ/ε
    YoungsModulus,
    /// G = E/(2(1+ν))
    ShearModulus,
    /// K = E/(3(1−2ν))
    BulkModulus,
    /// σ = E·α·ΔT
    ThermalStress,
    /// n = σy/σ
    SafetyFactor,

    // -------------------------------------------------------------------------
    // Physical
    // -------------------------------------------------------------------------
    /// ρ = nM/(N_A·Vc)
    TheoreticalDensity,
    /// α = k/(ρ·Cp)
    ThermalDiffusivity,
    /// σ = 1/ρ
    ElectricalConductivity,

    // -------------------------------------------------------------------------
    // Fatigue
    // -------------------------------------------------------------------------
    GoodmanEquivalent,
    GerberEquivalent,
    SoderbergEquivalent,

    // -------------------------------------------------------------------------
    // Creep
    // -------------------------------------------------------------------------
    NortonCreepRate,
    LarsonMillerRuptureTime,

    // -------------------------------------------------------------------------
    // Fracture
    // -------------------------------------------------------------------------
    CompactTensionToughness,
    SenbToughness,

    // -------------------------------------------------------------------------
    // Hardness and crystallography
    // -------------------------------------------------------------------------
    HardnessTensileEstimate,
    CubicCellVolume,
}

/// All formulas in the registry (for iteration)
pub static ALL_FORMULAS: &[Formula] = &[
    Formula::Stress,
    Formula::Strain,
    Formula::YoungsModulus,
    Formula::ShearModulus,
    Formula::BulkModulus,
    Formula::ThermalStress,
    Formula::SafetyFactor,
    Formula::TheoreticalDensity,
    Formula::ThermalDiffusivity,
    Formula::ElectricalConductivity,
    Formula::GoodmanEquivalent,
    Formula::GerberEquivalent,
    Formula::SoderbergEquivalent,
    Formula::NortonCreepRate,
    Formula::LarsonMillerRuptureTime,
    Formula::CompactTensionToughness,
    Formula::SenbToughness,
    Formula::HardnessTensileEstimate,
    Formula::CubicCellVolume,
];

static BY_ID: Lazy<HashMap<&'static str, Formula>> =
    Lazy::new(|| ALL_FORMULAS.iter().map(|f| (f.id(), *f)).collect());

impl Formula {
    /// Stable identifier used on the command line and in JSON
    pub fn id(&self) -> &'static str {
        match self {
            Formula::Stress => "stress",
            Formula::Strain => "strain",
            Formula::YoungsModulus => "youngs_modulus",
            Formula::ShearModulus => "shear_modulus",
            Formula::BulkModulus => "bulk_modulus",
            Formula::ThermalStress => "thermal_stress",
            Formula::SafetyFactor => "safety_factor",
            Formula::TheoreticalDensity => "theoretical_density",
            Formula::ThermalDiffusivity => "thermal_diffusivity",
            Formula::ElectricalConductivity => "electrical_conductivity",
            Formula::GoodmanEquivalent => "goodman",
            Formula::GerberEquivalent => "gerber",
            Formula::SoderbergEquivalent => "soderberg",
            Formula::NortonCreepRate => "norton_creep_rate",
            Formula::LarsonMillerRuptureTime => "larson_miller_rupture",
            Formula::CompactTensionToughness => "ct_toughness",
            Formula::SenbToughness => "senb_toughness",
            Formula::HardnessTensileEstimate => "hardness_tensile_estimate",
            Formula::CubicCellVolume => "cubic_cell_volume",
        }
    }

    /// Look up a formula by id.
    pub fn from_id(id: &str) -> CalcResult<Formula> {
        BY_ID
            .get(id.trim())
            .copied()
            .ok_or_else(|| CalcError::unknown_formula(id))
    }

    /// Get the full metadata for this formula
    pub fn metadata(&self) -> FormulaMetadata {
        let id = self.id();
        match self {
            Formula::Stress => FormulaMetadata {
                id,
                name: "Engineering Stress",
                description: "Normal stress from an axial force over the original cross-section",
                formula_plain: "sigma = F / A",
                inputs: vec![
                    FormulaInput::new("force_n", "Axial force", "N", 10_000.0),
                    FormulaInput::new("area_mm2", "Original cross-sectional area", "mm^2", 50.0),
                ],
                unit: "MPa",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec!["Uniform stress over the section"],
                source_module: "formulas/mechanics.rs",
                source_function: "stress",
            },

            Formula::Strain => FormulaMetadata {
                id,
                name: "Engineering Strain",
                description: "Elongation relative to the original gauge length",
                formula_plain: "epsilon = dL / L0",
                inputs: vec![
                    FormulaInput::new("delta_length", "Change in length", "mm", 0.5),
                    FormulaInput::new("original_length", "Original gauge length", "mm", 50.0),
                ],
                unit: "-",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec![],
                source_module: "formulas/mechanics.rs",
                source_function: "strain",
            },

            Formula::YoungsModulus => FormulaMetadata {
                id,
                name: "Young's Modulus",
                description: "Slope of the linear elastic region",
                formula_plain: "E = sigma / epsilon",
                inputs: vec![
                    FormulaInput::new("stress", "Stress in the elastic region", "MPa", 200.0),
                    FormulaInput::new("strain", "Corresponding strain", "-", 0.001),
                ],
                unit: "MPa",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec!["Linear elastic (Hooke's law)"],
                source_module: "formulas/mechanics.rs",
                source_function: "youngs_modulus",
            },

            Formula::ShearModulus => FormulaMetadata {
                id,
                name: "Shear Modulus",
                description: "Shear modulus of an isotropic solid",
                formula_plain: "G = E / (2(1 + nu))",
                inputs: vec![
                    FormulaInput::new("youngs_modulus", "Young's modulus", "GPa", 200.0),
                    FormulaInput::new("poisson_ratio", "Poisson's ratio", "-", 0.3),
                ],
                unit: "GPa",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec!["Isotropic", "-1 < nu <= 0.5"],
                source_module: "formulas/mechanics.rs",
                source_function: "shear_modulus",
            },

            Formula::BulkModulus => FormulaMetadata {
                id,
                name: "Bulk Modulus",
                description: "Resistance to uniform compression of an isotropic solid",
                formula_plain: "K = E / (3(1 - 2nu))",
                inputs: vec![
                    FormulaInput::new("youngs_modulus", "Young's modulus", "GPa", 200.0),
                    FormulaInput::new("poisson_ratio", "Poisson's ratio", "-", 0.3),
                ],
                unit: "GPa",
                category: FormulaCategory::Mechanics,
                reference: Reference::Mechanics,
                assumptions: vec!["Isotropic", "Undefined at nu = 0.5 (incompressible)"],
                source_module: "formulas/mechanics.rs",
                source_function: "bulk_modulus",
            },

            Formula::ThermalStress => FormulaMetadata {
                id,
                name: "Thermal Stress",
                description: "Stress in a fully constrained bar after a temperature change",
                formula_plain: "sigma = E * 1000 * alpha * dT",
                inputs: vec![
                    FormulaInput::new("youngs_modulus", "Young's modulus", "GPa", 200.0),
                    FormulaInput::new("expansion_coefficient", "Linear expansion coefficient", "1/K", 12e-6),
                    FormulaInput::new("delta_t", "Temperature change", "K", 100.0),
                ],
                unit: "MPa",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 19 },
                assumptions: vec!["Full axial constraint", "Linear elastic"],
                source_module: "formulas/mechanics.rs",
                source_function: "thermal_stress",
            },

            Formula::SafetyFactor => FormulaMetadata {
                id,
                name: "Safety Factor",
                description: "Ratio of yield strength to applied stress",
                formula_plain: "n = sigma_y / sigma",
                inputs: vec![
                    FormulaInput::new("yield_strength", "Yield strength", "MPa", 250.0),
                    FormulaInput::new("applied_stress", "Applied stress", "MPa", 100.0),
                ],
                unit: "-",
                category: FormulaCategory::Mechanics,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec![],
                source_module: "formulas/mechanics.rs",
                source_function: "safety_factor",
            },

            Formula::TheoreticalDensity => FormulaMetadata {
                id,
                name: "Theoretical Density",
                description: "Density of a perfect crystal from its unit cell",
                formula_plain: "rho = n * M / (N_A * Vc)",
                inputs: vec![
                    FormulaInput::new("atoms_per_cell", "Atoms per unit cell", "-", 4.0),
                    FormulaInput::new("molar_mass", "Molar mass", "g/mol", 63.55),
                    FormulaInput::new("cell_volume_cm3", "Unit cell volume", "cm^3", 4.724e-23),
                ],
                unit: "g/cm^3",
                category: FormulaCategory::Physical,
                reference: Reference::Callister { edition: 10, chapter: 3 },
                assumptions: vec!["No vacancies or impurities", "N_A = 6.022e23"],
                source_module: "formulas/physical.rs",
                source_function: "theoretical_density",
            },

            Formula::ThermalDiffusivity => FormulaMetadata {
                id,
                name: "Thermal Diffusivity",
                description: "Rate at which temperature changes propagate",
                formula_plain: "alpha = k / (rho * Cp)",
                inputs: vec![
                    FormulaInput::new("conductivity", "Thermal conductivity", "W/(m K)", 237.0),
                    FormulaInput::new("density", "Density", "kg/m^3", 2700.0),
                    FormulaInput::new("specific_heat", "Specific heat", "J/(kg K)", 900.0),
                ],
                unit: "m^2/s",
                category: FormulaCategory::Physical,
                reference: Reference::Callister { edition: 10, chapter: 19 },
                assumptions: vec![],
                source_module: "formulas/physical.rs",
                source_function: "thermal_diffusivity",
            },

            Formula::ElectricalConductivity => FormulaMetadata {
                id,
                name: "Electrical Conductivity",
                description: "Reciprocal of electrical resistivity",
                formula_plain: "sigma = 1 / rho",
                inputs: vec![FormulaInput::new("resistivity", "Electrical resistivity", "Ohm m", 1.68e-8)],
                unit: "S/m",
                category: FormulaCategory::Physical,
                reference: Reference::Callister { edition: 10, chapter: 18 },
                assumptions: vec![],
                source_module: "formulas/physical.rs",
                source_function: "conductivity",
            },

            Formula::GoodmanEquivalent => FormulaMetadata {
                id,
                name: "Goodman Equivalent Stress",
                description: "Fully reversed amplitude equivalent to a mean-loaded cycle",
                formula_plain: "Seq = Sa / (1 - Sm/Su)",
                inputs: vec![
                    FormulaInput::new("stress_amplitude", "Alternating stress Sa", "MPa", 200.0),
                    FormulaInput::new("mean_stress", "Mean stress Sm", "MPa", 50.0),
                    FormulaInput::new("tensile_strength", "Ultimate tensile strength Su", "MPa", 600.0),
                ],
                unit: "MPa",
                category: FormulaCategory::Fatigue,
                reference: Reference::Shigley { edition: 10, section: "6-12" },
                assumptions: vec!["Linear mean-stress line to Su", "Sm < Su"],
                source_module: "formulas/fatigue.rs",
                source_function: "equivalent_stress",
            },

            Formula::GerberEquivalent => FormulaMetadata {
                id,
                name: "Gerber Equivalent Stress",
                description: "Parabolic mean-stress correction",
                formula_plain: "Seq = Sa / (1 - (Sm/Su)^2)",
                inputs: vec![
                    FormulaInput::new("stress_amplitude", "Alternating stress Sa", "MPa", 200.0),
                    FormulaInput::new("mean_stress", "Mean stress Sm", "MPa", 50.0),
                    FormulaInput::new("tensile_strength", "Ultimate tensile strength Su", "MPa", 600.0),
                ],
                unit: "MPa",
                category: FormulaCategory::Fatigue,
                reference: Reference::Shigley { edition: 10, section: "6-12" },
                assumptions: vec!["|Sm| < Su"],
                source_module: "formulas/fatigue.rs",
                source_function: "equivalent_stress",
            },

            Formula::SoderbergEquivalent => FormulaMetadata {
                id,
                name: "Soderberg Equivalent Stress",
                description: "Conservative mean-stress correction against yield",
                formula_plain: "Seq = Sa / (1 - Sm/Sy)",
                inputs: vec![
                    FormulaInput::new("stress_amplitude", "Alternating stress Sa", "MPa", 200.0),
                    FormulaInput::new("mean_stress", "Mean stress Sm", "MPa", 50.0),
                    FormulaInput::new("yield_strength", "Yield strength Sy", "MPa", 450.0),
                ],
                unit: "MPa",
                category: FormulaCategory::Fatigue,
                reference: Reference::Shigley { edition: 10, section: "6-12" },
                assumptions: vec!["Sm < Sy"],
                source_module: "formulas/fatigue.rs",
                source_function: "equivalent_stress",
            },

            Formula::NortonCreepRate => FormulaMetadata {
                id,
                name: "Norton Creep Rate",
                description: "Steady-state creep rate with Arrhenius temperature dependence",
                formula_plain: "rate = A * sigma^n * exp(-Q / (R * T))",
                inputs: vec![
                    FormulaInput::new("coefficient", "Material constant A", "-", 1e-5),
                    FormulaInput::new("stress_mpa", "Applied stress", "MPa", 100.0),
                    FormulaInput::new("exponent", "Stress exponent n", "-", 5.0),
                    FormulaInput::new("activation_energy", "Activation energy Q", "J/mol", 300_000.0),
                    FormulaInput::new("temperature_c", "Temperature", "C", 726.85),
                ],
                unit: "1/s",
                category: FormulaCategory::Creep,
                reference: Reference::Dieter { edition: 3, chapter: 13 },
                assumptions: vec!["Secondary (steady-state) creep", "R = 8.314 J/(mol K)"],
                source_module: "formulas/creep.rs",
                source_function: "norton_creep_rate",
            },

            Formula::LarsonMillerRuptureTime => FormulaMetadata {
                id,
                name: "Larson-Miller Rupture Time",
                description: "Time to creep rupture from the Larson-Miller parameter",
                formula_plain: "log10(tr) = LMP / T - C,  LMP = 22000 - 20 * sigma",
                inputs: vec![
                    FormulaInput::new("stress_mpa", "Applied stress", "MPa", 100.0),
                    FormulaInput::new("temperature_c", "Temperature", "C", 726.85),
                    FormulaInput::new("constant", "Larson-Miller constant C", "-", 20.0),
                ],
                unit: "h",
                category: FormulaCategory::Creep,
                reference: Reference::Dieter { edition: 3, chapter: 13 },
                assumptions: vec![
                    "LMP from a linear stress correlation, not a material master curve",
                    "Order-of-magnitude estimate without alloy calibration",
                ],
                source_module: "formulas/creep.rs",
                source_function: "rupture_time_hours",
            },

            Formula::CompactTensionToughness => FormulaMetadata {
                id,
                name: "Compact Tension Stress Intensity",
                description: "Conditional fracture toughness K_Q of a C(T) specimen",
                formula_plain: "K = P / (B * sqrt(W)) * f(a/W)",
                inputs: vec![
                    FormulaInput::new("load_kn", "Critical load P_Q", "kN", 20.0),
                    FormulaInput::new("thickness_mm", "Thickness B", "mm", 25.0),
                    FormulaInput::new("width_mm", "Width W", "mm", 50.0),
                    FormulaInput::new("crack_length_mm", "Crack length a", "mm", 25.0),
                ],
                unit: "MPa sqrt(m)",
                category: FormulaCategory::Fracture,
                reference: Reference::Astm { standard: "E399", section: "Annex A4" },
                assumptions: vec!["0.1 <= a/W <= 0.9", "Linear elastic fracture mechanics"],
                source_module: "formulas/fracture.rs",
                source_function: "stress_intensity",
            },

            Formula::SenbToughness => FormulaMetadata {
                id,
                name: "Single-Edge Bend Stress Intensity",
                description: "Conditional fracture toughness K_Q of an SE(B) specimen in three-point bending",
                formula_plain: "K = P * S / (B * W^1.5) * f(a/W)",
                inputs: vec![
                    FormulaInput::new("load_kn", "Critical load P_Q", "kN", 10.0),
                    FormulaInput::new("span_mm", "Support span S", "mm", 80.0),
                    FormulaInput::new("thickness_mm", "Thickness B", "mm", 10.0),
                    FormulaInput::new("width_mm", "Width W", "mm", 20.0),
                    FormulaInput::new("crack_length_mm", "Crack length a", "mm", 10.0),
                ],
                unit: "MPa sqrt(m)",
                category: FormulaCategory::Fracture,
                reference: Reference::Astm { standard: "E399", section: "Annex A3" },
                assumptions: vec!["0.1 <= a/W <= 0.9", "S = 4W nominal"],
                source_module: "formulas/fracture.rs",
                source_function: "stress_intensity",
            },

            Formula::HardnessTensileEstimate => FormulaMetadata {
                id,
                name: "Tensile Strength from Hardness",
                description: "Empirical tensile strength estimate from Vickers hardness",
                formula_plain: "UTS = 3.3 * HV",
                inputs: vec![FormulaInput::new("hv", "Vickers hardness", "HV", 200.0)],
                unit: "MPa",
                category: FormulaCategory::Hardness,
                reference: Reference::Callister { edition: 10, chapter: 6 },
                assumptions: vec!["Plain carbon and low-alloy steels"],
                source_module: "formulas/hardness.rs",
                source_function: "estimate_tensile_strength",
            },

            Formula::CubicCellVolume => FormulaMetadata {
                id,
                name: "Cubic Cell Volume",
                description: "Volume of a cubic unit cell",
                formula_plain: "V = a^3",
                inputs: vec![FormulaInput::new("a", "Lattice parameter", "Angstrom", 4.05)],
                unit: "Angstrom^3",
                category: FormulaCategory::Crystallography,
                reference: Reference::Callister { edition: 10, chapter: 3 },
                assumptions: vec![],
                source_module: "formulas/crystal.rs",
                source_function: "cell_volume",
            },
        }
    }

    /// Evaluate the formula after checking every declared input is present
    /// and finite.
    ///
    /// # Errors
    /// `MissingField` for an absent key, `InvalidInput` for NaN or infinity,
    /// then whatever the underlying formula reports.
    pub fn evaluate(&self, inputs: &FormulaInputs) -> CalcResult<f64> {
        let meta = self.metadata();
        let mut values = Vec::with_capacity(meta.inputs.len());
        for input in &meta.inputs {
            let value = inputs
                .get(input.key)
                .copied()
                .ok_or_else(|| CalcError::missing_field(input.key))?;
            values.push(require_finite(input.key, value)?);
        }
        debug!(formula = meta.id, "evaluating registered formula");
        self.apply(&values)
    }

    /// Evaluate with each input set to its documented example value
    pub fn evaluate_example(&self) -> CalcResult<f64> {
        let inputs = self
            .metadata()
            .inputs
            .iter()
            .map(|i| (i.key.to_string(), i.example))
            .collect();
        self.evaluate(&inputs)
    }

    // `v` is ordered and sized like `metadata().inputs`
    fn apply(&self, v: &[f64]) -> CalcResult<f64> {
        match self {
            Formula::Stress => mechanics::stress(v[0], v[1]),
            Formula::Strain => mechanics::strain(v[0], v[1]),
            Formula::YoungsModulus => mechanics::youngs_modulus(v[0], v[1]),
            Formula::ShearModulus => mechanics::shear_modulus(v[0], v[1]),
            Formula::BulkModulus => mechanics::bulk_modulus(v[0], v[1]),
            Formula::ThermalStress => mechanics::thermal_stress(v[0], v[1], v[2]),
            Formula::SafetyFactor => mechanics::safety_factor(v[0], v[1]),
            Formula::TheoreticalDensity => physical::theoretical_density(v[0], v[1], v[2]),
            Formula::ThermalDiffusivity => physical::thermal_diffusivity(v[0], v[1], v[2]),
            Formula::ElectricalConductivity => physical::conductivity(v[0]),
            Formula::GoodmanEquivalent => equivalent_stress(MeanStressModel::Goodman, v[0], v[1], v[2], None),
            Formula::GerberEquivalent => equivalent_stress(MeanStressModel::Gerber, v[0], v[1], v[2], None),
            Formula::SoderbergEquivalent => {
                // Ultimate strength is unused by Soderberg; pass yield for both
                equivalent_stress(MeanStressModel::Soderberg, v[0], v[1], v[2], Some(v[2]))
            }
            Formula::NortonCreepRate => creep::norton_creep_rate(v[0], v[1], v[2], v[3], Celsius(v[4])),
            Formula::LarsonMillerRuptureTime => creep::rupture_time_hours(v[0], Celsius(v[1]), v[2]),
            Formula::CompactTensionToughness => stress_intensity(&FractureInput {
                geometry: Geometry::CompactTension,
                load_kn: v[0],
                thickness_mm: v[1],
                width_mm: v[2],
                crack_length_mm: v[3],
                yield_strength_mpa: None,
            })
            .map(|r| r.stress_intensity),
            Formula::SenbToughness => stress_intensity(&FractureInput {
                geometry: Geometry::SingleEdgeBend { span_mm: v[1] },
                load_kn: v[0],
                thickness_mm: v[2],
                width_mm: v[3],
                crack_length_mm: v[4],
                yield_strength_mpa: None,
            })
            .map(|r| r.stress_intensity),
            Formula::HardnessTensileEstimate => hardness::estimate_tensile_strength(v[0]),
            Formula::CubicCellVolume => {
                cell_volume(CrystalSystem::Sc, &LatticeParameters::cubic(v[0])).map(|volume| volume.0)
            }
        }
    }

    /// Get all formulas in a given category
    pub fn in_category(category: FormulaCategory) -> Vec<Formula> {
        ALL_FORMULAS
            .iter()
            .filter(|f| f.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in display order
    pub fn all_categories() -> Vec<FormulaCategory> {
        use FormulaCategory::*;
        let mut cats = vec![Mechanics, Physical, Fatigue, Creep, Fracture, Hardness, Crystallography];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

impl FromStr for Formula {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::from_id(s)
    }
}

// ============================================================================
// Markdown Generation
// ============================================================================

/// Generate the formula reference document (`FORMULAS.md`).
pub fn generate_formulas_markdown() -> String {
    let mut output = String::with_capacity(24_000);

    output.push_str(
        r#"# MatProp Formula Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

This document lists every scalar formula available through `matprop eval`.
Each entry gives its id, formula, inputs with units, reference, source
location and assumptions.

## Unit Conventions

| Quantity | Unit |
|----------|------|
| Stress, strength | MPa |
| Elastic moduli | GPa (MPa where noted) |
| Temperature input | degrees C |
| Specimen dimensions | mm |
| Load (fracture) | kN |
| Lattice parameters | Angstrom |

---

"#,
    );

    let categories = Formula::all_categories();

    for category in &categories {
        let formulas = Formula::in_category(*category);
        if formulas.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in formulas {
            let meta = formula.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Id:** `{}`\n\n", meta.id));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            output.push_str("**Inputs:**\n\n");
            output.push_str("| Key | Description | Units | Example |\n");
            output.push_str("|-----|-------------|-------|---------|\n");
            for input in &meta.inputs {
                output.push_str(&format!(
                    "| `{}` | {} | {} | {} |\n",
                    input.key, input.description, input.unit, input.example
                ));
            }
            output.push('\n');

            output.push_str(&format!("**Result:** {}\n\n", meta.unit));
            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Formulas:** {}\n- **Categories:** {}\n\n",
        ALL_FORMULAS.len(),
        categories.len()
    ));

    output.push_str(
        r#"## How to Audit

1. Find the formula you want to verify in the sections above
2. Check the **Reference** for the original source
3. Follow the **Source** link to the implementation
4. Run `matprop eval <id> key=value ...` to reproduce a number
5. Run `cargo test` to verify formulas against known values
"#,
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, f64)]) -> FormulaInputs {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_all_formulas_have_metadata() {
        assert_eq!(ALL_FORMULAS.len(), 19);

        for formula in ALL_FORMULAS {
            let meta = formula.metadata();
            assert!(!meta.name.is_empty(), "Formula {:?} has no name", formula);
            assert!(!meta.formula_plain.is_empty(), "Formula {:?} has no formula", formula);
            assert!(!meta.inputs.is_empty(), "Formula {:?} has no inputs", formula);
            assert!(!meta.source_module.is_empty(), "Formula {:?} missing source_module", formula);
            assert!(!meta.source_function.is_empty(), "Formula {:?} missing source_function", formula);
        }
    }

    #[test]
    fn test_every_example_evaluates() {
        for formula in ALL_FORMULAS {
            let value = formula.evaluate_example();
            assert!(
                matches!(value, Ok(v) if v.is_finite()),
                "Formula {} example failed: {:?}",
                formula.id(),
                value
            );
        }
    }

    #[test]
    fn test_ids_are_unique_and_resolvable() {
        for formula in ALL_FORMULAS {
            assert_eq!(Formula::from_id(formula.id()).unwrap(), *formula);
        }
        assert_eq!(BY_ID.len(), ALL_FORMULAS.len());
    }

    #[test]
    fn test_unknown_id() {
        let err = Formula::from_id("von_mises").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FORMULA");
        assert!("goodman".parse::<Formula>().is_ok());
    }

    #[test]
    fn test_fatigue_values() {
        let goodman = Formula::GoodmanEquivalent.evaluate_example().unwrap();
        assert!((goodman - 218.1818).abs() < 1e-3, "Goodman = {}", goodman);

        let soderberg = Formula::SoderbergEquivalent.evaluate_example().unwrap();
        assert!((soderberg - 225.0).abs() < 1e-9, "Soderberg = {}", soderberg);
    }

    #[test]
    fn test_missing_input() {
        let err = Formula::Stress.evaluate(&inputs(&[("force_n", 100.0)])).unwrap_err();
        assert!(matches!(err, CalcError::MissingField { ref field } if field == "area_mm2"));
        assert_eq!(err.display_label(), "N/A");
    }

    #[test]
    fn test_non_finite_input() {
        let err = Formula::Stress
            .evaluate(&inputs(&[("force_n", f64::NAN), ("area_mm2", 10.0)]))
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_domain_error_propagates() {
        let err = Formula::Stress
            .evaluate(&inputs(&[("force_n", 100.0), ("area_mm2", 0.0)]))
            .unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_extra_inputs_ignored() {
        let value = Formula::ElectricalConductivity
            .evaluate(&inputs(&[("resistivity", 2.0), ("unused", 1.0)]))
            .unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Formula::all_categories();
        let orders: Vec<u8> = cats.iter().map(|c| c.sort_order()).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert!(cats.iter().all(|c| !Formula::in_category(*c).is_empty()));
    }

    #[test]
    fn test_reference_citation() {
        assert_eq!(Reference::Callister { edition: 10, chapter: 6 }.citation(), "Callister 10ed, Ch. 6");
        assert_eq!(
            Reference::Astm { standard: "E399", section: "Annex A4" }.citation(),
            "ASTM E399 Annex A4"
        );
    }

    #[test]
    fn test_generate_formulas_markdown() {
        let markdown = generate_formulas_markdown();

        assert!(markdown.contains("# MatProp Formula Reference"), "Missing title");
        assert!(markdown.contains("Auto-generated from source code"), "Missing auto-gen notice");
        assert!(markdown.contains("## Unit Conventions"));

        for category in Formula::all_categories() {
            assert!(
                markdown.contains(&format!("## {}", category.display_name())),
                "Missing category {}",
                category.display_name()
            );
        }

        assert!(markdown.contains("### Goodman Equivalent Stress"));
        assert!(markdown.contains("`Seq = Sa / (1 - Sm/Su)`"));
        assert!(markdown.contains("**Id:** `ct_toughness`"));
        assert!(markdown.contains("ASTM E399"));
        assert!(markdown.contains("formulas/fracture.rs"));

        assert!(markdown.contains("**Total Formulas:** 19"));
        assert!(markdown.contains("**Categories:** 7"));
        assert!(markdown.contains("## How to Audit"));
    }
}
