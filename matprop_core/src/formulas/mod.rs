//! # Material Formulas
//!
//! Closed-form relations used across the dashboard. Every formula validates
//! its arguments and returns `CalcResult`; division by zero, logarithms of
//! non-positive values and non-finite results surface as
//! `CalcError::Domain` instead of NaN or infinity.
//!
//! ## Modules
//!
//! - [`mechanics`] - Stress, strain, elastic constants, stress-strain curves
//! - [`physical`] - Density, thermal diffusivity, conductivity
//! - [`fatigue`] - Mean-stress correction and Basquin life
//! - [`creep`] - Norton creep rate and Larson-Miller rupture time
//! - [`fracture`] - ASTM E399 stress intensity for C(T) and SE(B)
//! - [`hardness`] - HV / HRC / HRB / HB conversion
//! - [`crystal`] - Cell volume, theoretical density, XRD peaks
//! - [`registry`] - Formula metadata, lookup by id, `FORMULAS.md` generation
//!
//! ## Units
//!
//! - **Stress**: MPa
//! - **Moduli**: GPa unless a function says otherwise
//! - **Temperature**: °C at the API, converted to K internally
//! - **Lengths**: mm for specimens, Å for lattices
//!
//! ## References
//!
//! - Callister, Materials Science and Engineering, 10th Edition
//! - Shigley's Mechanical Engineering Design, 10th Edition
//! - Dieter, Mechanical Metallurgy, 3rd Edition
//! - ASTM E399: Linear-Elastic Plane-Strain Fracture Toughness

pub mod creep;
pub mod crystal;
pub mod fatigue;
pub mod fracture;
pub mod hardness;
pub mod mechanics;
pub mod physical;
pub mod registry;

pub use crystal::{CrystalResult, CrystalSystem, LatticeParameters, XrdPeak};
pub use fatigue::{FatigueInput, FatigueLife, FatigueResult, MeanStressModel};
pub use fracture::{FractureInput, FractureResult, Geometry};
pub use hardness::{HardnessReading, HardnessScale};
pub use mechanics::{StressStrainCurve, TensileProperties};
pub use registry::{generate_formulas_markdown, Formula, FormulaCategory, FormulaInputs, FormulaMetadata, ALL_FORMULAS};
