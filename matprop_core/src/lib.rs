//! # matprop_core - Materials Engineering Calculation Engine
//!
//! `matprop_core` is the computational layer behind the MatProp dashboard:
//! a small numeric toolkit (linear solver, polynomial regression, sample
//! statistics) and a set of closed-form material formulas. All inputs and
//! outputs are plain serde data, so results can be printed, stored or sent
//! over the wire as JSON without adapters.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions with explicit parameters, no shared state
//! - **Typed failures**: `CalcResult` instead of NaN or infinity
//! - **JSON-First**: All result types implement `Serialize`
//! - **Auditable**: Every scalar formula is registered with its reference
//!
//! ## Quick Start
//!
//! ```rust
//! use matprop_core::numeric::{fit_and_diagnose, Point2D};
//! use matprop_core::CalcSettings;
//!
//! let points = [
//!     Point2D::new(10.0, 100.0),
//!     Point2D::new(20.0, 150.0),
//!     Point2D::new(30.0, 180.0),
//!     Point2D::new(40.0, 190.0),
//! ];
//! let report = fit_and_diagnose(&points, 3, &CalcSettings::default()).unwrap();
//! assert!((report.diagnostics.r_squared - 1.0).abs() < 1e-9);
//!
//! let json = serde_json::to_string(&report).unwrap();
//! assert!(json.contains("r_squared"));
//! ```
//!
//! ## Modules
//!
//! - [`numeric`] - Linear solver, polynomial fitting, regression, statistics
//! - [`formulas`] - Material formulas and the formula registry
//! - [`materials`] - Reference alloy properties
//! - [`settings`] - Tunable constants (tolerances, wavelength, sample counts)
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod formulas;
pub mod materials;
pub mod numeric;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use settings::CalcSettings;
