//! # Numeric Utilities
//!
//! The general-purpose numeric layer underneath the material formulas.
//!
//! ## Modules
//!
//! - [`linear`] - Dense `A·x = b` solver with partial pivoting
//! - [`polyfit`] - Polynomial least-squares fitting via normal equations
//! - [`regression`] - R², RMSE, curve sampling, linear interpolation
//! - [`statistics`] - Sample summaries, histograms, Weibull modulus
//!
//! None of these functions panic on degenerate input: singular systems fall
//! back to a flagged zero vector, and missing data surfaces as
//! `CalcError::InsufficientData`.

pub mod linear;
pub mod polyfit;
pub mod regression;
pub mod statistics;

use serde::{Deserialize, Serialize};

pub use linear::{solve, solve_with_tolerance, LinearSolution, SquareMatrix};
pub use polyfit::{fit_polynomial, fit_polynomial_with, Polynomial, PolynomialFit};
pub use regression::{
    diagnose, diagnose_with_samples, fit_and_diagnose, interpolate_linear, r_squared, rmse,
    sample_curve, FitDiagnostics, FitReport,
};
pub use statistics::{
    histogram, histogram_bin_count, summarize, summarize_text, weibull_fit, HistogramBin,
    StatsSummary, WeibullFit,
};

/// A single (x, y) observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
