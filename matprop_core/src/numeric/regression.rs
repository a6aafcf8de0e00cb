//! # Regression Diagnostics and Interpolation
//!
//! Goodness-of-fit measures for a fitted [`Polynomial`], a sampled curve for
//! plotting, and piecewise-linear interpolation between observations.
//!
//! ## Definitions
//!
//! ```text
//! SS_res = Σ (y_k − f(x_k))²
//! SS_tot = Σ (y_k − ȳ)²
//! R²     = 1 − SS_res / SS_tot       (1 when SS_tot = 0)
//! RMSE   = √(SS_res / n)
//! ```
//!
//! R² is never clamped: a fit worse than the mean baseline is negative.

use serde::{Deserialize, Serialize};

use super::polyfit::{fit_polynomial_with, Polynomial, PolynomialFit};
use super::Point2D;
use crate::errors::{CalcError, CalcResult};
use crate::settings::{CalcSettings, DEFAULT_CURVE_SAMPLES};

/// Fit quality and a plotting curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub r_squared: f64,
    pub rmse: f64,
    /// Polynomial sampled from min x to max x inclusive
    pub curve: Vec<Point2D>,
}

/// A fit together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub fit: PolynomialFit,
    pub diagnostics: FitDiagnostics,
}

fn residual_sum_of_squares(poly: &Polynomial, points: &[Point2D]) -> f64 {
    points
        .iter()
        .map(|p| {
            let r = p.y - poly.evaluate(p.x);
            r * r
        })
        .sum()
}

/// Coefficient of determination.
///
/// Returns 1 when every `y` is identical (`SS_tot == 0`) and 0 for an empty
/// point set.
pub fn r_squared(poly: &Polynomial, points: &[Point2D]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64;
    let ss_tot: f64 = points.iter().map(|p| (p.y - mean_y).powi(2)).sum();
    if ss_tot == 0.0 {
        return 1.0;
    }
    1.0 - residual_sum_of_squares(poly, points) / ss_tot
}

/// Root-mean-square error of the fit (0 for an empty point set).
pub fn rmse(poly: &Polynomial, points: &[Point2D]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    (residual_sum_of_squares(poly, points) / points.len() as f64).sqrt()
}

/// Evaluate `poly` at `samples` evenly spaced x values spanning the data.
///
/// With the default 51 samples the step is `(max_x − min_x) / 50`. A point
/// set with a single distinct x yields `samples` copies of that point.
pub fn sample_curve(poly: &Polynomial, points: &[Point2D], samples: usize) -> Vec<Point2D> {
    if points.is_empty() || samples == 0 {
        return Vec::new();
    }
    let (min_x, max_x) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    if samples == 1 {
        return vec![Point2D::new(min_x, poly.evaluate(min_x))];
    }
    let step = (max_x - min_x) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            // Pin the last sample to max_x so rounding never drops the endpoint
            let x = if i == samples - 1 { max_x } else { min_x + step * i as f64 };
            Point2D::new(x, poly.evaluate(x))
        })
        .collect()
}

/// R², RMSE and the default 51-point curve.
pub fn diagnose(poly: &Polynomial, points: &[Point2D]) -> CalcResult<FitDiagnostics> {
    diagnose_with_samples(poly, points, DEFAULT_CURVE_SAMPLES)
}

/// R², RMSE and a curve with the given number of samples.
pub fn diagnose_with_samples(poly: &Polynomial, points: &[Point2D], samples: usize) -> CalcResult<FitDiagnostics> {
    if points.is_empty() {
        return Err(CalcError::insufficient_data("regression diagnostics", 1, 0));
    }
    Ok(FitDiagnostics {
        r_squared: r_squared(poly, points),
        rmse: rmse(poly, points),
        curve: sample_curve(poly, points, samples),
    })
}

/// Fit a polynomial and compute its diagnostics in one call.
///
/// # Example
/// ```rust
/// use matprop_core::numeric::{fit_and_diagnose, Point2D};
/// use matprop_core::settings::CalcSettings;
///
/// let points: Vec<Point2D> = (0..5).map(|i| Point2D::new(i as f64, (i * i) as f64)).collect();
/// let report = fit_and_diagnose(&points, 2, &CalcSettings::default()).unwrap();
/// assert!((report.diagnostics.r_squared - 1.0).abs() < 1e-9);
/// assert_eq!(report.diagnostics.curve.len(), 51);
/// ```
pub fn fit_and_diagnose(points: &[Point2D], degree: usize, settings: &CalcSettings) -> CalcResult<FitReport> {
    let fit = fit_polynomial_with(points, degree, settings.solver.pivot_tolerance)?;
    let diagnostics = diagnose_with_samples(&fit.polynomial, points, settings.regression.curve_samples)?;
    Ok(FitReport { fit, diagnostics })
}

/// Piecewise-linear interpolation at `x`.
///
/// Points need not be sorted. `x` must lie within the data range; this
/// function does not extrapolate. When several points share the bracketing
/// x value the first one in sorted order is used.
///
/// # Example
/// ```rust
/// use matprop_core::numeric::{interpolate_linear, Point2D};
///
/// let points = [Point2D::new(20.0, 150.0), Point2D::new(10.0, 100.0)];
/// assert_eq!(interpolate_linear(&points, 15.0).unwrap(), 125.0);
/// assert!(interpolate_linear(&points, 25.0).is_err());
/// ```
pub fn interpolate_linear(points: &[Point2D], x: f64) -> CalcResult<f64> {
    if points.len() < 2 {
        return Err(CalcError::insufficient_data("linear interpolation", 2, points.len()));
    }
    if !x.is_finite() {
        return Err(CalcError::invalid_input("x", x.to_string(), "Value must be a finite number"));
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    if x < first.x || x > last.x {
        return Err(CalcError::domain(
            "linear interpolation",
            format!("x = {} outside data range [{}, {}]", x, first.x, last.x),
        ));
    }

    for pair in sorted.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        if x >= p0.x && x <= p1.x {
            let dx = p1.x - p0.x;
            if dx == 0.0 {
                return Ok(p0.y);
            }
            return Ok(p0.y + (p1.y - p0.y) * (x - p0.x) / dx);
        }
    }
    Ok(last.y)
}
