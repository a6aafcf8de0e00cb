//! # Polynomial Least-Squares Fitting
//!
//! Fits `y = c0 + c1·x + … + cd·x^d` by solving the normal equations
//!
//! ```text
//! M[i][j] = Σ x_k^(i+j)        r[i] = Σ y_k · x_k^i        M·c = r
//! ```
//!
//! The sums are built in the normalized variable `t = (x − center) / half_range`
//! so the pivot tolerance means the same thing for x near 0 and x near 1e4;
//! the solved coefficients are expanded back into powers of `x`.
//!
//! The requested degree is clamped to `points.len() - 1`, the highest degree
//! the data can determine. Duplicate x values are allowed; if they leave the
//! system singular the coefficients come back as zeros with `singular` set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::linear::{solve_with_tolerance, SquareMatrix};
use super::Point2D;
use crate::errors::{CalcError, CalcResult};
use crate::settings::DEFAULT_PIVOT_TOLERANCE;

/// Polynomial with coefficients ascending by power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Coefficients `[c0, c1, …]`
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Polynomial degree (0 for a constant or empty polynomial)
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate `Σ c_i·x^i` using Horner's scheme.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Result of a polynomial fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    /// Fitted polynomial
    pub polynomial: Polynomial,
    /// Degree asked for by the caller
    pub requested_degree: usize,
    /// Degree actually fitted after clamping to the data
    pub degree: usize,
    /// True when the normal equations were singular (coefficients are zero)
    pub singular: bool,
}

/// Fit a polynomial of the given degree using the default pivot tolerance.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 points
/// - `InvalidInput` for a non-finite coordinate
///
/// # Example
/// ```rust
/// use matprop_core::numeric::{fit_polynomial, Point2D};
///
/// let points = [Point2D::new(0.0, 1.0), Point2D::new(1.0, 3.0), Point2D::new(2.0, 5.0)];
/// let fit = fit_polynomial(&points, 1).unwrap();
/// assert!((fit.polynomial.coefficients()[0] - 1.0).abs() < 1e-9);
/// assert!((fit.polynomial.coefficients()[1] - 2.0).abs() < 1e-9);
/// ```
pub fn fit_polynomial(points: &[Point2D], degree: usize) -> CalcResult<PolynomialFit> {
    fit_polynomial_with(points, degree, DEFAULT_PIVOT_TOLERANCE)
}

/// Fit a polynomial, passing `tolerance` through to the linear solver.
pub fn fit_polynomial_with(points: &[Point2D], degree: usize, tolerance: f64) -> CalcResult<PolynomialFit> {
    if points.len() < 2 {
        return Err(CalcError::insufficient_data("polynomial fit", 2, points.len()));
    }
    for (i, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(CalcError::invalid_input(
                format!("points[{}]", i),
                format!("({}, {})", p.x, p.y),
                "Coordinates must be finite",
            ));
        }
    }

    let effective = degree.min(points.len() - 1);
    if effective < degree {
        debug!(requested = degree, effective, points = points.len(), "clamped polynomial degree");
    }

    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let center = 0.5 * (lo + hi);
    let half_range = 0.5 * (hi - lo);
    let scale = if half_range > 0.0 { half_range } else { 1.0 };

    let size = effective + 1;
    let mut normal = SquareMatrix::zeros(size);
    let mut rhs = vec![0.0; size];

    for p in points {
        // powers[k] = t^k for k in 0..=2d
        let t = (p.x - center) / scale;
        let mut powers = Vec::with_capacity(2 * effective + 1);
        let mut tk = 1.0;
        for _ in 0..=(2 * effective) {
            powers.push(tk);
            tk *= t;
        }
        for i in 0..size {
            for j in 0..size {
                normal.add_to(i, j, powers[i + j]);
            }
            rhs[i] += p.y * powers[i];
        }
    }

    let solution = solve_with_tolerance(&normal, &rhs, tolerance)?;

    Ok(PolynomialFit {
        polynomial: Polynomial::new(expand_normalized(&solution.x, center, scale)),
        requested_degree: degree,
        degree: effective,
        singular: solution.singular,
    })
}

/// Rewrite `Σ a_k·((x − center)/scale)^k` as ascending powers of `x`.
fn expand_normalized(a: &[f64], center: f64, scale: f64) -> Vec<f64> {
    let mut coefficients = vec![0.0; a.len()];
    // basis[j] = coefficient of x^j in ((x − center)/scale)^k
    let mut basis = vec![1.0];
    for (k, &ak) in a.iter().enumerate() {
        if k > 0 {
            let mut next = vec![0.0; k + 1];
            for (j, &b) in basis.iter().enumerate() {
                next[j + 1] += b / scale;
                next[j] -= b * center / scale;
            }
            basis = next;
        }
        for (j, &b) in basis.iter().enumerate() {
            coefficients[j] += ak * b;
        }
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(data: &[(f64, f64)]) -> Vec<Point2D> {
        data.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
    }

    #[test]
    fn test_horner_evaluation() {
        // 1 + 2x + 3x^2 at x = 2 → 17
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.evaluate(2.0), 17.0);
        assert_eq!(p.degree(), 2);
        assert_eq!(Polynomial::new(vec![]).evaluate(5.0), 0.0);
    }

    #[test]
    fn test_cubic_through_four_points() {
        let points = pts(&[(10.0, 100.0), (20.0, 150.0), (30.0, 180.0), (40.0, 190.0)]);
        let fit = fit_polynomial(&points, 3).unwrap();
        assert!(!fit.singular);
        assert_eq!(fit.degree, 3);
        for p in &points {
            let y = fit.polynomial.evaluate(p.x);
            assert!((y - p.y).abs() < 1e-6, "f({}) = {} (expected {})", p.x, y, p.y);
        }
    }

    #[test]
    fn test_degree_clamped_to_data() {
        let points = pts(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let fit = fit_polynomial(&points, 5).unwrap();
        assert_eq!(fit.requested_degree, 5);
        assert_eq!(fit.degree, 2);
        assert_eq!(fit.polynomial.coefficients().len(), 3);
        assert!((fit.polynomial.evaluate(2.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_x_does_not_crash() {
        let points = pts(&[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        let fit = fit_polynomial(&points, 2).unwrap();
        assert!(fit.singular);
        assert!(fit.polynomial.coefficients().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_least_squares_line() {
        // y = 2x + 1 with symmetric noise
        let points = pts(&[(0.0, 1.1), (1.0, 2.9), (2.0, 5.1), (3.0, 6.9)]);
        let fit = fit_polynomial(&points, 1).unwrap();
        let c = fit.polynomial.coefficients();
        assert!((c[1] - 1.96).abs() < 1e-9, "slope = {}", c[1]);
        assert!((c[0] - 1.06).abs() < 1e-9, "intercept = {}", c[0]);
    }

    #[test]
    fn test_expand_normalized() {
        // 1 + 2t + 3t^2 with t = (x - 1)/2 → 0.75·x^2 − 0.5·x + 0.75
        let c = expand_normalized(&[1.0, 2.0, 3.0], 1.0, 2.0);
        assert!((c[0] - 0.75).abs() < 1e-12);
        assert!((c[1] + 0.5).abs() < 1e-12);
        assert!((c[2] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_large_offset_narrow_spread() {
        // x near 1e4 with a spread of 0.005, y = 2(x - 10000) + 5
        let points: Vec<Point2D> = (0..6)
            .map(|i| {
                let dx = i as f64 * 0.001;
                Point2D::new(10_000.0 + dx, 2.0 * dx + 5.0)
            })
            .collect();
        let fit = fit_polynomial(&points, 1).unwrap();
        assert!(!fit.singular);
        let c = fit.polynomial.coefficients();
        assert!((c[1] - 2.0).abs() < 1e-6, "slope = {}", c[1]);
        assert!((fit.polynomial.evaluate(10_000.002) - 5.004).abs() < 1e-6);
    }

    #[test]
    fn test_insufficient_points() {
        let err = fit_polynomial(&pts(&[(1.0, 1.0)]), 1).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let points = pts(&[(1.0, 1.0), (f64::NAN, 2.0)]);
        assert!(fit_polynomial(&points, 1).is_err());
    }
}
