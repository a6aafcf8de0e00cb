//! # Dense Linear System Solver
//!
//! Gaussian elimination with partial pivoting for the small dense systems
//! produced by polynomial normal equations.
//!
//! ## Singular Systems
//!
//! When the largest available pivot in a column falls below the tolerance
//! the system is treated as singular and the solver returns an all-zero
//! vector with [`LinearSolution::singular`] set. This keeps NaN and Infinity
//! out of downstream curves, but the zero vector is a degenerate answer, not
//! a solution. Ill-conditioned systems close to the tolerance are a known
//! precision limitation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{require_finite, CalcError, CalcResult};
use crate::settings::DEFAULT_PIVOT_TOLERANCE;

/// Square matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// Returns a zero-initialized `n × n` matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Build a matrix from rows, checking that it is square and non-empty.
    ///
    /// ```rust
    /// use matprop_core::numeric::SquareMatrix;
    ///
    /// let a = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
    /// assert_eq!(a.size(), 2);
    /// assert!(SquareMatrix::from_rows(vec![vec![1.0, 2.0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CalcResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(CalcError::invalid_input("matrix", "[]", "Matrix must have at least one row"));
        }
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(CalcError::invalid_input(
                    format!("matrix[{}]", i),
                    format!("{} columns", row.len()),
                    format!("Matrix must be square ({} x {})", n, n),
                ));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Dimension of the matrix
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns the element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Sets the element at `(row, col)` to `val`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.n + col] = val;
    }

    /// Adds `val` to the element at `(row, col)`.
    #[inline]
    pub fn add_to(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.n + col] += val;
    }

    /// Computes the matrix-vector product `self * v`.
    ///
    /// `v` must have `size()` elements.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| (0..self.n).map(|k| self.get(i, k) * v[k]).sum())
            .collect()
    }

    fn swap_rows(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        for col in 0..self.n {
            self.data.swap(r1 * self.n + col, r2 * self.n + col);
        }
    }
}

/// Outcome of a linear solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSolution {
    /// Solution vector (all zeros when `singular`)
    pub x: Vec<f64>,
    /// True when a pivot fell below tolerance and `x` is the zero fallback
    pub singular: bool,
}

impl LinearSolution {
    fn degenerate(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            singular: true,
        }
    }
}

/// Solve `A·x = b` with the default pivot tolerance (`1e-10`).
///
/// # Example
/// ```rust
/// use matprop_core::numeric::{solve, SquareMatrix};
///
/// let a = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let sol = solve(&a, &[3.0, 5.0]).unwrap();
/// assert!(!sol.singular);
/// assert!((sol.x[0] - 0.8).abs() < 1e-12);
/// assert!((sol.x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve(a: &SquareMatrix, b: &[f64]) -> CalcResult<LinearSolution> {
    solve_with_tolerance(a, b, DEFAULT_PIVOT_TOLERANCE)
}

/// Solve `A·x = b`, treating pivots below `tolerance` as singular.
///
/// Neither `a` nor `b` is modified. A shape mismatch or non-finite entry is
/// an `InvalidInput` error; a singular system is not an error.
pub fn solve_with_tolerance(a: &SquareMatrix, b: &[f64], tolerance: f64) -> CalcResult<LinearSolution> {
    let n = a.size();
    if b.len() != n {
        return Err(CalcError::invalid_input(
            "b",
            format!("{} elements", b.len()),
            format!("Right-hand side must have {} elements", n),
        ));
    }
    for (i, v) in a.data.iter().chain(b.iter()).enumerate() {
        if !v.is_finite() {
            let field = if i < n * n { "matrix" } else { "b" };
            require_finite(field, *v)?;
        }
    }

    let mut m = a.clone();
    let mut rhs = b.to_vec();

    // Forward elimination
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| m.get(r1, col).abs().total_cmp(&m.get(r2, col).abs()))
            .unwrap_or(col);
        m.swap_rows(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot = m.get(col, col);
        if pivot.abs() < tolerance {
            debug!(size = n, column = col, pivot, "singular system, returning zero vector");
            return Ok(LinearSolution::degenerate(n));
        }

        for row in (col + 1)..n {
            let factor = m.get(row, col) / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let v = m.get(row, k) - factor * m.get(col, k);
                m.set(row, k, v);
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back-substitution
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| m.get(row, k) * x[k]).sum();
        x[row] = (rhs[row] - tail) / m.get(row, row);
    }

    if x.iter().any(|v| !v.is_finite()) {
        debug!(size = n, "solution overflowed, returning zero vector");
        return Ok(LinearSolution::degenerate(n));
    }

    Ok(LinearSolution { x, singular: false })
}
