//! # Descriptive Statistics
//!
//! Summary statistics for a sample of test results (strengths, hardness
//! readings, elongations …): central tendency, spread, nearest-rank
//! quartiles, a histogram, and a Weibull modulus from median-rank
//! regression.
//!
//! ## Conventions
//!
//! - Variance uses Bessel's correction (`n − 1`); a single value has 0.
//! - Quartiles are nearest-rank `sorted[⌊n·0.25⌋]` and `sorted[⌊n·0.75⌋]`.
//!   This is an approximation, not an interpolated quartile.
//! - Coefficient of variation is reported in percent.
//! - Weibull estimation uses Bernard's median rank
//!   `F = (i + 1 − 0.3) / (n + 0.4)` and regresses `ln(−ln(1 − F))` on
//!   `ln(x)`. It requires `n > 2` and a strictly positive sample; otherwise
//!   the shape is reported as 0.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

/// Fewest histogram bins
pub const MIN_HISTOGRAM_BINS: usize = 5;

/// Most histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 15;

/// One histogram bin covering `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Weibull distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeibullFit {
    /// Shape parameter (Weibull modulus) m
    pub shape: f64,
    /// Scale parameter (characteristic value) η
    pub scale: f64,
}

/// Summary statistics of a sample.
///
/// ## JSON Example
///
/// ```json
/// {
///   "n": 5, "mean": 3.0, "median": 3.0, "variance": 2.5, "std_dev": 1.5811,
///   "cov": 52.7, "min": 1.0, "max": 5.0, "q1": 2.0, "q3": 4.0,
///   "weibull_shape": 2.1, "weibull_scale": 3.4, "histogram": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance (n − 1)
    pub variance: f64,
    pub std_dev: f64,
    /// Coefficient of variation (%)
    pub cov: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    /// 0 when the Weibull preconditions are not met
    pub weibull_shape: f64,
    /// 0 when the shape is not positive
    pub weibull_scale: f64,
    pub histogram: Vec<HistogramBin>,
}

impl StatsSummary {
    /// Interquartile range q3 − q1
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Summarize a sample. Non-finite values are dropped first.
///
/// # Errors
/// `InsufficientData` when no finite value remains.
///
/// # Example
/// ```rust
/// use matprop_core::numeric::summarize;
///
/// let s = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(s.mean, 3.0);
/// assert_eq!(s.median, 3.0);
/// assert!((s.variance - 2.5).abs() < 1e-12);
/// ```
pub fn summarize(values: &[f64]) -> CalcResult<StatsSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(CalcError::insufficient_data("statistics", 1, 0));
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let nf = n as f64;
    let mean = sorted.iter().sum::<f64>() / nf;
    let variance = if n > 1 {
        sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0)
    } else {
        0.0
    };
    let std_dev = variance.sqrt();
    let cov = if mean != 0.0 { std_dev / mean * 100.0 } else { 0.0 };

    let min = sorted[0];
    let max = sorted[n - 1];
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let q1 = sorted[(nf * 0.25).floor() as usize];
    let q3 = sorted[((nf * 0.75).floor() as usize).min(n - 1)];

    let weibull = weibull_fit(&sorted);

    Ok(StatsSummary {
        n,
        mean,
        median,
        variance,
        std_dev,
        cov,
        min,
        max,
        q1,
        q3,
        weibull_shape: weibull.shape,
        weibull_scale: weibull.scale,
        histogram: histogram(&sorted),
    })
}

/// Parse free-form text (commas, semicolons, whitespace) and summarize.
///
/// Tokens that do not parse as numbers are ignored.
///
/// ```rust
/// use matprop_core::numeric::summarize_text;
///
/// let s = summarize_text("412, 398; 405 n/a\n420").unwrap();
/// assert_eq!(s.n, 4);
/// ```
pub fn summarize_text(text: &str) -> CalcResult<StatsSummary> {
    let values: Vec<f64> = text
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<f64>().ok())
        .collect();
    summarize(&values)
}

/// Bin count for a sample of `n`: `clamp(ceil(sqrt(n)), 5, 15)`.
pub fn histogram_bin_count(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).clamp(MIN_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS)
}

/// Uniform-width histogram over `[min, max]` of an already sorted sample.
///
/// Each value goes to bin `min(bins − 1, ⌊(v − min) / width⌋)`. A sample
/// with zero range puts every value in the first bin.
pub fn histogram(sorted: &[f64]) -> Vec<HistogramBin> {
    if sorted.is_empty() {
        return Vec::new();
    }
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let bins = histogram_bin_count(sorted.len());
    let width = (max - min) / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i == bins - 1 { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    if width == 0.0 {
        debug!(n = sorted.len(), "zero-range sample, all values in first bin");
        result[0].count = sorted.len();
        return result;
    }

    for v in sorted {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

/// Weibull shape and scale by median-rank regression on a sorted sample.
///
/// The slope comes from centered sums, so tightly clustered samples still
/// give a finite modulus. Returns zeros when `n ≤ 2`, when any value is not
/// strictly positive, or when every value is identical.
pub fn weibull_fit(sorted: &[f64]) -> WeibullFit {
    let n = sorted.len();
    if n <= 2 || sorted[0] <= 0.0 {
        debug!(n, "Weibull preconditions not met");
        return WeibullFit::default();
    }

    let nf = n as f64;
    let points: Vec<(f64, f64)> = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = (i as f64 + 1.0 - 0.3) / (nf + 0.4);
            (x.ln(), (-(1.0 - f).ln()).ln())
        })
        .collect();

    let x_mean = points.iter().map(|p| p.0).sum::<f64>() / nf;
    let y_mean = points.iter().map(|p| p.1).sum::<f64>() / nf;
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
        let dx = x - x_mean;
        (sxy + dx * (y - y_mean), sxx + dx * dx)
    });
    if sxx == 0.0 || sorted[0] == sorted[n - 1] {
        debug!(n, "Weibull sample has no spread");
        return WeibullFit::default();
    }

    let shape = sxy / sxx;
    if !shape.is_finite() || shape <= 0.0 {
        return WeibullFit::default();
    }
    // ln(eta) = x̄ - ȳ/m
    let scale = (x_mean - y_mean / shape).exp();

    WeibullFit { shape, scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-4;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_known_sample() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(s.n, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert!(approx_eq(s.variance, 2.5), "variance = {}", s.variance);
        assert!(approx_eq(s.std_dev, 1.5811), "std = {}", s.std_dev);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        // floor(5 * 0.25) = 1, floor(5 * 0.75) = 3
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.iqr(), 2.0);
        assert!(approx_eq(s.cov, 1.5811388 / 3.0 * 100.0));
    }

    #[test]
    fn test_even_count_median() {
        let s = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn test_single_value() {
        let s = summarize(&[7.0]).unwrap();
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.q1, 7.0);
        assert_eq!(s.q3, 7.0);
        assert_eq!(s.weibull_shape, 0.0);
        assert_eq!(s.histogram[0].count, 1);
    }

    #[test]
    fn test_empty_after_filtering() {
        let err = summarize(&[f64::NAN, f64::INFINITY]).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
        assert!(summarize(&[]).is_err());
    }

    #[test]
    fn test_non_finite_filtered() {
        let s = summarize(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(s.n, 2);
        assert_eq!(s.mean, 2.0);
    }

    #[test]
    fn test_summarize_text_ignores_garbage() {
        let s = summarize_text("1, 2,, x 3;4\t5").unwrap();
        assert_eq!(s.n, 5);
        assert_eq!(s.mean, 3.0);
        assert!(summarize_text("abc").is_err());
    }

    #[test]
    fn test_bin_count_clamped() {
        assert_eq!(histogram_bin_count(1), 5);
        assert_eq!(histogram_bin_count(30), 6);
        assert_eq!(histogram_bin_count(100), 10);
        assert_eq!(histogram_bin_count(10_000), 15);
    }

    #[test]
    fn test_histogram_counts_sum_to_n() {
        let values: Vec<f64> = (0..37).map(|i| (i as f64 * 1.7).sin() * 50.0 + 300.0).collect();
        let s = summarize(&values).unwrap();
        let total: usize = s.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 37);
        assert_eq!(s.histogram.len(), 7);
        assert_eq!(s.histogram.first().unwrap().lower, s.min);
        assert_eq!(s.histogram.last().unwrap().upper, s.max);
    }

    #[test]
    fn test_histogram_max_lands_in_last_bin() {
        let sorted = [0.0, 1.0, 2.0, 3.0, 10.0];
        let bins = histogram(&sorted);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_histogram_zero_range() {
        let bins = histogram(&[2.0, 2.0, 2.0]);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_weibull_recovers_shape() {
        // Values placed exactly on a Weibull(m = 10, η = 500) median-rank line
        let n = 10;
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let f = (i as f64 + 0.7) / (n as f64 + 0.4);
                500.0 * (-(1.0 - f).ln()).powf(1.0 / 10.0)
            })
            .collect();
        let s = summarize(&values).unwrap();
        assert!((s.weibull_shape - 10.0).abs() < 1e-6, "m = {}", s.weibull_shape);
        assert!((s.weibull_scale - 500.0).abs() < 1e-6, "eta = {}", s.weibull_scale);
    }

    #[test]
    fn test_weibull_preconditions() {
        assert_eq!(summarize(&[1.0, 2.0]).unwrap().weibull_shape, 0.0);
        assert_eq!(summarize(&[-1.0, 2.0, 3.0]).unwrap().weibull_shape, 0.0);
        assert_eq!(summarize(&[0.0, 2.0, 3.0]).unwrap().weibull_shape, 0.0);
        assert!(summarize(&[1.0, 2.0, 3.0]).unwrap().weibull_shape > 0.0);
    }

    #[test]
    fn test_weibull_clustered_sample() {
        let sample: Vec<f64> = (0..10).map(|i| 500.0 + i as f64 * 0.0005).collect();
        let w = weibull_fit(&sample);
        assert!(w.shape.is_finite() && w.shape > 0.0, "m = {}", w.shape);
        assert!((w.scale - 500.0).abs() < 0.01, "eta = {}", w.scale);

        assert_eq!(weibull_fit(&[3.7, 3.7, 3.7, 3.7]), WeibullFit::default());
    }
}
