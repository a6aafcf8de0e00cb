//! # High-Cycle Fatigue
//!
//! Mean-stress correction of a fully reversed equivalent amplitude and
//! Basquin life estimation from the three-point S-N approximation.
//!
//! ## Mean-Stress Models
//!
//! ```text
//! Goodman:    Seq = Sa / (1 − Sm/Su)
//! Gerber:     Seq = Sa / (1 − (Sm/Su)²)
//! Soderberg:  Seq = Sa / (1 − Sm/Sy)
//! ```
//!
//! A mean stress at or beyond the strength drives the denominator to zero
//! or below; that is reported as `CalcError::InvalidMeanStressRatio` rather
//! than returned as an infinite or negative equivalent stress.
//!
//! ## S-N Line
//!
//! The S-N line passes through `0.9·Su` at 10³ cycles and `Se` at 10⁶:
//!
//! ```text
//! S = a·N^b,   a = (0.9·Su)² / Se,   b = −log10(0.9·Su / Se) / 3
//! N = (Seq / a)^(1/b)            evaluated only when Seq > Se
//! ```
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, 10th Ed., Sections 6-7 and 6-12

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{finite, positive, require_finite, CalcError, CalcResult};
use crate::numeric::Point2D;

/// Smallest admissible correction denominator
const MIN_DENOMINATOR: f64 = 1e-12;

/// Mean-stress correction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeanStressModel {
    #[default]
    Goodman,
    Gerber,
    Soderberg,
}

impl MeanStressModel {
    pub fn display_name(&self) -> &'static str {
        match self {
            MeanStressModel::Goodman => "Goodman",
            MeanStressModel::Gerber => "Gerber",
            MeanStressModel::Soderberg => "Soderberg",
        }
    }

    pub const ALL: [MeanStressModel; 3] = [
        MeanStressModel::Goodman,
        MeanStressModel::Gerber,
        MeanStressModel::Soderberg,
    ];
}

impl std::str::FromStr for MeanStressModel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("model", s, "expected goodman, gerber or soderberg"))
    }
}

/// Predicted fatigue life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cycles")]
pub enum FatigueLife {
    /// Equivalent stress at or below the endurance limit
    Infinite,
    /// Cycles to failure
    Finite(f64),
}

impl FatigueLife {
    pub fn is_infinite(&self) -> bool {
        matches!(self, FatigueLife::Infinite)
    }
}

impl fmt::Display for FatigueLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatigueLife::Infinite => write!(f, "Infinite"),
            FatigueLife::Finite(n) => write!(f, "{:.3e} cycles", n),
        }
    }
}

/// Equivalent fully reversed stress amplitude.
///
/// # Arguments
/// * `model` - Correction model
/// * `amplitude` - Alternating stress Sa (MPa)
/// * `mean` - Mean stress Sm (MPa)
/// * `tensile_strength` - Su (MPa), used by Goodman and Gerber
/// * `yield_strength` - Sy (MPa), required by Soderberg
///
/// # Example
/// ```rust
/// use matprop_core::formulas::fatigue::{equivalent_stress, MeanStressModel};
///
/// let seq = equivalent_stress(MeanStressModel::Goodman, 200.0, 50.0, 600.0, None).unwrap();
/// assert!((seq - 218.1818).abs() < 1e-3);
///
/// let seq = equivalent_stress(MeanStressModel::Soderberg, 200.0, 50.0, 600.0, Some(450.0)).unwrap();
/// assert!((seq - 225.0).abs() < 1e-9);
/// ```
pub fn equivalent_stress(
    model: MeanStressModel,
    amplitude: f64,
    mean: f64,
    tensile_strength: f64,
    yield_strength: Option<f64>,
) -> CalcResult<f64> {
    require_finite("amplitude", amplitude)?;
    require_finite("mean", mean)?;

    let (ratio, denominator) = match model {
        MeanStressModel::Goodman => {
            let su = positive("goodman", "tensile_strength", require_finite("tensile_strength", tensile_strength)?)?;
            let r = mean / su;
            (r, 1.0 - r)
        }
        MeanStressModel::Gerber => {
            let su = positive("gerber", "tensile_strength", require_finite("tensile_strength", tensile_strength)?)?;
            let r = mean / su;
            (r, 1.0 - r * r)
        }
        MeanStressModel::Soderberg => {
            let sy = yield_strength.ok_or_else(|| CalcError::missing_field("yield_strength"))?;
            let sy = positive("soderberg", "yield_strength", require_finite("yield_strength", sy)?)?;
            let r = mean / sy;
            (r, 1.0 - r)
        }
    };

    if denominator <= MIN_DENOMINATOR {
        return Err(CalcError::InvalidMeanStressRatio { ratio });
    }
    finite(model.display_name(), amplitude / denominator)
}

/// Basquin S-N line coefficients `(a, b)` for `S = a·N^b`.
pub fn basquin_coefficients(tensile_strength: f64, endurance_limit: f64) -> CalcResult<(f64, f64)> {
    let su = positive("basquin", "tensile_strength", require_finite("tensile_strength", tensile_strength)?)?;
    let se = positive("basquin", "endurance_limit", require_finite("endurance_limit", endurance_limit)?)?;
    let f = 0.9 * su;
    if f <= se {
        return Err(CalcError::domain(
            "basquin",
            format!("endurance limit {} must be below 0.9 * tensile strength ({})", se, f),
        ));
    }
    let a = f * f / se;
    let b = -(f / se).log10() / 3.0;
    Ok((a, b))
}

/// Cycles to failure from the Basquin relation.
///
/// Returns [`FatigueLife::Infinite`] when `Seq ≤ Se`.
pub fn basquin_life(equivalent_stress: f64, tensile_strength: f64, endurance_limit: f64) -> CalcResult<FatigueLife> {
    require_finite("equivalent_stress", equivalent_stress)?;
    let (a, b) = basquin_coefficients(tensile_strength, endurance_limit)?;
    if equivalent_stress <= endurance_limit {
        return Ok(FatigueLife::Infinite);
    }
    let n = finite("basquin", (equivalent_stress / a).powf(1.0 / b))?;
    Ok(FatigueLife::Finite(n))
}

/// Loading and material data for a fatigue assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueInput {
    /// Alternating stress amplitude Sa (MPa)
    pub stress_amplitude: f64,
    /// Mean stress Sm (MPa)
    pub mean_stress: f64,
    /// Ultimate tensile strength Su (MPa)
    pub tensile_strength: f64,
    /// Yield strength Sy (MPa), needed for Soderberg
    #[serde(default)]
    pub yield_strength: Option<f64>,
    /// Endurance limit Se (MPa)
    pub endurance_limit: f64,
    #[serde(default)]
    pub model: MeanStressModel,
}

/// Outcome of a fatigue assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueResult {
    pub model: MeanStressModel,
    /// Equivalent fully reversed amplitude (MPa)
    pub equivalent_stress: f64,
    pub life: FatigueLife,
    /// Se / Seq; above 1 means infinite life
    pub safety_factor: f64,
}

/// Correct for mean stress, then estimate life.
pub fn assess(input: &FatigueInput) -> CalcResult<FatigueResult> {
    positive("fatigue", "stress_amplitude", require_finite("stress_amplitude", input.stress_amplitude)?)?;
    let seq = equivalent_stress(
        input.model,
        input.stress_amplitude,
        input.mean_stress,
        input.tensile_strength,
        input.yield_strength,
    )?;
    let life = basquin_life(seq, input.tensile_strength, input.endurance_limit)?;
    Ok(FatigueResult {
        model: input.model,
        equivalent_stress: seq,
        life,
        safety_factor: input.endurance_limit / seq,
    })
}

/// S-N line sampled log-uniformly from 10³ to 10⁶ cycles as (N, S) pairs.
pub fn sn_curve(tensile_strength: f64, endurance_limit: f64, samples: usize) -> CalcResult<Vec<Point2D>> {
    let (a, b) = basquin_coefficients(tensile_strength, endurance_limit)?;
    let samples = samples.max(2);
    Ok((0..samples)
        .map(|i| {
            let log_n = 3.0 + 3.0 * i as f64 / (samples - 1) as f64;
            let n = 10f64.powf(log_n);
            Point2D::new(n, a * n.powf(b))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goodman() {
        let seq = equivalent_stress(MeanStressModel::Goodman, 200.0, 50.0, 600.0, None).unwrap();
        assert!((seq - 200.0 / (1.0 - 50.0 / 600.0)).abs() < 1e-9);
        assert!((seq - 218.18).abs() < 0.01);
    }

    #[test]
    fn test_gerber_less_conservative() {
        let goodman = equivalent_stress(MeanStressModel::Goodman, 200.0, 50.0, 600.0, None).unwrap();
        let gerber = equivalent_stress(MeanStressModel::Gerber, 200.0, 50.0, 600.0, None).unwrap();
        assert!((gerber - 200.0 / (1.0 - (50.0f64 / 600.0).powi(2))).abs() < 1e-9);
        assert!(gerber < goodman);
    }

    #[test]
    fn test_soderberg() {
        let seq = equivalent_stress(MeanStressModel::Soderberg, 200.0, 50.0, 600.0, Some(450.0)).unwrap();
        assert!((seq - 225.0).abs() < 1e-9, "Seq = {}", seq);
    }

    #[test]
    fn test_soderberg_requires_yield() {
        let err = equivalent_stress(MeanStressModel::Soderberg, 200.0, 50.0, 600.0, None).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_invalid_mean_stress_ratio() {
        let err = equivalent_stress(MeanStressModel::Goodman, 200.0, 600.0, 600.0, None).unwrap_err();
        assert_eq!(err, CalcError::InvalidMeanStressRatio { ratio: 1.0 });
        let err = equivalent_stress(MeanStressModel::Gerber, 200.0, -700.0, 600.0, None).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_basquin_anchor_points() {
        // N = 10^3 at 0.9 Su, N = 10^6 at Se
        let (a, b) = basquin_coefficients(600.0, 300.0).unwrap();
        assert!((a * 1e3f64.powf(b) - 540.0).abs() < 1e-6);
        assert!((a * 1e6f64.powf(b) - 300.0).abs() < 1e-6);

        match basquin_life(540.0, 600.0, 300.0).unwrap() {
            FatigueLife::Finite(n) => assert!((n - 1e3).abs() / 1e3 < 1e-9, "N = {}", n),
            FatigueLife::Infinite => panic!("expected finite life"),
        }
    }

    #[test]
    fn test_infinite_life_at_endurance_limit() {
        assert!(basquin_life(300.0, 600.0, 300.0).unwrap().is_infinite());
        assert!(basquin_life(250.0, 600.0, 300.0).unwrap().is_infinite());
        assert_eq!(FatigueLife::Infinite.to_string(), "Infinite");
    }

    #[test]
    fn test_endurance_limit_above_strength() {
        assert!(basquin_coefficients(300.0, 290.0).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_assess() {
        let input = FatigueInput {
            stress_amplitude: 280.0,
            mean_stress: 100.0,
            tensile_strength: 600.0,
            yield_strength: None,
            endurance_limit: 300.0,
            model: MeanStressModel::Goodman,
        };
        let result = assess(&input).unwrap();
        assert!((result.equivalent_stress - 336.0).abs() < 1e-9);
        assert!(result.safety_factor < 1.0);
        match result.life {
            FatigueLife::Finite(n) => assert!(n > 1e3 && n < 1e6, "N = {}", n),
            FatigueLife::Infinite => panic!("expected finite life"),
        }
    }

    #[test]
    fn test_sn_curve_monotonic() {
        let curve = sn_curve(600.0, 300.0, 31).unwrap();
        assert_eq!(curve.len(), 31);
        assert!((curve[0].x - 1e3).abs() < 1e-6);
        assert!((curve[30].x - 1e6).abs() < 1e-3);
        assert!(curve.windows(2).all(|w| w[1].y < w[0].y));
    }

    #[test]
    fn test_model_serialization() {
        let json = serde_json::to_string(&MeanStressModel::Soderberg).unwrap();
        assert_eq!(json, "\"soderberg\"");
    }
}
