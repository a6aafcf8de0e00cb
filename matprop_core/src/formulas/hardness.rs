//! # Hardness Scale Conversion
//!
//! Approximate conversions between Vickers (HV), Rockwell C (HRC),
//! Rockwell B (HRB) and Brinell (HB), routed through HV.
//!
//! ## Empirical Fits
//!
//! ```text
//! HRC = 33.14·ln(HV) − 161.35        valid for HRC 20 – 70
//! HV  = exp((HRC + 161.35) / 33.14)
//! HV  = (8/3)·HRB − 80/3             valid for HRB 40 – 100
//! HB  = 0.95·HV                      valid for HB 75 – 650
//! ```
//!
//! These are single-curve approximations in the style of the ASTM E140
//! tables for non-austenitic steels. They are lossy: a value outside the
//! validity window of either scale comes back as a boundary sentinel
//! (`"< 20"`, `"> 70"`) instead of an extrapolated number, so a round trip
//! through a narrower scale does not return the original value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{positive, require_finite, CalcError, CalcResult};

const HRC_LN_SLOPE: f64 = 33.14;
const HRC_LN_INTERCEPT: f64 = -161.35;
const HRB_SLOPE: f64 = 8.0 / 3.0;
const HRB_INTERCEPT: f64 = -80.0 / 3.0;
const HB_PER_HV: f64 = 0.95;

/// Tensile strength per Vickers point (MPa/HV)
const UTS_PER_HV: f64 = 3.3;

/// Hardness scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardnessScale {
    /// Vickers
    #[serde(rename = "HV")]
    Hv,
    /// Rockwell C
    #[serde(rename = "HRC")]
    Hrc,
    /// Rockwell B
    #[serde(rename = "HRB")]
    Hrb,
    /// Brinell
    #[serde(rename = "HB")]
    Hb,
}

impl HardnessScale {
    pub const ALL: [HardnessScale; 4] = [
        HardnessScale::Hv,
        HardnessScale::Hrc,
        HardnessScale::Hrb,
        HardnessScale::Hb,
    ];

    /// Conventional abbreviation
    pub fn symbol(&self) -> &'static str {
        match self {
            HardnessScale::Hv => "HV",
            HardnessScale::Hrc => "HRC",
            HardnessScale::Hrb => "HRB",
            HardnessScale::Hb => "HB",
        }
    }

    /// Parse an abbreviation, ignoring case
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.symbol().eq_ignore_ascii_case(symbol.trim()))
    }

    /// Window in which the conversion fit is valid, in this scale's units
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            HardnessScale::Hv => (0.0, f64::INFINITY),
            HardnessScale::Hrc => (20.0, 70.0),
            HardnessScale::Hrb => (40.0, 100.0),
            HardnessScale::Hb => (75.0, 650.0),
        }
    }

    fn to_vickers(self, value: f64) -> f64 {
        match self {
            HardnessScale::Hv => value,
            HardnessScale::Hrc => ((value - HRC_LN_INTERCEPT) / HRC_LN_SLOPE).exp(),
            HardnessScale::Hrb => HRB_SLOPE * value + HRB_INTERCEPT,
            HardnessScale::Hb => value / HB_PER_HV,
        }
    }

    fn from_vickers(self, hv: f64) -> f64 {
        match self {
            HardnessScale::Hv => hv,
            HardnessScale::Hrc => HRC_LN_SLOPE * hv.ln() + HRC_LN_INTERCEPT,
            HardnessScale::Hrb => (hv - HRB_INTERCEPT) / HRB_SLOPE,
            HardnessScale::Hb => HB_PER_HV * hv,
        }
    }
}

impl FromStr for HardnessScale {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| CalcError::invalid_input("scale", s, "expected HV, HRC, HRB or HB"))
    }
}

impl fmt::Display for HardnessScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converted hardness, or a sentinel when the conversion leaves the valid
/// window of the fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum HardnessReading {
    Value(f64),
    /// Below the lowest convertible value (the limit is in the target scale)
    BelowRange(f64),
    /// Above the highest convertible value (the limit is in the target scale)
    AboveRange(f64),
}

impl HardnessReading {
    /// The converted number, if in range
    pub fn value(&self) -> Option<f64> {
        match self {
            HardnessReading::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        !matches!(self, HardnessReading::Value(_))
    }
}

fn round_limit(limit: f64) -> f64 {
    (limit * 10.0).round() / 10.0
}

impl fmt::Display for HardnessReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardnessReading::Value(v) => write!(f, "{:.1}", v),
            HardnessReading::BelowRange(limit) => write!(f, "< {}", round_limit(*limit)),
            HardnessReading::AboveRange(limit) => write!(f, "> {}", round_limit(*limit)),
        }
    }
}

/// Convert a hardness value between scales.
///
/// # Errors
/// `InvalidInput` for a non-finite value, `Domain` for a value that is not
/// positive.
///
/// # Example
/// ```rust
/// use matprop_core::formulas::hardness::{convert, HardnessReading, HardnessScale};
///
/// let hrc = convert(500.0, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
/// assert!(matches!(hrc, HardnessReading::Value(v) if (20.0..=70.0).contains(&v)));
///
/// let soft = convert(150.0, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
/// assert_eq!(soft.to_string(), "< 20");
/// ```
pub fn convert(value: f64, from: HardnessScale, to: HardnessScale) -> CalcResult<HardnessReading> {
    positive("hardness", "value", require_finite("value", value)?)?;

    // Input outside its own fit window: report the violated limit in the target scale
    let limit_in_target = |limit: f64| if from == to { limit } else { to.from_vickers(from.to_vickers(limit)) };
    let (lo, hi) = from.valid_range();
    if value < lo {
        return Ok(HardnessReading::BelowRange(limit_in_target(lo)));
    }
    if value > hi {
        return Ok(HardnessReading::AboveRange(limit_in_target(hi)));
    }
    if from == to {
        return Ok(HardnessReading::Value(value));
    }

    let converted = to.from_vickers(from.to_vickers(value));
    let (lo, hi) = to.valid_range();
    if !converted.is_finite() || converted < lo {
        return Ok(HardnessReading::BelowRange(lo));
    }
    if converted > hi {
        return Ok(HardnessReading::AboveRange(hi));
    }
    Ok(HardnessReading::Value(converted))
}

/// Approximate tensile strength from Vickers hardness: `UTS ≈ 3.3·HV` (MPa).
///
/// Applies to steels; other alloy families follow different factors.
pub fn estimate_tensile_strength(hv: f64) -> CalcResult<f64> {
    positive("tensile_strength_estimate", "hv", require_finite("hv", hv)?)?;
    Ok(UTS_PER_HV * hv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hv_to_hrc_in_range() {
        let reading = convert(500.0, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
        let hrc = reading.value().unwrap();
        assert!((hrc - 44.6).abs() < 0.1, "HRC = {}", hrc);
    }

    #[test]
    fn test_hv_to_hrc_sentinels() {
        let low = convert(100.0, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
        assert_eq!(low, HardnessReading::BelowRange(20.0));
        assert_eq!(low.to_string(), "< 20");

        let high = convert(2000.0, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
        assert_eq!(high, HardnessReading::AboveRange(70.0));
        assert_eq!(high.to_string(), "> 70");
    }

    #[test]
    fn test_round_trip_stays_in_valid_output_range() {
        for hv in [50.0, 150.0, 240.0, 300.0, 450.0, 650.0, 900.0, 1076.0, 1500.0] {
            let reading = convert(hv, HardnessScale::Hv, HardnessScale::Hrc).unwrap();
            match reading {
                HardnessReading::Value(hrc) => {
                    assert!((20.0..=70.0).contains(&hrc), "HV {} → HRC {}", hv, hrc);
                    let back = convert(hrc, HardnessScale::Hrc, HardnessScale::Hv).unwrap();
                    let back = back.value().unwrap();
                    assert!((back - hv).abs() / hv < 1e-6, "HV {} → {} → {}", hv, hrc, back);
                }
                other => {
                    let text = other.to_string();
                    assert!(text == "< 20" || text == "> 70", "unexpected sentinel {}", text);
                }
            }
        }
    }

    #[test]
    fn test_hrb_linear() {
        let hv = convert(100.0, HardnessScale::Hrb, HardnessScale::Hv).unwrap();
        assert!((hv.value().unwrap() - 240.0).abs() < 1e-9);
        let hrb = convert(160.0, HardnessScale::Hv, HardnessScale::Hrb).unwrap();
        assert!((hrb.value().unwrap() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_input_is_flagged() {
        // HRC 15 is outside the HRC fit window; the limit is reported in HV
        let reading = convert(15.0, HardnessScale::Hrc, HardnessScale::Hv).unwrap();
        match reading {
            HardnessReading::BelowRange(limit) => assert!((limit - 238.0).abs() < 1.0, "limit = {}", limit),
            other => panic!("expected BelowRange, got {:?}", other),
        }
        assert!(convert(75.0, HardnessScale::Hrc, HardnessScale::Hv).unwrap().is_out_of_range());
    }

    #[test]
    fn test_same_scale_checks_window() {
        assert_eq!(
            convert(90.0, HardnessScale::Hrc, HardnessScale::Hrc).unwrap(),
            HardnessReading::AboveRange(70.0)
        );
        assert_eq!(
            convert(10.0, HardnessScale::Hrc, HardnessScale::Hrc).unwrap(),
            HardnessReading::BelowRange(20.0)
        );
        assert_eq!(
            convert(120.0, HardnessScale::Hrb, HardnessScale::Hrb).unwrap(),
            HardnessReading::AboveRange(100.0)
        );
        assert_eq!(
            convert(30.0, HardnessScale::Hrb, HardnessScale::Hrb).unwrap(),
            HardnessReading::BelowRange(40.0)
        );
        assert_eq!(
            convert(45.0, HardnessScale::Hrc, HardnessScale::Hrc).unwrap(),
            HardnessReading::Value(45.0)
        );
    }

    #[test]
    fn test_cross_scale_through_vickers() {
        // HRC 60 is far above the HRB window
        let reading = convert(60.0, HardnessScale::Hrc, HardnessScale::Hrb).unwrap();
        assert_eq!(reading, HardnessReading::AboveRange(100.0));

        let hb = convert(300.0, HardnessScale::Hv, HardnessScale::Hb).unwrap();
        assert!((hb.value().unwrap() - 285.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_values() {
        assert!(convert(0.0, HardnessScale::Hv, HardnessScale::Hrc).is_err());
        assert!(convert(f64::NAN, HardnessScale::Hv, HardnessScale::Hrc).is_err());
    }

    #[test]
    fn test_scale_symbols() {
        assert_eq!(HardnessScale::from_symbol("hrc"), Some(HardnessScale::Hrc));
        assert_eq!(HardnessScale::from_symbol("HK"), None);
        assert!("hk".parse::<HardnessScale>().is_err());
        assert_eq!(serde_json::to_string(&HardnessScale::Hb).unwrap(), "\"HB\"");
    }

    #[test]
    fn test_tensile_estimate() {
        assert!((estimate_tensile_strength(200.0).unwrap() - 660.0).abs() < 1e-9);
    }
}
