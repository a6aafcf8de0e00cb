//! # Fracture Toughness (ASTM E399)
//!
//! Stress intensity from a fracture test load using the standard geometry
//! factor polynomials for compact tension (CT) and single-edge notched bend
//! (SENB) specimens.
//!
//! ## Formulas
//!
//! With `x = a/W`:
//!
//! ```text
//! CT:    K = P / (B·√W) · f(x)
//!        f(x) = (2 + x)(0.886 + 4.64x − 13.32x² + 14.72x³ − 5.6x⁴) / (1 − x)^1.5
//!
//! SENB:  K = P·S / (B·W^1.5) · f(x)
//!        f(x) = 3√x [1.99 − x(1 − x)(2.15 − 3.93x + 2.7x²)] / (2(1 + 2x)(1 − x)^1.5)
//! ```
//!
//! Geometry factors are accepted for `0.1 ≤ a/W ≤ 0.9`; outside that window
//! the result is `CalcError::InvalidCrackRatio` ("Invalid a/W").
//!
//! ## Units
//!
//! Load P in kN and lengths in mm. `P[N] / (mm^1.5)` is MPa·√mm; dividing by
//! √1000 gives MPa·√m.

use serde::{Deserialize, Serialize};

use crate::errors::{finite, positive, require_finite, CalcError, CalcResult};

/// Lowest accepted crack length ratio
pub const MIN_CRACK_RATIO: f64 = 0.1;

/// Highest accepted crack length ratio
pub const MAX_CRACK_RATIO: f64 = 0.9;

/// Plane-strain size requirement factor in B, a ≥ 2.5 (K/σys)²
const PLANE_STRAIN_FACTOR: f64 = 2.5;

/// Specimen geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Compact tension C(T)
    CompactTension,
    /// Three-point bend SE(B) with support span (mm), nominally 4W
    SingleEdgeBend { span_mm: f64 },
}

impl Geometry {
    pub fn display_name(&self) -> &'static str {
        match self {
            Geometry::CompactTension => "Compact Tension",
            Geometry::SingleEdgeBend { .. } => "Single-Edge Notched Bend",
        }
    }
}

fn check_crack_ratio(ratio: f64) -> CalcResult<f64> {
    if !ratio.is_finite() || !(MIN_CRACK_RATIO..=MAX_CRACK_RATIO).contains(&ratio) {
        return Err(CalcError::InvalidCrackRatio { ratio });
    }
    Ok(ratio)
}

/// Dimensionless geometry factor f(a/W).
///
/// # Example
/// ```rust
/// use matprop_core::formulas::fracture::{geometry_factor, Geometry};
///
/// let f = geometry_factor(Geometry::CompactTension, 0.5).unwrap();
/// assert!((f - 9.66).abs() < 0.01);
/// assert!(geometry_factor(Geometry::CompactTension, 0.95).is_err());
/// ```
pub fn geometry_factor(geometry: Geometry, crack_ratio: f64) -> CalcResult<f64> {
    let x = check_crack_ratio(crack_ratio)?;
    let root = (1.0 - x).powf(1.5);
    let f = match geometry {
        Geometry::CompactTension => {
            (2.0 + x) * (0.886 + 4.64 * x - 13.32 * x.powi(2) + 14.72 * x.powi(3) - 5.6 * x.powi(4)) / root
        }
        Geometry::SingleEdgeBend { .. } => {
            3.0 * x.sqrt() * (1.99 - x * (1.0 - x) * (2.15 - 3.93 * x + 2.7 * x * x))
                / (2.0 * (1.0 + 2.0 * x) * root)
        }
    };
    finite("geometry_factor", f)
}

/// Fracture test record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractureInput {
    pub geometry: Geometry,
    /// Critical load P_Q (kN)
    pub load_kn: f64,
    /// Specimen thickness B (mm)
    pub thickness_mm: f64,
    /// Specimen width W (mm)
    pub width_mm: f64,
    /// Crack length a (mm)
    pub crack_length_mm: f64,
    /// Yield strength for the plane-strain validity check (MPa)
    #[serde(default)]
    pub yield_strength_mpa: Option<f64>,
}

impl FractureInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        positive("fracture", "load_kn", require_finite("load_kn", self.load_kn)?)?;
        positive("fracture", "thickness_mm", require_finite("thickness_mm", self.thickness_mm)?)?;
        positive("fracture", "width_mm", require_finite("width_mm", self.width_mm)?)?;
        positive("fracture", "crack_length_mm", require_finite("crack_length_mm", self.crack_length_mm)?)?;
        if let Geometry::SingleEdgeBend { span_mm } = self.geometry {
            positive("fracture", "span_mm", require_finite("span_mm", span_mm)?)?;
        }
        Ok(())
    }

    /// a/W
    pub fn crack_ratio(&self) -> f64 {
        self.crack_length_mm / self.width_mm
    }
}

/// Stress intensity and validity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractureResult {
    /// Conditional toughness K_Q (MPa√m)
    pub stress_intensity: f64,
    pub crack_ratio: f64,
    pub geometry_factor: f64,
    /// Minimum B and a for plane strain (mm), when yield strength is known
    pub plane_strain_size_mm: Option<f64>,
    /// True when B and a both meet the plane-strain size requirement
    pub plane_strain_valid: Option<bool>,
}

/// Stress intensity K_Q in MPa√m.
///
/// # Example
/// ```rust
/// use matprop_core::formulas::fracture::{stress_intensity, FractureInput, Geometry};
///
/// let input = FractureInput {
///     geometry: Geometry::CompactTension,
///     load_kn: 20.0,
///     thickness_mm: 25.0,
///     width_mm: 50.0,
///     crack_length_mm: 25.0,
///     yield_strength_mpa: None,
/// };
/// let k = stress_intensity(&input).unwrap();
/// assert!((k.stress_intensity - 34.55).abs() < 0.05);
/// ```
pub fn stress_intensity(input: &FractureInput) -> CalcResult<FractureResult> {
    input.validate()?;
    let ratio = input.crack_ratio();
    let f = geometry_factor(input.geometry, ratio)?;

    let p_n = input.load_kn * 1000.0;
    let b = input.thickness_mm;
    let w = input.width_mm;
    let k_sqrt_mm = match input.geometry {
        Geometry::CompactTension => p_n / (b * w.sqrt()) * f,
        Geometry::SingleEdgeBend { span_mm } => p_n * span_mm / (b * w.powf(1.5)) * f,
    };
    let k = finite("stress_intensity", k_sqrt_mm / 1000f64.sqrt())?;

    let size = match input.yield_strength_mpa {
        Some(sy) => Some(plane_strain_size_mm(k, sy)?),
        None => None,
    };
    let valid = size.map(|s| b >= s && input.crack_length_mm >= s);

    Ok(FractureResult {
        stress_intensity: k,
        crack_ratio: ratio,
        geometry_factor: f,
        plane_strain_size_mm: size,
        plane_strain_valid: valid,
    })
}

/// Plane-strain size requirement 2.5·(K/σys)², converted to mm.
pub fn plane_strain_size_mm(toughness: f64, yield_strength_mpa: f64) -> CalcResult<f64> {
    require_finite("toughness", toughness)?;
    positive("plane_strain_size", "yield_strength_mpa", require_finite("yield_strength_mpa", yield_strength_mpa)?)?;
    // (MPa√m / MPa)² is metres
    finite(
        "plane_strain_size",
        PLANE_STRAIN_FACTOR * (toughness / yield_strength_mpa).powi(2) * 1000.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(load: f64, a: f64) -> FractureInput {
        FractureInput {
            geometry: Geometry::CompactTension,
            load_kn: load,
            thickness_mm: 25.0,
            width_mm: 50.0,
            crack_length_mm: a,
            yield_strength_mpa: None,
        }
    }

    #[test]
    fn test_ct_geometry_factor_half() {
        // (2.5)(0.886 + 2.32 − 3.33 + 1.84 − 0.35) / 0.5^1.5 = 9.659
        let f = geometry_factor(Geometry::CompactTension, 0.5).unwrap();
        assert!((f - 9.6591).abs() < 1e-3, "f = {}", f);
    }

    #[test]
    fn test_senb_geometry_factor_half() {
        let f = geometry_factor(Geometry::SingleEdgeBend { span_mm: 80.0 }, 0.5).unwrap();
        // 3·√0.5·(1.99 − 0.25·(2.15 − 1.965 + 0.675)) / (2·2·0.35355)
        let expected = 3.0 * 0.5f64.sqrt() * (1.99 - 0.25 * 0.86) / (4.0 * 0.5f64.powf(1.5));
        assert!((f - expected).abs() < 1e-12);
        assert!((f - 2.6625).abs() < 1e-3, "f = {}", f);
    }

    #[test]
    fn test_crack_ratio_window() {
        assert!(geometry_factor(Geometry::CompactTension, 0.1).is_ok());
        assert!(geometry_factor(Geometry::CompactTension, 0.9).is_ok());
        let err = geometry_factor(Geometry::CompactTension, 0.05).unwrap_err();
        assert!(err.to_string().starts_with("Invalid a/W"));
        assert!(geometry_factor(Geometry::CompactTension, f64::NAN).is_err());
    }

    #[test]
    fn test_ct_stress_intensity() {
        let result = stress_intensity(&ct(20.0, 25.0)).unwrap();
        let expected = 20_000.0 / (25.0 * 50f64.sqrt()) * result.geometry_factor / 1000f64.sqrt();
        assert!((result.stress_intensity - expected).abs() < 1e-9);
        assert_eq!(result.crack_ratio, 0.5);
        assert!(result.plane_strain_valid.is_none());
    }

    #[test]
    fn test_senb_stress_intensity() {
        let input = FractureInput {
            geometry: Geometry::SingleEdgeBend { span_mm: 80.0 },
            load_kn: 10.0,
            thickness_mm: 10.0,
            width_mm: 20.0,
            crack_length_mm: 10.0,
            yield_strength_mpa: None,
        };
        let result = stress_intensity(&input).unwrap();
        let expected = 10_000.0 * 80.0 / (10.0 * 20f64.powf(1.5)) * result.geometry_factor / 1000f64.sqrt();
        assert!((result.stress_intensity - expected).abs() < 1e-9);
    }

    #[test]
    fn test_plane_strain_check() {
        let mut input = ct(20.0, 25.0);
        input.yield_strength_mpa = Some(500.0);
        let result = stress_intensity(&input).unwrap();
        // K ≈ 34.55 → 2.5 (34.55/500)² m ≈ 11.9 mm < 25 mm
        let size = result.plane_strain_size_mm.unwrap();
        assert!((size - 11.94).abs() < 0.05, "size = {}", size);
        assert_eq!(result.plane_strain_valid, Some(true));

        input.yield_strength_mpa = Some(200.0);
        let result = stress_intensity(&input).unwrap();
        assert_eq!(result.plane_strain_valid, Some(false));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(stress_intensity(&ct(20.0, 48.0)).is_err());
        assert!(stress_intensity(&ct(-1.0, 25.0)).is_err());
    }
}
