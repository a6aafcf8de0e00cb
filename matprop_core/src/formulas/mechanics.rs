//! # Mechanical Property Formulas
//!
//! Elementary relations between load, deformation and elastic constants,
//! plus an illustrative engineering stress-strain curve.
//!
//! ## Notation
//!
//! - `F` = Axial force (N)
//! - `A` = Cross-sectional area (mm²), so `F/A` is in MPa
//! - `ΔL`, `L₀` = Elongation and gauge length (same length unit)
//! - `E` = Young's modulus, `G` = shear modulus, `K` = bulk modulus
//! - `ν` = Poisson's ratio, physically within (−1, 0.5]
//! - `α` = Coefficient of thermal expansion (1/K)
//!
//! ## References
//!
//! - Callister & Rethwisch, Materials Science and Engineering, Ch. 6
//! - Dieter, Mechanical Metallurgy, Ch. 2 and 8

use serde::{Deserialize, Serialize};

use crate::errors::{finite, nonzero, positive, require_finite, CalcError, CalcResult};
use crate::numeric::Point2D;

// =============================================================================
// LOAD AND DEFORMATION
// =============================================================================

/// Engineering stress σ = F / A
///
/// # Arguments
/// * `force_n` - Axial force (N)
/// * `area_mm2` - Original cross-sectional area (mm²), must be positive
///
/// # Returns
/// Stress in MPa
///
/// # Example
/// ```rust
/// use matprop_core::formulas::mechanics::stress;
///
/// // 10 kN on a 50 mm² bar
/// assert_eq!(stress(10_000.0, 50.0).unwrap(), 200.0);
/// assert!(stress(10_000.0, 0.0).is_err());
/// ```
pub fn stress(force_n: f64, area_mm2: f64) -> CalcResult<f64> {
    require_finite("force_n", force_n)?;
    positive("stress", "area_mm2", require_finite("area_mm2", area_mm2)?)?;
    finite("stress", force_n / area_mm2)
}

/// Engineering strain ε = ΔL / L₀ (dimensionless)
pub fn strain(delta_length: f64, original_length: f64) -> CalcResult<f64> {
    require_finite("delta_length", delta_length)?;
    positive("strain", "original_length", require_finite("original_length", original_length)?)?;
    finite("strain", delta_length / original_length)
}

/// Young's modulus E = σ / ε
///
/// Returned in the unit of `stress` (MPa in → MPa out).
pub fn youngs_modulus(stress: f64, strain: f64) -> CalcResult<f64> {
    require_finite("stress", stress)?;
    nonzero("youngs_modulus", "strain", require_finite("strain", strain)?)?;
    finite("youngs_modulus", stress / strain)
}

// =============================================================================
// ELASTIC CONSTANTS (ISOTROPIC)
// =============================================================================

fn check_poisson(formula: &str, nu: f64) -> CalcResult<f64> {
    require_finite("poisson_ratio", nu)?;
    if nu <= -1.0 || nu > 0.5 {
        return Err(CalcError::domain(
            formula,
            format!("Poisson's ratio must be within (-1, 0.5], got {}", nu),
        ));
    }
    Ok(nu)
}

/// Shear modulus G = E / (2(1 + ν))
///
/// # Example
/// ```rust
/// use matprop_core::formulas::mechanics::shear_modulus;
///
/// // Steel: E = 200 GPa, ν = 0.3 → G ≈ 76.9 GPa
/// let g = shear_modulus(200.0, 0.3).unwrap();
/// assert!((g - 76.923).abs() < 0.001);
/// ```
pub fn shear_modulus(youngs_modulus: f64, poisson_ratio: f64) -> CalcResult<f64> {
    require_finite("youngs_modulus", youngs_modulus)?;
    let nu = check_poisson("shear_modulus", poisson_ratio)?;
    finite("shear_modulus", youngs_modulus / (2.0 * (1.0 + nu)))
}

/// Bulk modulus K = E / (3(1 − 2ν))
///
/// Undefined for an incompressible material (ν = 0.5).
pub fn bulk_modulus(youngs_modulus: f64, poisson_ratio: f64) -> CalcResult<f64> {
    require_finite("youngs_modulus", youngs_modulus)?;
    let nu = check_poisson("bulk_modulus", poisson_ratio)?;
    let denom = nonzero("bulk_modulus", "1 - 2*poisson_ratio", 3.0 * (1.0 - 2.0 * nu))?;
    finite("bulk_modulus", youngs_modulus / denom)
}

/// Fully constrained thermal stress σ = E·1000·α·ΔT
///
/// The factor 1000 converts E from GPa so the result is in MPa.
///
/// # Arguments
/// * `youngs_modulus_gpa` - E (GPa)
/// * `expansion_coefficient` - α (1/K)
/// * `delta_t` - Temperature change (K or °C)
pub fn thermal_stress(youngs_modulus_gpa: f64, expansion_coefficient: f64, delta_t: f64) -> CalcResult<f64> {
    require_finite("youngs_modulus_gpa", youngs_modulus_gpa)?;
    require_finite("expansion_coefficient", expansion_coefficient)?;
    require_finite("delta_t", delta_t)?;
    finite("thermal_stress", youngs_modulus_gpa * 1000.0 * expansion_coefficient * delta_t)
}

/// Safety factor n = σ_yield / σ_applied
pub fn safety_factor(yield_strength: f64, applied_stress: f64) -> CalcResult<f64> {
    require_finite("yield_strength", yield_strength)?;
    nonzero("safety_factor", "applied_stress", require_finite("applied_stress", applied_stress)?)?;
    finite("safety_factor", yield_strength / applied_stress)
}

// =============================================================================
// STRESS-STRAIN CURVE SYNTHESIS
// =============================================================================

/// Fraction of the plastic strain range reached at maximum load
const UNIFORM_ELONGATION_FRACTION: f64 = 0.7;

/// Drop from UTS to fracture stress, as a fraction of UTS
const NECKING_DROP: f64 = 0.2;

/// Tensile properties used to draw an engineering stress-strain curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TensileProperties {
    /// Young's modulus (GPa)
    pub youngs_modulus_gpa: f64,
    /// 0.2% offset yield strength (MPa)
    pub yield_strength_mpa: f64,
    /// Ultimate tensile strength (MPa)
    pub tensile_strength_mpa: f64,
    /// Strain at fracture (fraction, e.g. 0.25 for 25%)
    pub elongation: f64,
}

impl TensileProperties {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.youngs_modulus_gpa.is_finite() && self.youngs_modulus_gpa > 0.0) {
            return Err(CalcError::invalid_input(
                "youngs_modulus_gpa",
                self.youngs_modulus_gpa.to_string(),
                "Modulus must be positive",
            ));
        }
        if !(self.yield_strength_mpa.is_finite() && self.yield_strength_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "yield_strength_mpa",
                self.yield_strength_mpa.to_string(),
                "Yield strength must be positive",
            ));
        }
        if !(self.tensile_strength_mpa.is_finite() && self.tensile_strength_mpa >= self.yield_strength_mpa) {
            return Err(CalcError::invalid_input(
                "tensile_strength_mpa",
                self.tensile_strength_mpa.to_string(),
                "Tensile strength must be at least the yield strength",
            ));
        }
        if !(self.elongation.is_finite() && self.elongation > self.yield_strain()) {
            return Err(CalcError::invalid_input(
                "elongation",
                self.elongation.to_string(),
                "Elongation must exceed the elastic strain at yield",
            ));
        }
        Ok(())
    }

    /// Elastic strain at yield σy / E
    pub fn yield_strain(&self) -> f64 {
        self.yield_strength_mpa / (self.youngs_modulus_gpa * 1000.0)
    }
}

/// Synthesized engineering stress-strain curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressStrainCurve {
    /// (strain, stress MPa) pairs from the origin to fracture
    pub points: Vec<Point2D>,
    pub yield_strain: f64,
    /// Strain at maximum load
    pub uniform_strain: f64,
    pub fracture_stress_mpa: f64,
    /// Modulus of resilience σy²/(2E) (MJ/m³)
    pub resilience_mj_m3: f64,
    /// Area under the curve (MJ/m³)
    pub toughness_mj_m3: f64,
}

/// Draw an illustrative engineering stress-strain curve.
///
/// The curve is linear to yield, rises quadratically to the UTS at uniform
/// elongation (70% of the plastic range), then falls quadratically to 80%
/// of the UTS at fracture. It is meant for visualization and for comparing
/// materials, not as a constitutive model.
///
/// `points` is clamped to at least 3.
pub fn synthesize_stress_strain(props: &TensileProperties, points: usize) -> CalcResult<StressStrainCurve> {
    props.validate()?;

    let e_mpa = props.youngs_modulus_gpa * 1000.0;
    let sy = props.yield_strength_mpa;
    let uts = props.tensile_strength_mpa;
    let ey = props.yield_strain();
    let ef = props.elongation;
    let eu = ey + UNIFORM_ELONGATION_FRACTION * (ef - ey);

    let stress_at = |e: f64| -> f64 {
        if e <= ey {
            e_mpa * e
        } else if e <= eu {
            let t = (e - ey) / (eu - ey);
            sy + (uts - sy) * (1.0 - (1.0 - t).powi(2))
        } else {
            let s = (e - eu) / (ef - eu);
            uts * (1.0 - NECKING_DROP * s * s)
        }
    };

    let plastic_steps = points.max(3) - 2;
    let mut curve = Vec::with_capacity(plastic_steps + 2);
    curve.push(Point2D::new(0.0, 0.0));
    curve.push(Point2D::new(ey, sy));
    for i in 1..=plastic_steps {
        let e = ey + (ef - ey) * i as f64 / plastic_steps as f64;
        curve.push(Point2D::new(e, stress_at(e)));
    }

    let toughness: f64 = curve
        .windows(2)
        .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
        .sum();

    Ok(StressStrainCurve {
        points: curve,
        yield_strain: ey,
        uniform_strain: eu,
        fracture_stress_mpa: uts * (1.0 - NECKING_DROP),
        resilience_mj_m3: sy * sy / (2.0 * e_mpa),
        toughness_mj_m3: toughness,
    })
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() / b.abs().max(1.0) < 1e-9
    }

    #[test]
    fn test_stress_and_strain() {
        assert!(approx_eq(stress(5000.0, 20.0).unwrap(), 250.0));
        assert!(approx_eq(strain(0.5, 50.0).unwrap(), 0.01));
        assert!(strain(0.5, 0.0).is_err());
        assert!(stress(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_youngs_modulus() {
        assert!(approx_eq(youngs_modulus(200.0, 0.001).unwrap(), 200_000.0));
        let err = youngs_modulus(200.0, 0.0).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_elastic_constants() {
        // Aluminium: E = 70 GPa, ν = 0.33
        let g = shear_modulus(70.0, 0.33).unwrap();
        assert!(approx_eq(g, 70.0 / 2.66), "G = {}", g);
        let k = bulk_modulus(70.0, 0.33).unwrap();
        assert!(approx_eq(k, 70.0 / 1.02), "K = {}", k);
    }

    #[test]
    fn test_bulk_modulus_incompressible() {
        assert!(bulk_modulus(1.0, 0.5).unwrap_err().is_domain_error());
        assert!(shear_modulus(1.0, -1.0).is_err());
        assert!(shear_modulus(1.0, 0.6).is_err());
    }

    #[test]
    fn test_thermal_stress() {
        // Steel: 200 GPa, 12e-6 /K, 100 K → 240 MPa
        let s = thermal_stress(200.0, 12e-6, 100.0).unwrap();
        assert!(approx_eq(s, 240.0), "σ = {}", s);
    }

    #[test]
    fn test_safety_factor() {
        assert!(approx_eq(safety_factor(250.0, 100.0).unwrap(), 2.5));
        assert!(safety_factor(250.0, 0.0).is_err());
    }

    fn steel() -> TensileProperties {
        TensileProperties {
            youngs_modulus_gpa: 200.0,
            yield_strength_mpa: 250.0,
            tensile_strength_mpa: 400.0,
            elongation: 0.25,
        }
    }

    #[test]
    fn test_stress_strain_curve_shape() {
        let curve = synthesize_stress_strain(&steel(), 100).unwrap();
        assert_eq!(curve.points.len(), 100);
        assert_eq!(curve.points[0], Point2D::new(0.0, 0.0));
        assert!(approx_eq(curve.points[1].x, 0.00125));
        assert!(approx_eq(curve.points[1].y, 250.0));

        let last = curve.points.last().unwrap();
        assert!(approx_eq(last.x, 0.25));
        assert!(approx_eq(last.y, 320.0), "fracture stress = {}", last.y);

        let peak = curve.points.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(peak <= 400.0 + EPSILON);
        assert!(peak > 399.0);
    }

    #[test]
    fn test_resilience_and_toughness() {
        let curve = synthesize_stress_strain(&steel(), 200).unwrap();
        // 250² / (2 * 200000) = 0.15625 MJ/m³
        assert!(approx_eq(curve.resilience_mj_m3, 0.15625));
        // Area lies between yield*elongation and UTS*elongation
        assert!(curve.toughness_mj_m3 > 250.0 * 0.25 * 0.9);
        assert!(curve.toughness_mj_m3 < 400.0 * 0.25);
    }

    #[test]
    fn test_stress_strain_validation() {
        let mut props = steel();
        props.tensile_strength_mpa = 200.0;
        assert!(synthesize_stress_strain(&props, 50).is_err());

        let mut props = steel();
        props.elongation = 0.001;
        assert!(synthesize_stress_strain(&props, 50).is_err());
    }
}
