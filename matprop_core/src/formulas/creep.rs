//! # Creep
//!
//! Steady-state creep rate (Norton power law with Arrhenius temperature
//! dependence) and Larson-Miller rupture time.
//!
//! ## Formulas
//!
//! ```text
//! ε̇  = A · σⁿ · exp(−Q / (R·T))          R = 8.314 J/(mol·K)
//! LMP = T · (C + log10 t_r)
//! log10 t_r = LMP / T − C
//! ```
//!
//! ## Larson-Miller Approximation
//!
//! The parameter is not looked up from material master curves. It is
//! approximated by the linear stress correlation `LMP = 22000 − 20·σ`
//! (σ in MPa). Real rupture predictions need calibration data for the alloy;
//! treat results as order-of-magnitude estimates.

use serde::{Deserialize, Serialize};

use crate::errors::{finite, require_finite, CalcError, CalcResult};
use crate::units::{Celsius, Kelvin};

/// Universal gas constant (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.314;

/// Intercept of the LMP-stress correlation
const LMP_INTERCEPT: f64 = 22000.0;

/// Slope of the LMP-stress correlation (per MPa)
const LMP_STRESS_SLOPE: f64 = 20.0;

fn absolute_temperature(formula: &str, temperature: Celsius) -> CalcResult<Kelvin> {
    require_finite("temperature_c", temperature.0)?;
    let t: Kelvin = temperature.into();
    if t.0 <= 0.0 {
        return Err(CalcError::domain(
            formula,
            format!("temperature {} °C is at or below absolute zero", temperature.0),
        ));
    }
    Ok(t)
}

/// Norton creep rate ε̇ = A·σⁿ·exp(−Q/(R·T_K))
///
/// # Arguments
/// * `coefficient` - Material constant A (units consistent with σⁿ and 1/s)
/// * `stress_mpa` - Applied stress σ (MPa), non-negative
/// * `exponent` - Stress exponent n
/// * `activation_energy` - Q (J/mol)
/// * `temperature` - Temperature (°C)
///
/// # Returns
/// Steady-state creep rate (1/s)
pub fn norton_creep_rate(
    coefficient: f64,
    stress_mpa: f64,
    exponent: f64,
    activation_energy: f64,
    temperature: Celsius,
) -> CalcResult<f64> {
    require_finite("coefficient", coefficient)?;
    require_finite("exponent", exponent)?;
    require_finite("activation_energy", activation_energy)?;
    if !(stress_mpa.is_finite() && stress_mpa >= 0.0) {
        return Err(CalcError::domain(
            "norton_creep_rate",
            format!("stress must be non-negative, got {}", stress_mpa),
        ));
    }
    let t = absolute_temperature("norton_creep_rate", temperature)?;
    finite(
        "norton_creep_rate",
        coefficient * stress_mpa.powf(exponent) * (-activation_energy / (GAS_CONSTANT * t.0)).exp(),
    )
}

/// Approximate Larson-Miller parameter for a stress: `22000 − 20·σ`.
#[inline]
pub fn larson_miller_parameter(stress_mpa: f64) -> f64 {
    LMP_INTERCEPT - LMP_STRESS_SLOPE * stress_mpa
}

/// Larson-Miller rupture time in hours.
///
/// # Example
/// ```rust
/// use matprop_core::formulas::creep::rupture_time_hours;
/// use matprop_core::units::Celsius;
///
/// // σ = 100 MPa → LMP = 20000; at 726.85 °C (1000 K): log10 t = 20 − 20 = 0
/// let t = rupture_time_hours(100.0, Celsius(726.85), 20.0).unwrap();
/// assert!((t - 1.0).abs() < 1e-9);
/// ```
pub fn rupture_time_hours(stress_mpa: f64, temperature: Celsius, constant: f64) -> CalcResult<f64> {
    require_finite("stress_mpa", stress_mpa)?;
    require_finite("constant", constant)?;
    let t = absolute_temperature("rupture_time", temperature)?;
    let lmp = larson_miller_parameter(stress_mpa);
    if lmp <= 0.0 {
        return Err(CalcError::domain(
            "rupture_time",
            format!("stress {} MPa is beyond the Larson-Miller correlation range", stress_mpa),
        ));
    }
    let log_tr = lmp / t.0 - constant;
    finite("rupture_time", 10f64.powf(log_tr))
}

/// Creep loading and material constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreepInput {
    pub stress_mpa: f64,
    pub temperature_c: f64,
    /// Norton coefficient A
    pub coefficient: f64,
    /// Norton stress exponent n
    pub exponent: f64,
    /// Activation energy Q (J/mol)
    pub activation_energy: f64,
    /// Larson-Miller constant C
    pub larson_miller_constant: f64,
}

/// Creep rate and rupture estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreepResult {
    /// Steady-state creep rate (1/s)
    pub creep_rate: f64,
    pub larson_miller_parameter: f64,
    pub rupture_time_hours: f64,
    /// Creep strain accumulated at rupture at the steady rate
    pub strain_at_rupture: f64,
}

/// Evaluate creep rate and Larson-Miller rupture time together.
pub fn analyze(input: &CreepInput) -> CalcResult<CreepResult> {
    let temperature = Celsius(input.temperature_c);
    let creep_rate = norton_creep_rate(
        input.coefficient,
        input.stress_mpa,
        input.exponent,
        input.activation_energy,
        temperature,
    )?;
    let rupture = rupture_time_hours(input.stress_mpa, temperature, input.larson_miller_constant)?;
    Ok(CreepResult {
        creep_rate,
        larson_miller_parameter: larson_miller_parameter(input.stress_mpa),
        rupture_time_hours: rupture,
        strain_at_rupture: finite("creep", creep_rate * rupture * 3600.0)?,
    })
}
