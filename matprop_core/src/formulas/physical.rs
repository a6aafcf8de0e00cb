//! # Physical Property Formulas
//!
//! Density, thermal transport and electrical conduction relations.

use crate::errors::{finite, positive, require_finite, CalcResult};

/// Avogadro's number (1/mol)
pub const AVOGADRO: f64 = 6.022e23;

/// Theoretical density ρ = n·M / (N_A·V_c)
///
/// # Arguments
/// * `atoms_per_cell` - n
/// * `molar_mass` - M (g/mol)
/// * `cell_volume_cm3` - V_c (cm³)
///
/// # Returns
/// Density in g/cm³
///
/// # Example
/// ```rust
/// use matprop_core::formulas::physical::theoretical_density;
///
/// // Copper: FCC, a = 3.615 Å
/// let v = 3.615e-8_f64.powi(3);
/// let rho = theoretical_density(4.0, 63.55, v).unwrap();
/// assert!((rho - 8.93).abs() < 0.01);
/// ```
pub fn theoretical_density(atoms_per_cell: f64, molar_mass: f64, cell_volume_cm3: f64) -> CalcResult<f64> {
    require_finite("atoms_per_cell", atoms_per_cell)?;
    require_finite("molar_mass", molar_mass)?;
    positive("theoretical_density", "cell_volume_cm3", require_finite("cell_volume_cm3", cell_volume_cm3)?)?;
    finite("theoretical_density", atoms_per_cell * molar_mass / (AVOGADRO * cell_volume_cm3))
}

/// Thermal diffusivity α = k / (ρ·Cp)
///
/// With k in W/(m·K), ρ in kg/m³ and Cp in J/(kg·K) the result is in m²/s.
pub fn thermal_diffusivity(conductivity: f64, density: f64, specific_heat: f64) -> CalcResult<f64> {
    require_finite("conductivity", conductivity)?;
    positive("thermal_diffusivity", "density", require_finite("density", density)?)?;
    positive("thermal_diffusivity", "specific_heat", require_finite("specific_heat", specific_heat)?)?;
    finite("thermal_diffusivity", conductivity / (density * specific_heat))
}

/// Electrical conductivity σ = 1/ρ
///
/// Resistivity in Ω·m gives conductivity in S/m.
pub fn conductivity(resistivity: f64) -> CalcResult<f64> {
    positive("conductivity", "resistivity", require_finite("resistivity", resistivity)?)?;
    finite("conductivity", 1.0 / resistivity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iron_bcc_density() {
        // Fe: BCC, a = 2.866 Å, M = 55.85 → ~7.87 g/cm³
        let v = 2.866e-8_f64.powi(3);
        let rho = theoretical_density(2.0, 55.85, v).unwrap();
        assert!((rho - 7.87).abs() < 0.02, "ρ = {}", rho);
    }

    #[test]
    fn test_density_zero_volume() {
        assert!(theoretical_density(4.0, 63.55, 0.0).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_thermal_diffusivity() {
        // Aluminium: k = 237, ρ = 2700, Cp = 900 → 9.75e-5 m²/s
        let a = thermal_diffusivity(237.0, 2700.0, 900.0).unwrap();
        assert!((a - 9.753e-5).abs() < 1e-7, "α = {}", a);
        assert!(thermal_diffusivity(237.0, 0.0, 900.0).is_err());
    }

    #[test]
    fn test_conductivity() {
        // Copper: 1.68e-8 Ω·m → 5.95e7 S/m
        let s = conductivity(1.68e-8).unwrap();
        assert!((s - 5.952e7).abs() / 5.952e7 < 1e-3);
        assert!(conductivity(0.0).is_err());
        assert!(conductivity(-1.0).is_err());
    }
}
