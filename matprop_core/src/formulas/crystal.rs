//! # Crystallography and X-Ray Diffraction
//!
//! Unit-cell volume, theoretical density and idealized powder XRD peak
//! positions for the common metallic lattices.
//!
//! ## Cell Volume
//!
//! ```text
//! V = abc·√(1 − cos²α − cos²β − cos²γ + 2·cosα·cosβ·cosγ)
//! ```
//!
//! For HCP the lattice parameters describe the primitive cell
//! (a = b, γ = 120°); the conventional hexagonal prism holding six atoms is
//! three times that volume.
//!
//! ## Peak Positions
//!
//! ```text
//! cubic:  d = a / √(h² + k² + l²)
//! HCP:    1/d² = 4/3·(h² + hk + k²)/a² + l²/c²
//! Bragg:  θ = asin(λ / 2d)
//! ```
//!
//! Intensities are an illustrative exponential decay with 2θ. They are not
//! structure factors and only serve to draw a plausible pattern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{finite, positive, require_finite, CalcError, CalcResult};
use crate::formulas::physical::theoretical_density;
use crate::units::{CubicAngstrom, CubicCm};

/// Decay length of the illustrative intensity envelope (degrees 2θ)
const INTENSITY_DECAY: f64 = 45.0;

/// Peaks closer than this in d-spacing (Å) are the same reflection family
const D_SPACING_TOLERANCE: f64 = 1e-6;

/// Crystal structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrystalSystem {
    /// Simple cubic
    Sc,
    /// Body-centered cubic
    Bcc,
    /// Face-centered cubic
    Fcc,
    /// Hexagonal close-packed
    Hcp,
    /// Diamond cubic
    Dc,
}

impl CrystalSystem {
    pub const ALL: [CrystalSystem; 5] = [
        CrystalSystem::Sc,
        CrystalSystem::Bcc,
        CrystalSystem::Fcc,
        CrystalSystem::Hcp,
        CrystalSystem::Dc,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CrystalSystem::Sc => "Simple Cubic",
            CrystalSystem::Bcc => "Body-Centered Cubic",
            CrystalSystem::Fcc => "Face-Centered Cubic",
            CrystalSystem::Hcp => "Hexagonal Close-Packed",
            CrystalSystem::Dc => "Diamond Cubic",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            CrystalSystem::Sc => "sc",
            CrystalSystem::Bcc => "bcc",
            CrystalSystem::Fcc => "fcc",
            CrystalSystem::Hcp => "hcp",
            CrystalSystem::Dc => "dc",
        }
    }

    /// Atoms in the conventional cell
    pub fn atoms_per_cell(&self) -> u32 {
        match self {
            CrystalSystem::Sc => 1,
            CrystalSystem::Bcc => 2,
            CrystalSystem::Fcc => 4,
            CrystalSystem::Hcp => 6,
            CrystalSystem::Dc => 8,
        }
    }

    /// Atomic packing fraction for hard spheres
    pub fn packing_fraction(&self) -> f64 {
        match self {
            CrystalSystem::Sc => 0.52,
            CrystalSystem::Bcc => 0.68,
            CrystalSystem::Fcc | CrystalSystem::Hcp => 0.74,
            CrystalSystem::Dc => 0.34,
        }
    }

    pub fn is_cubic(&self) -> bool {
        !matches!(self, CrystalSystem::Hcp)
    }

    /// Whether reflection (hkl) survives the lattice extinction rules
    pub fn allows_reflection(&self, h: u8, k: u8, l: u8) -> bool {
        let (h, k, l) = (u32::from(h), u32::from(k), u32::from(l));
        let all_even = h % 2 == 0 && k % 2 == 0 && l % 2 == 0;
        let all_odd = h % 2 == 1 && k % 2 == 1 && l % 2 == 1;
        match self {
            CrystalSystem::Sc => true,
            CrystalSystem::Bcc => (h + k + l) % 2 == 0,
            CrystalSystem::Fcc => all_even || all_odd,
            CrystalSystem::Dc => (all_even || all_odd) && (h + k + l) % 4 != 2,
            CrystalSystem::Hcp => !((h + 2 * k) % 3 == 0 && l % 2 == 1),
        }
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CrystalSystem {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.short_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("crystal_system", s, "expected one of sc, bcc, fcc, hcp, dc"))
    }
}

/// Lattice parameters: lengths in Å, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl LatticeParameters {
    pub fn cubic(a: f64) -> Self {
        Self { a, b: a, c: a, alpha: 90.0, beta: 90.0, gamma: 90.0 }
    }

    pub fn hexagonal(a: f64, c: f64) -> Self {
        Self { a, b: a, c, alpha: 90.0, beta: 90.0, gamma: 120.0 }
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, v) in [("a", self.a), ("b", self.b), ("c", self.c)] {
            positive("lattice", field, require_finite(field, v)?)?;
        }
        for (field, v) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            require_finite(field, v)?;
            if !(v > 0.0 && v < 180.0) {
                return Err(CalcError::invalid_input(field, v.to_string(), "angle must lie between 0 and 180 degrees"));
            }
        }
        Ok(())
    }
}

/// Conventional cell volume (Å³).
///
/// # Example
/// ```rust
/// use matprop_core::formulas::crystal::{cell_volume, CrystalSystem, LatticeParameters};
///
/// let v = cell_volume(CrystalSystem::Fcc, &LatticeParameters::cubic(4.05)).unwrap();
/// assert!((v.0 - 66.43).abs() < 0.01);
/// ```
pub fn cell_volume(system: CrystalSystem, lattice: &LatticeParameters) -> CalcResult<CubicAngstrom> {
    lattice.validate()?;
    let (ca, cb, cg) = (
        lattice.alpha.to_radians().cos(),
        lattice.beta.to_radians().cos(),
        lattice.gamma.to_radians().cos(),
    );
    let radicand = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
    if radicand <= 0.0 {
        return Err(CalcError::domain("cell_volume", "lattice angles do not form a cell"));
    }
    let primitive = lattice.a * lattice.b * lattice.c * radicand.sqrt();
    let volume = match system {
        CrystalSystem::Hcp => 3.0 * primitive,
        _ => primitive,
    };
    Ok(CubicAngstrom(finite("cell_volume", volume)?))
}

/// Cell geometry and density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrystalResult {
    pub system: CrystalSystem,
    pub volume_a3: f64,
    pub density_g_cm3: f64,
    pub atoms_per_cell: u32,
    pub packing_fraction: f64,
}

/// Cell volume, theoretical density and packing for a lattice.
///
/// # Arguments
/// * `molar_mass` - g/mol
pub fn analyze(system: CrystalSystem, lattice: &LatticeParameters, molar_mass: f64) -> CalcResult<CrystalResult> {
    positive("crystal", "molar_mass", require_finite("molar_mass", molar_mass)?)?;
    let volume = cell_volume(system, lattice)?;
    let volume_cm3: CubicCm = volume.into();
    let density = theoretical_density(f64::from(system.atoms_per_cell()), molar_mass, volume_cm3.0)?;
    Ok(CrystalResult {
        system,
        volume_a3: volume.0,
        density_g_cm3: density,
        atoms_per_cell: system.atoms_per_cell(),
        packing_fraction: system.packing_fraction(),
    })
}

/// One powder diffraction reflection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XrdPeak {
    pub h: u8,
    pub k: u8,
    pub l: u8,
    /// Interplanar spacing (Å)
    pub d_spacing: f64,
    /// Diffraction angle (degrees)
    pub two_theta: f64,
    /// Relative intensity, 100 at the first peak
    pub intensity: f64,
}

impl XrdPeak {
    pub fn miller_label(&self) -> String {
        format!("({}{}{})", self.h, self.k, self.l)
    }
}

fn d_spacing(system: CrystalSystem, lattice: &LatticeParameters, h: u8, k: u8, l: u8) -> f64 {
    let (h, k, l) = (f64::from(h), f64::from(k), f64::from(l));
    match system {
        CrystalSystem::Hcp => {
            let inv_d2 = 4.0 / 3.0 * (h * h + h * k + k * k) / (lattice.a * lattice.a) + l * l / (lattice.c * lattice.c);
            1.0 / inv_d2.sqrt()
        }
        _ => lattice.a / (h * h + k * k + l * l).sqrt(),
    }
}

/// Allowed reflections up to `max_index`, one per d-spacing, sorted by 2θ.
///
/// Cubic systems use only `a`; HCP uses `a` and `c`. Reflections with
/// `λ/2d > 1` cannot diffract and are left out.
///
/// # Example
/// ```rust
/// use matprop_core::formulas::crystal::{xrd_peaks, CrystalSystem, LatticeParameters};
///
/// let peaks = xrd_peaks(CrystalSystem::Fcc, &LatticeParameters::cubic(4.05), 1.5406, 4).unwrap();
/// assert_eq!(peaks[0].miller_label(), "(111)");
/// assert!((peaks[0].two_theta - 38.47).abs() < 0.05);
/// ```
pub fn xrd_peaks(
    system: CrystalSystem,
    lattice: &LatticeParameters,
    wavelength: f64,
    max_index: u8,
) -> CalcResult<Vec<XrdPeak>> {
    lattice.validate()?;
    positive("xrd_peaks", "wavelength", require_finite("wavelength", wavelength)?)?;
    if max_index == 0 {
        return Err(CalcError::invalid_input("max_index", "0", "must be at least 1"));
    }

    let mut peaks = Vec::new();
    let mut unreachable = 0usize;
    for h in 0..=max_index {
        for k in 0..=h {
            // Cubic permutations share d; HCP keeps every l
            let l_max = if system.is_cubic() { k } else { max_index };
            for l in 0..=l_max {
                if h == 0 && k == 0 && l == 0 {
                    continue;
                }
                if !system.allows_reflection(h, k, l) {
                    continue;
                }
                let d = d_spacing(system, lattice, h, k, l);
                let sin_theta = wavelength / (2.0 * d);
                if !sin_theta.is_finite() || sin_theta > 1.0 {
                    unreachable += 1;
                    continue;
                }
                peaks.push(XrdPeak {
                    h,
                    k,
                    l,
                    d_spacing: d,
                    two_theta: 2.0 * sin_theta.asin().to_degrees(),
                    intensity: 0.0,
                });
            }
        }
    }
    if unreachable > 0 {
        debug!(unreachable, wavelength, "reflections beyond the Bragg limit skipped");
    }

    peaks.sort_by(|a, b| a.two_theta.total_cmp(&b.two_theta));
    peaks.dedup_by(|later, first| (later.d_spacing - first.d_spacing).abs() < D_SPACING_TOLERANCE);

    if let Some(first) = peaks.first().map(|p| p.two_theta) {
        for peak in &mut peaks {
            peak.intensity = 100.0 * (-(peak.two_theta - first) / INTENSITY_DECAY).exp();
        }
    }
    Ok(peaks)
}
