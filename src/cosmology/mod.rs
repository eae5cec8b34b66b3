//! Cosmology Module: Age of the Universe along a Track
//!
//! Tracks are indexed by snapshot; the time axis users want is usually the
//! cosmic age. The conversion is delegated to a [`Cosmology`] so callers can
//! plug in their own background model.
//!
//! ## Flat ΛCDM
//!
//! Ignoring radiation, a flat universe with matter density Ωm and
//! ΩΛ = 1 - Ωm has the closed-form age
//!
//!   t(a) = 2 / (3 H₀ √ΩΛ) · asinh( √(ΩΛ/Ωm) · a^{3/2} )
//!
//! with a = 1 / (1 + z). As ΩΛ → 0 this reduces to the Einstein–de Sitter
//! age t(a) = 2/(3 H₀) · a^{3/2}.

use std::collections::BTreeMap;

use ndarray::Array1;

use crate::error::{Error, Result};

/// 1 / (100 km s⁻¹ Mpc⁻¹) in Gyr
pub const HUBBLE_TIME_GYR: f64 = 9.777922216807891;

/// Background cosmology able to convert redshift to cosmic age
pub trait Cosmology {
    /// Age of the universe at redshift `z`, in Gyr
    fn age_at(&self, redshift: f64) -> f64;

    /// Element-wise age for an array of redshifts
    fn age(&self, redshifts: &Array1<f64>) -> Array1<f64> {
        redshifts.mapv(|z| self.age_at(z))
    }
}

/// Flat matter + Λ cosmology
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatLambdaCdm {
    /// Dimensionless Hubble parameter h (H₀ = 100 h km/s/Mpc)
    pub hubble_param: f64,
    /// Present-day matter density Ωm
    pub omega_matter: f64,
}

impl FlatLambdaCdm {
    pub fn new(hubble_param: f64, omega_matter: f64) -> Self {
        Self { hubble_param, omega_matter }
    }

    /// Build from a header attribute group
    ///
    /// Missing attributes are reported as `MissingGroup` naming
    /// `<header>/<attribute>`.
    pub fn from_attributes(
        header_group: &str,
        attributes: &BTreeMap<String, f64>,
        hubble_key: &str,
        omega_key: &str,
    ) -> Result<Self> {
        let lookup = |key: &str| {
            attributes
                .get(key)
                .copied()
                .ok_or_else(|| Error::missing_group(format!("{}/{}", header_group, key)))
        };

        let hubble_param = lookup(hubble_key)?;
        let omega_matter = lookup(omega_key)?;

        if hubble_param <= 0.0 || !(omega_matter > 0.0 && omega_matter <= 1.0) {
            return Err(Error::integrity(format!(
                "non-physical header cosmology h = {}, Ωm = {}",
                hubble_param, omega_matter
            )));
        }

        Ok(Self::new(hubble_param, omega_matter))
    }

    /// Dark-energy density, closing the universe
    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_matter
    }

    /// Hubble time 1/H₀ in Gyr
    pub fn hubble_time(&self) -> f64 {
        HUBBLE_TIME_GYR / self.hubble_param
    }
}

impl Cosmology for FlatLambdaCdm {
    fn age_at(&self, redshift: f64) -> f64 {
        let a = 1.0 / (1.0 + redshift);
        let a32 = a.powf(1.5);
        let omega_lambda = self.omega_lambda();

        if omega_lambda <= 1e-12 {
            return 2.0 / 3.0 * self.hubble_time() * a32;
        }

        let prefactor = 2.0 / (3.0 * omega_lambda.sqrt());
        prefactor * ((omega_lambda / self.omega_matter).sqrt() * a32).asinh() * self.hubble_time()
    }
}
