//! Generator settings

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index::FILE_STRIDE;

/// Configuration for a synthetic merger forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of snapshots; roots live at the last one
    pub snapshots: usize,
    /// Number of independent trees
    pub roots: usize,
    /// Chance that a halo has a secondary progenitor merging into it
    pub merger_probability: f64,
    /// Chance that a halo's main branch is lost before the next snapshot back
    pub loss_probability: f64,
    /// Subgroups per Subfind output file, used for NodeIndex encoding
    pub subgroups_per_file: usize,
    /// Progenitors lighter than this are unresolved (10¹⁰ M☉)
    pub min_mass: f64,
    /// Periodic box side length (cMpc)
    pub box_size: f64,
    /// Dimensionless Hubble parameter written to the header
    pub hubble_param: f64,
    /// Matter density written to the header
    pub omega_matter: f64,
    /// Scale factor of the first snapshot
    pub first_scale_factor: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            snapshots: 29,
            roots: 10,
            merger_probability: 0.2,
            loss_probability: 0.05,
            subgroups_per_file: 64,
            min_mass: 0.01,
            box_size: 25.0,
            hubble_param: 0.6777,
            omega_matter: 0.307,
            first_scale_factor: 0.05,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Check that the settings describe a generable forest
    pub fn validate(&self) -> Result<()> {
        if self.snapshots == 0 || self.roots == 0 {
            return Err(Error::invalid_config("a forest needs at least one snapshot and one root"));
        }
        for (name, p) in [
            ("merger_probability", self.merger_probability),
            ("loss_probability", self.loss_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::invalid_config(format!("{} = {} is not a probability", name, p)));
            }
        }
        if self.subgroups_per_file == 0 || self.subgroups_per_file as i64 > FILE_STRIDE {
            return Err(Error::invalid_config(format!(
                "subgroups_per_file = {} must lie in 1..={}",
                self.subgroups_per_file, FILE_STRIDE
            )));
        }
        if !(self.min_mass > 0.0 && self.box_size > 0.0) {
            return Err(Error::invalid_config("min_mass and box_size must be positive"));
        }
        if !(self.first_scale_factor > 0.0 && self.first_scale_factor <= 1.0) {
            return Err(Error::invalid_config(format!(
                "first_scale_factor = {} must lie in (0, 1]",
                self.first_scale_factor
            )));
        }
        if !(self.hubble_param > 0.0 && self.omega_matter > 0.0 && self.omega_matter <= 1.0) {
            return Err(Error::invalid_config("header cosmology is not physical"));
        }
        Ok(())
    }

    /// Scale factor of every snapshot, log-spaced up to a = 1 today
    pub fn scale_factors(&self) -> Vec<f64> {
        if self.snapshots == 1 {
            return vec![1.0];
        }
        let ln_first = self.first_scale_factor.ln();
        let last = (self.snapshots - 1) as f64;
        (0..self.snapshots)
            .map(|i| (ln_first * (1.0 - i as f64 / last)).exp())
            .collect()
    }
}
