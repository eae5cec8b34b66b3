//! Column naming configuration

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where each catalogue quantity lives in the backing container
///
/// Defaults follow the EAGLE database layout. Any subset of fields can be
/// overridden from JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueLayout {
    /// Depth-first unique identifier
    pub galaxy_id: String,
    /// Earliest main-branch ancestor
    pub top_leaf_id: String,
    /// Largest GalaxyID among all progenitors
    pub last_prog_id: String,
    /// Immediate descendant, -1 for none
    pub descendant_id: String,
    /// Encoded snapshot / file / local position
    pub node_index: String,
    /// Snapshot number of each row
    pub snap_num: String,
    /// Prefix joined to property names, e.g. `Subhalo/` + `Mass`
    pub property_prefix: String,
    /// Column stem of the position components (`<stem>_x` ...)
    pub position_stem: String,
    /// Column stem of the velocity components
    pub velocity_stem: String,
    /// One scale factor per snapshot, indexed by snapshot number
    pub scale_factor: String,
    /// Attribute group holding simulation metadata
    pub header_group: String,
    /// Header attribute with the dimensionless Hubble parameter
    pub hubble_param_attr: String,
    /// Header attribute with the matter density parameter
    pub omega_matter_attr: String,
}

impl Default for CatalogueLayout {
    fn default() -> Self {
        Self {
            galaxy_id: "MergerTree/GalaxyID".to_string(),
            top_leaf_id: "MergerTree/TopLeafID".to_string(),
            last_prog_id: "MergerTree/LastProgID".to_string(),
            descendant_id: "MergerTree/DescendantID".to_string(),
            node_index: "MergerTree/nodeIndex".to_string(),
            snap_num: "Subhalo/SnapNum".to_string(),
            property_prefix: "Subhalo/".to_string(),
            position_stem: "CentreOfPotential".to_string(),
            velocity_stem: "Velocity".to_string(),
            scale_factor: "Snapshots/ScaleFactor".to_string(),
            header_group: "Header".to_string(),
            hubble_param_attr: "HubbleParam".to_string(),
            omega_matter_attr: "Omega0".to_string(),
        }
    }
}

impl CatalogueLayout {
    /// Load overrides from a JSON file
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Full column name of a property
    pub fn property_column(&self, name: &str) -> String {
        format!("{}{}", self.property_prefix, name)
    }
}
