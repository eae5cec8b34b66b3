//! # eagle-database
//!
//! Read-only access to EAGLE-like Subfind catalogues and the depth-first
//! merger trees built on top of them.
//!
//! ## Data Model
//!
//! A catalogue is a set of parallel flat arrays, one entry per subgroup per
//! snapshot. Every subgroup carries three identities:
//!
//! - **GalaxyID**: depth-first tree number, unique across the catalogue
//! - **NodeIndex**: `snapshot × 10¹² + file × 10⁸ + local`, where it was written
//! - **(subgroup_number, snap_number)**: its position among one snapshot's rows
//!
//! The crate translates between all three and, given one subgroup, rebuilds
//! its evolutionary track through the merger tree:
//!
//! ```text
//!   descendants (DescendantID walk)      main progenitors (ID range)
//!   root ← … ← d₂ ← d₁  ←  subgroup  ←  p₁ ← p₂ ← … ← TopLeaf
//!   └──────────── merged track, latest snapshot first ────────────┘
//! ```
//!
//! Along that track any catalogue column can be gathered, alongside the
//! scale factor, redshift and cosmic age of each entry.
//!
//! ## Breaks
//!
//! Depth-first numbering makes an unbroken main branch a run of consecutive
//! GalaxyIDs. The first position where that run breaks is where the tracked
//! object merged into a more massive neighbour; its snapshot is reported as
//! the last resolved snapshot.
//!
//! ## Example
//!
//! ```no_run
//! use eagle_database::{open_json, Catalogue};
//!
//! let store = open_json("catalogue.json")?;
//! let catalogue = Catalogue::open(store)?;
//! let mut subgroup = catalogue.track_subgroup(0, 28)?;
//!
//! println!("track: {:?}", subgroup.main_merger_tree().galaxy_ids());
//! let mass = subgroup.get_property_evolution("Mass")?;
//! println!("mass: {:?}", mass);
//! # Ok::<(), eagle_database::Error>(())
//! ```
//!
//! ## References
//!
//! - McAlpine et al., Astronomy & Computing 15, 72 (2016) - EAGLE public database
//! - Qu et al., MNRAS 464, 1659 (2017) - EAGLE merger trees
//! - Lemson & Springel, ASP Conf. Ser. 351, 212 (2006) - Depth-first tree numbering
//! - Planck Collaboration, A&A 571, A16 (2014) - Cosmological parameters

pub mod catalogue;
pub mod cosmology;
pub mod error;
pub mod evolution;
pub mod index;
pub mod store;
pub mod synthetic;
pub mod tree;

// Re-exports from catalogue
pub use catalogue::{descendant_from_raw, Catalogue, CatalogueLayout, NO_DESCENDANT};

// Re-exports from index
pub use index::{
    // Sorted lookups
    argsort,
    search,
    search_matched,
    search_one,
    // Identity translation
    IdentityResolver,
    NodeIndex,
};

// Re-exports from tree
pub use tree::{Subgroup, Track, TrackEntry};

// Re-exports from evolution
pub use evolution::{Evolution, Property, PropertyEvolution};

// Re-exports from store
pub use store::{open_json, write_json, ArrayStore, Column, InMemoryStore};

// Re-exports from cosmology
pub use cosmology::{Cosmology, FlatLambdaCdm};

// Re-exports from synthetic
pub use synthetic::{ForestConfig, SyntheticForest};

pub use error::{Error, Result};
