//! Subgroup Tracking: Rebuilding One Object's History
//!
//! Given `(subgroup_number, snap_number)`, construction resolves the
//! subgroup's catalogue row and derives its evolutionary track in one go:
//!
//! 1. Row lookup among the rows whose `SnapNum` equals `snap_number`
//! 2. Main-progenitor branch: the GalaxyID range `[GalaxyID, TopLeafID]`,
//!    batch-resolved to rows (depth-first numbering keeps a main branch
//!    contiguous, so no per-step traversal is needed)
//! 3. Descendant chain: follow `DescendantID` links until there are none,
//!    bounded by the snapshot count
//! 4. Merge: descendant chain reversed, then the main branch
//! 5. Break detection on the merged track
//! 6. Time axis (scale factor, redshift, age) along the merged track
//!
//! Construction is all-or-nothing: any failure returns an error and no
//! partially built subgroup is ever observable.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::rc::Rc;

use ndarray::Array1;

use super::track::{Track, TrackEntry};
use crate::catalogue::Catalogue;
use crate::cosmology::Cosmology;
use crate::error::{Error, Result};
use crate::evolution::{Evolution, Property, PropertyEvolution};
use crate::index::IdentityResolver;
use crate::store::ArrayStore;

/// Merger-tree columns needed to describe a track entry
struct TreeColumns {
    galaxy_ids: Rc<Array1<i64>>,
    node_indices: Rc<Array1<i64>>,
    snapshots: Rc<Array1<i64>>,
}

impl TreeColumns {
    fn load<S: ArrayStore>(catalogue: &Catalogue<S>) -> Result<Self> {
        let layout = catalogue.layout();
        Ok(Self {
            galaxy_ids: catalogue.int_column(&layout.galaxy_id)?,
            node_indices: catalogue.int_column(&layout.node_index)?,
            snapshots: catalogue.int_column(&layout.snap_num)?,
        })
    }

    fn entry(&self, row: usize) -> Result<TrackEntry> {
        let read = |column: &Array1<i64>, label: &str| {
            column.get(row).copied().ok_or_else(|| {
                Error::out_of_range(format!("row {} of a {}-row {} column", row, column.len(), label))
            })
        };

        Ok(TrackEntry {
            galaxy_id: read(&self.galaxy_ids, "GalaxyID")?,
            row,
            node_index: read(&self.node_indices, "NodeIndex")?,
            snapshot: read(&self.snapshots, "SnapNum")?,
        })
    }
}

/// A tracked subgroup and its evolutionary track
pub struct Subgroup<'a, S: ArrayStore> {
    catalogue: &'a Catalogue<S>,
    subgroup_number: usize,
    snap_number: i64,
    row: usize,
    galaxy_id: i64,
    node_index: i64,
    top_leaf_id: i64,
    last_progenitor_id: i64,
    main_progenitors: Track,
    main_merger_tree: Track,
    last_resolved_snapshot: Option<i64>,
    evolution: PropertyEvolution,
}

impl<'a, S: ArrayStore> Subgroup<'a, S> {
    /// Track a subgroup, using the cosmology described by the header
    pub fn new(catalogue: &'a Catalogue<S>, subgroup_number: usize, snap_number: i64) -> Result<Self> {
        let cosmology = catalogue.cosmology()?;
        Self::with_cosmology(catalogue, subgroup_number, snap_number, &cosmology)
    }

    /// Track a subgroup, converting redshift to age with `cosmology`
    pub fn with_cosmology<C: Cosmology + ?Sized>(
        catalogue: &'a Catalogue<S>,
        subgroup_number: usize,
        snap_number: i64,
        cosmology: &C,
    ) -> Result<Self> {
        let layout = catalogue.layout();
        let resolver = catalogue.resolver()?;
        let columns = TreeColumns::load(catalogue)?;

        let row = catalogue.subgroup_row(subgroup_number, snap_number)?;
        let galaxy_id = columns.entry(row)?.galaxy_id;
        let node_index = columns.node_indices[row];
        let top_leaf_id = read_row(catalogue, &layout.top_leaf_id, row)?;
        let last_progenitor_id = read_row(catalogue, &layout.last_prog_id, row)?;

        if last_progenitor_id < top_leaf_id {
            return Err(Error::integrity(format!(
                "LastProgID {} precedes TopLeafID {} of GalaxyID {}",
                last_progenitor_id, top_leaf_id, galaxy_id
            )));
        }

        let bound = catalogue.snapshot_count()?;
        let main_progenitors = main_branch(resolver, &columns, galaxy_id, top_leaf_id, bound)?;
        let descendants = descendant_chain(catalogue, resolver, &columns, row, bound)?;
        let main_merger_tree = Track::merge(descendants, &main_progenitors);
        let last_resolved_snapshot = main_merger_tree.last_resolved_snapshot();

        let evolution = time_axis(catalogue, &main_merger_tree, cosmology)?;

        tracing::debug!(
            galaxy_id,
            snap_number,
            subgroup_number,
            main_branch = main_progenitors.len(),
            track = main_merger_tree.len(),
            last_resolved_snapshot = ?last_resolved_snapshot,
            "built evolutionary track"
        );

        Ok(Self {
            catalogue,
            subgroup_number,
            snap_number,
            row,
            galaxy_id,
            node_index,
            top_leaf_id,
            last_progenitor_id,
            main_progenitors,
            main_merger_tree,
            last_resolved_snapshot,
            evolution,
        })
    }

    pub fn subgroup_number(&self) -> usize {
        self.subgroup_number
    }

    pub fn snap_number(&self) -> i64 {
        self.snap_number
    }

    /// Positional index of the subgroup in the catalogue columns
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn galaxy_id(&self) -> i64 {
        self.galaxy_id
    }

    pub fn node_index(&self) -> i64 {
        self.node_index
    }

    pub fn top_leaf_id(&self) -> i64 {
        self.top_leaf_id
    }

    pub fn last_progenitor_id(&self) -> i64 {
        self.last_progenitor_id
    }

    /// Main-progenitor branch only, from the subgroup back to its top leaf
    pub fn main_progenitors(&self) -> &Track {
        &self.main_progenitors
    }

    /// Descendant chain followed by the main-progenitor branch
    pub fn main_merger_tree(&self) -> &Track {
        &self.main_merger_tree
    }

    /// Snapshot right after the first contiguity break of the merged track
    ///
    /// `None` when the track never breaks.
    pub fn last_resolved_snapshot(&self) -> Option<i64> {
        self.last_resolved_snapshot
    }

    /// Position of the first contiguity break in the merged track
    pub fn break_index(&self) -> Option<usize> {
        self.main_merger_tree.first_break()
    }

    /// GalaxyIDs of every progenitor on any branch, the subgroup included
    pub fn progenitor_ids(&self) -> RangeInclusive<i64> {
        self.galaxy_id..=self.last_progenitor_id
    }

    /// Values of a property along the merged track, gathered once per name
    pub fn get_property_evolution(&mut self, property: impl Into<Property>) -> Result<&Evolution> {
        let property = property.into();
        let rows = self.main_merger_tree.rows();
        self.evolution.get_or_gather(self.catalogue, &rows, &property)
    }

    /// Names of every property gathered so far
    pub fn cached_properties(&self) -> Vec<String> {
        self.evolution.names()
    }
}

fn read_row<S: ArrayStore>(catalogue: &Catalogue<S>, name: &str, row: usize) -> Result<i64> {
    let column = catalogue.int_column(name)?;
    column
        .get(row)
        .copied()
        .ok_or_else(|| Error::out_of_range(format!("row {} of a {}-row {} column", row, column.len(), name)))
}

/// Resolve the contiguous GalaxyID run `[galaxy_id, top_leaf_id]`
///
/// A main branch holds at most one row per snapshot, so a run longer than
/// `bound` snapshots cannot be valid.
fn main_branch(
    resolver: &IdentityResolver,
    columns: &TreeColumns,
    galaxy_id: i64,
    top_leaf_id: i64,
    bound: usize,
) -> Result<Track> {
    if top_leaf_id < galaxy_id {
        return Err(Error::integrity(format!(
            "TopLeafID {} precedes GalaxyID {}",
            top_leaf_id, galaxy_id
        )));
    }

    let span = top_leaf_id.checked_sub(galaxy_id);
    if span.map_or(true, |span| span >= bound as i64) {
        return Err(Error::integrity(format!(
            "main branch [{}, {}] spans more than {} snapshots",
            galaxy_id, top_leaf_id, bound
        )));
    }

    let ids: Vec<i64> = (galaxy_id..=top_leaf_id).collect();
    let entries = resolver
        .galaxy_ids_to_rows(&ids)?
        .into_iter()
        .map(|row| columns.entry(row))
        .collect::<Result<Vec<_>>>()?;

    Ok(Track::new(entries))
}

/// Follow `DescendantID` links from `row`, nearest descendant first
///
/// A tree is cycle-free and has one object per snapshot along any chain, so
/// the walk must stop within `bound` steps and never revisit an identifier.
fn descendant_chain<S: ArrayStore>(
    catalogue: &Catalogue<S>,
    resolver: &IdentityResolver,
    columns: &TreeColumns,
    row: usize,
    bound: usize,
) -> Result<Vec<TrackEntry>> {
    let start = columns.entry(row)?.galaxy_id;
    let mut seen = HashSet::from([start]);
    let mut chain = Vec::new();
    let mut current = row;

    while let Some(descendant) = catalogue.descendant_of(current)? {
        if !seen.insert(descendant) {
            return Err(Error::integrity(format!(
                "descendant chain of GalaxyID {} revisits GalaxyID {}",
                start, descendant
            )));
        }
        if chain.len() >= bound {
            return Err(Error::integrity(format!(
                "descendant chain of GalaxyID {} exceeds {} snapshots",
                start, bound
            )));
        }

        let next = resolver.galaxy_id_to_row(descendant)?;
        tracing::trace!(from = columns.galaxy_ids[current], to = descendant, "followed descendant link");

        chain.push(columns.entry(next)?);
        current = next;
    }

    Ok(chain)
}

/// Scale factor, redshift and age at every snapshot of the track
fn time_axis<S: ArrayStore, C: Cosmology + ?Sized>(
    catalogue: &Catalogue<S>,
    track: &Track,
    cosmology: &C,
) -> Result<PropertyEvolution> {
    let scale_factors = catalogue.scale_factors()?;

    let a = track
        .iter()
        .map(|entry| {
            usize::try_from(entry.snapshot)
                .ok()
                .and_then(|snap| scale_factors.get(snap).copied())
                .ok_or_else(|| {
                    Error::out_of_range(format!(
                        "snapshot {} has no scale factor ({} snapshots)",
                        entry.snapshot,
                        scale_factors.len()
                    ))
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    let scale_factor = Array1::from(a);
    let redshift = scale_factor.mapv(|a| 1.0 / a - 1.0);
    let age = cosmology.age(&redshift);

    let mut evolution = PropertyEvolution::new();
    evolution.insert(&Property::ScaleFactor, Evolution::Float(scale_factor));
    evolution.insert(&Property::Redshift, Evolution::Float(redshift));
    evolution.insert(&Property::Age, Evolution::Float(age));
    Ok(evolution)
}
