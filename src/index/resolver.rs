//! Identity Resolver: Conversions Between Identifier Spaces
//!
//! A catalogue row can be named three ways:
//!
//! - **GalaxyID**: unique, assigned by depth-first traversal of the forest
//! - **NodeIndex**: `snapshot × 10¹² + file × 10⁸ + local_index`
//! - **(subgroup_number, snapshot)**: position among that snapshot's rows
//!
//! The resolver converts between them with exact-match searches. It keeps
//! three pieces of derived state, each built on first use and then kept for
//! the lifetime of the resolver:
//!
//! - ascending sort permutation of the GalaxyID column
//! - ascending sort permutation of the NodeIndex column
//! - per-snapshot NodeIndex groupings, keyed by `NodeIndex div 10¹²`
//!
//! The columns are immutable, so none of this state is ever rebuilt. The
//! lazy fields are single-writer cells (`unsync::OnceCell`), which keeps the
//! resolver `!Sync`.

use std::collections::BTreeMap;
use std::rc::Rc;

use ndarray::Array1;
use once_cell::unsync::OnceCell;

use super::node_index::NodeIndex;
use super::search::{argsort, search, search_one};
use crate::error::{Error, Result};

/// NodeIndex values of one snapshot, in stored order
#[derive(Debug)]
struct SnapshotGroup {
    node_indices: Array1<i64>,
    sorter: Vec<usize>,
}

/// Converts between GalaxyID, NodeIndex and (subgroup_number, snapshot)
#[derive(Debug)]
pub struct IdentityResolver {
    galaxy_ids: Rc<Array1<i64>>,
    node_indices: Rc<Array1<i64>>,
    galaxy_sorter: OnceCell<Vec<usize>>,
    node_sorter: OnceCell<Vec<usize>>,
    snapshots: OnceCell<BTreeMap<i64, SnapshotGroup>>,
}

impl IdentityResolver {
    /// Create a resolver over the parallel GalaxyID and NodeIndex columns
    pub fn new(galaxy_ids: Rc<Array1<i64>>, node_indices: Rc<Array1<i64>>) -> Result<Self> {
        if galaxy_ids.len() != node_indices.len() {
            return Err(Error::integrity(format!(
                "GalaxyID column has {} rows but NodeIndex column has {}",
                galaxy_ids.len(),
                node_indices.len()
            )));
        }

        Ok(Self {
            galaxy_ids,
            node_indices,
            galaxy_sorter: OnceCell::new(),
            node_sorter: OnceCell::new(),
            snapshots: OnceCell::new(),
        })
    }

    /// Number of catalogue rows
    pub fn len(&self) -> usize {
        self.galaxy_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galaxy_ids.is_empty()
    }

    fn galaxy_sorter(&self) -> Result<&[usize]> {
        self.galaxy_sorter
            .get_or_try_init(|| unique_sorter(&self.galaxy_ids, "GalaxyID"))
            .map(Vec::as_slice)
    }

    fn node_sorter(&self) -> Result<&[usize]> {
        self.node_sorter
            .get_or_try_init(|| unique_sorter(&self.node_indices, "NodeIndex"))
            .map(Vec::as_slice)
    }

    fn snapshots(&self) -> &BTreeMap<i64, SnapshotGroup> {
        self.snapshots.get_or_init(|| {
            let mut grouped: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
            for &raw in self.node_indices.iter() {
                grouped
                    .entry(NodeIndex(raw).snapshot())
                    .or_default()
                    .push(raw);
            }

            let groups: BTreeMap<i64, SnapshotGroup> = grouped
                .into_iter()
                .map(|(snapshot, values)| {
                    let node_indices = Array1::from(values);
                    let sorter = argsort(node_indices.view());
                    (snapshot, SnapshotGroup { node_indices, sorter })
                })
                .collect();

            tracing::debug!(snapshots = groups.len(), "built per-snapshot NodeIndex groupings");
            groups
        })
    }

    /// Positional index of a GalaxyID
    pub fn galaxy_id_to_row(&self, galaxy_id: i64) -> Result<usize> {
        let sorter = self.galaxy_sorter()?;
        search_one(self.galaxy_ids.view(), galaxy_id, Some(sorter))
            .ok_or_else(|| Error::not_found(format!("GalaxyID {}", galaxy_id)))
    }

    /// Positional indices of many GalaxyIDs, in the order given
    ///
    /// Fails on the first identifier that is absent.
    pub fn galaxy_ids_to_rows(&self, galaxy_ids: &[i64]) -> Result<Vec<usize>> {
        let sorter = self.galaxy_sorter()?;
        search(self.galaxy_ids.view(), galaxy_ids, Some(sorter))
            .into_iter()
            .zip(galaxy_ids)
            .map(|(row, &id)| row.ok_or_else(|| Error::not_found(format!("GalaxyID {}", id))))
            .collect()
    }

    pub fn galaxy_id_to_node_index(&self, galaxy_id: i64) -> Result<i64> {
        let row = self.galaxy_id_to_row(galaxy_id)?;
        Ok(self.node_indices[row])
    }

    /// Positional index of a NodeIndex
    pub fn node_index_to_row(&self, node_index: i64) -> Result<usize> {
        let sorter = self.node_sorter()?;
        search_one(self.node_indices.view(), node_index, Some(sorter))
            .ok_or_else(|| Error::not_found(format!("NodeIndex {}", node_index)))
    }

    pub fn node_index_to_galaxy_id(&self, node_index: i64) -> Result<i64> {
        let row = self.node_index_to_row(node_index)?;
        Ok(self.galaxy_ids[row])
    }

    /// Decode a NodeIndex into `(subgroup_number, snapshot)`
    pub fn node_index_to_subgroup(&self, node_index: i64) -> Result<(usize, i64)> {
        let snapshot = NodeIndex(node_index).snapshot();
        let group = self.snapshots().get(&snapshot).ok_or_else(|| {
            Error::not_found(format!(
                "NodeIndex {} (no rows at snapshot {})",
                node_index, snapshot
            ))
        })?;

        let position = search_one(group.node_indices.view(), node_index, Some(group.sorter.as_slice()))
            .ok_or_else(|| Error::not_found(format!("NodeIndex {}", node_index)))?;

        Ok((position, snapshot))
    }

    /// Array form of [`node_index_to_subgroup`](Self::node_index_to_subgroup)
    pub fn node_indices_to_subgroups(&self, node_indices: &[i64]) -> Result<Vec<(usize, i64)>> {
        node_indices
            .iter()
            .map(|&node_index| self.node_index_to_subgroup(node_index))
            .collect()
    }

    /// NodeIndex of the `subgroup_number`-th row at `snapshot`
    pub fn subgroup_to_node_index(&self, subgroup_number: usize, snapshot: i64) -> Result<i64> {
        let count = self.subgroup_count(snapshot);
        self.snapshots()
            .get(&snapshot)
            .and_then(|group| group.node_indices.get(subgroup_number))
            .copied()
            .ok_or_else(|| {
                Error::out_of_range(format!(
                    "subgroup {} requested at snapshot {}, which holds {}",
                    subgroup_number, snapshot, count
                ))
            })
    }

    /// Number of rows at a snapshot, zero if there are none
    pub fn subgroup_count(&self, snapshot: i64) -> usize {
        self.snapshots()
            .get(&snapshot)
            .map_or(0, |group| group.node_indices.len())
    }

    /// Snapshots that hold at least one row, ascending
    pub fn snapshot_numbers(&self) -> Vec<i64> {
        self.snapshots().keys().copied().collect()
    }
}

/// Sort permutation of an identifier column that must not repeat values
fn unique_sorter(values: &Array1<i64>, label: &str) -> Result<Vec<usize>> {
    let sorter = argsort(values.view());

    if let Some(pair) = sorter.windows(2).find(|w| values[w[0]] == values[w[1]]) {
        return Err(Error::integrity(format!(
            "{} {} appears at rows {} and {}",
            label, values[pair[0]], pair[0], pair[1]
        )));
    }

    tracing::debug!(rows = values.len(), column = label, "built identifier sort permutation");
    Ok(sorter)
}
