//! Catalogue Module: Session Handle over a Subfind + Merger-Tree Dataset
//!
//! A [`Catalogue`] wraps a read-only [`ArrayStore`] for the lifetime of an
//! analysis session. It owns:
//!
//! - the column naming configuration ([`CatalogueLayout`])
//! - the `Header` attributes, read once at open
//! - a write-once cache of every column loaded so far
//! - the lazily built [`IdentityResolver`]
//!
//! ## Immutability
//!
//! Columns are never re-read once loaded and are handed out as shared,
//! immutable arrays. The resolver's sort permutation is computed from the
//! cached GalaxyID column, so it can never go stale. The interior caches are
//! single-threaded (`RefCell`, `unsync::OnceCell`), which makes a catalogue
//! `!Sync`: open one per thread if you need parallelism.

mod layout;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use ndarray::Array1;
use once_cell::unsync::OnceCell;

use crate::cosmology::FlatLambdaCdm;
use crate::error::{Error, Result};
use crate::index::IdentityResolver;
use crate::store::{ArrayStore, Column};
use crate::tree::Subgroup;

pub use layout::CatalogueLayout;

/// Raw `DescendantID` value meaning "no descendant"
pub const NO_DESCENDANT: i64 = -1;

/// Convert a raw `DescendantID` into an optional GalaxyID
///
/// `-1` is the only valid sentinel; any other negative value is a
/// data-integrity fault.
pub fn descendant_from_raw(raw: i64) -> Result<Option<i64>> {
    match raw {
        NO_DESCENDANT => Ok(None),
        id if id >= 0 => Ok(Some(id)),
        other => Err(Error::integrity(format!("undefined DescendantID value {}", other))),
    }
}

/// Read-only catalogue session
pub struct Catalogue<S: ArrayStore> {
    store: S,
    layout: CatalogueLayout,
    header: BTreeMap<String, f64>,
    columns: RefCell<HashMap<String, Column>>,
    resolver: OnceCell<IdentityResolver>,
}

impl<S: ArrayStore> Catalogue<S> {
    /// Open a catalogue with the default EAGLE layout
    pub fn open(store: S) -> Result<Self> {
        Self::with_layout(store, CatalogueLayout::default())
    }

    /// Open a catalogue with custom column names
    pub fn with_layout(store: S, layout: CatalogueLayout) -> Result<Self> {
        let header = store.attributes(&layout.header_group)?;
        tracing::debug!(attributes = header.len(), "opened catalogue");

        Ok(Self {
            store,
            layout,
            header,
            columns: RefCell::new(HashMap::new()),
            resolver: OnceCell::new(),
        })
    }

    pub fn layout(&self) -> &CatalogueLayout {
        &self.layout
    }

    /// Simulation metadata from the header group
    pub fn header(&self) -> &BTreeMap<String, f64> {
        &self.header
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Does the backing store hold this column?
    pub fn has(&self, name: &str) -> bool {
        self.columns.borrow().contains_key(name) || self.store.has(name)
    }

    /// Fetch a column, loading it from the store on first request
    pub fn get(&self, name: &str) -> Result<Column> {
        if let Some(column) = self.columns.borrow().get(name) {
            return Ok(column.clone());
        }

        let column = self.store.get(name)?;
        tracing::debug!(column = name, rows = column.len(), dtype = column.dtype(), "loaded column");
        self.columns
            .borrow_mut()
            .insert(name.to_string(), column.clone());
        Ok(column)
    }

    /// Fetch an integer column
    pub fn int_column(&self, name: &str) -> Result<Rc<Array1<i64>>> {
        let column = self.get(name)?;
        column.as_ints().cloned().ok_or_else(|| {
            Error::type_mismatch(format!("{} holds {} values, expected i64", name, column.dtype()))
        })
    }

    /// Fetch a column as floating point, widening integers
    pub fn float_column(&self, name: &str) -> Result<Rc<Array1<f64>>> {
        match self.get(name)? {
            Column::Float(values) => Ok(values),
            ints @ Column::Int(_) => Ok(Rc::new(ints.to_f64())),
        }
    }

    /// Number of catalogue rows across all snapshots
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.get(&self.layout.galaxy_id)?.len())
    }

    /// Identifier resolver, built on first use
    pub fn resolver(&self) -> Result<&IdentityResolver> {
        self.resolver.get_or_try_init(|| {
            let galaxy_ids = self.int_column(&self.layout.galaxy_id)?;
            let node_indices = self.int_column(&self.layout.node_index)?;
            IdentityResolver::new(galaxy_ids, node_indices)
        })
    }

    /// Scale factor of every snapshot, indexed by snapshot number
    pub fn scale_factors(&self) -> Result<Rc<Array1<f64>>> {
        self.float_column(&self.layout.scale_factor)
    }

    /// Number of snapshots in the simulation
    pub fn snapshot_count(&self) -> Result<usize> {
        Ok(self.scale_factors()?.len())
    }

    /// Number of the final snapshot
    ///
    /// Fails with `IndexOutOfRange` when the scale-factor array is empty.
    pub fn last_snapshot(&self) -> Result<i64> {
        match self.snapshot_count()? {
            0 => Err(Error::out_of_range(format!(
                "catalogue declares no snapshots ({} is empty)",
                self.layout.scale_factor
            ))),
            count => Ok(count as i64 - 1),
        }
    }

    /// Background cosmology described by the header
    pub fn cosmology(&self) -> Result<FlatLambdaCdm> {
        FlatLambdaCdm::from_attributes(
            &self.layout.header_group,
            &self.header,
            &self.layout.hubble_param_attr,
            &self.layout.omega_matter_attr,
        )
    }

    /// Descendant of the subgroup stored at `row`, if it has one
    pub fn descendant_of(&self, row: usize) -> Result<Option<i64>> {
        let descendants = self.int_column(&self.layout.descendant_id)?;
        let raw = descendants.get(row).copied().ok_or_else(|| {
            Error::out_of_range(format!("row {} of {} DescendantID rows", row, descendants.len()))
        })?;
        descendant_from_raw(raw)
    }

    /// Row of the `subgroup_number`-th subgroup stored at `snap_number`
    ///
    /// Subgroups are counted in storage order among rows whose `SnapNum`
    /// equals `snap_number`.
    pub fn subgroup_row(&self, subgroup_number: usize, snap_number: i64) -> Result<usize> {
        let snapshots = self.int_column(&self.layout.snap_num)?;
        let mut at_snapshot = snapshots
            .iter()
            .enumerate()
            .filter(|&(_, &snap)| snap == snap_number)
            .map(|(row, _)| row);

        if let Some(row) = at_snapshot.nth(subgroup_number) {
            return Ok(row);
        }

        let count = snapshots.iter().filter(|&&snap| snap == snap_number).count();
        Err(Error::out_of_range(format!(
            "subgroup {} requested at snapshot {}, which holds {}",
            subgroup_number, snap_number, count
        )))
    }

    /// Track one subgroup through the merger tree
    pub fn track_subgroup(&self, subgroup_number: usize, snap_number: i64) -> Result<Subgroup<'_, S>> {
        Subgroup::new(self, subgroup_number, snap_number)
    }
}
