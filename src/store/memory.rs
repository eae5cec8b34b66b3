//! In-process array store

use std::collections::{BTreeMap, HashMap};

use super::{ArrayStore, Column};
use crate::error::{Error, Result};

/// Columns and attribute groups held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    arrays: HashMap<String, Column>,
    attributes: HashMap<String, BTreeMap<String, f64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a column
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        self.arrays.insert(name.into(), column);
    }

    /// Set one scalar attribute on a group, creating the group if needed
    pub fn set_attribute(&mut self, group: impl Into<String>, key: impl Into<String>, value: f64) {
        self.attributes
            .entry(group.into())
            .or_default()
            .insert(key.into(), value);
    }

    pub fn with_ints(mut self, name: impl Into<String>, values: Vec<i64>) -> Self {
        self.insert(name, Column::from_ints(values));
        self
    }

    pub fn with_floats(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name, Column::from_floats(values));
        self
    }

    pub fn with_attribute(
        mut self,
        group: impl Into<String>,
        key: impl Into<String>,
        value: f64,
    ) -> Self {
        self.set_attribute(group, key, value);
        self
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Every attribute group, for serialization
    pub(crate) fn attribute_groups(&self) -> &HashMap<String, BTreeMap<String, f64>> {
        &self.attributes
    }

    /// Every column, for serialization
    pub(crate) fn columns(&self) -> &HashMap<String, Column> {
        &self.arrays
    }
}

impl ArrayStore for InMemoryStore {
    fn get(&self, name: &str) -> Result<Column> {
        self.arrays
            .get(name)
            .cloned()
            .ok_or_else(|| Error::missing_group(name))
    }

    fn has(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    fn attributes(&self, group: &str) -> Result<BTreeMap<String, f64>> {
        self.attributes
            .get(group)
            .cloned()
            .ok_or_else(|| Error::missing_group(group))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.arrays.keys().cloned().collect();
        names.sort();
        names
    }
}
