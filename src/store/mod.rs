//! Store Module: Read-Only Array Containers
//!
//! The catalogue never talks to a file format directly. It sees a backing
//! container through the [`ArrayStore`] capability, which hands out whole
//! named 1-D columns and scalar attribute groups:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ArrayStore Trait                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  + get(name)         - Whole column, or MissingGroup         │
//! │  + has(name)         - Existence check                       │
//! │  + attributes(group) - Scalar metadata (e.g. Header)         │
//! │  + names()           - Every column the container holds      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations ship with the crate:
//!
//! - **InMemoryStore**: columns held in process, built programmatically
//! - **JSON container**: the same layout serialized to a single file
//!
//! Columns are reference counted, so handing one out never copies the data.

mod column;
mod json;
mod memory;

use std::collections::BTreeMap;

use crate::error::Result;

pub use column::Column;
pub use json::{open_json, write_json};
pub use memory::InMemoryStore;

/// Read-only access to named columns and attribute groups
pub trait ArrayStore {
    /// Fetch a whole column by its group path
    ///
    /// Fails with `MissingGroup` when the container has no such column.
    fn get(&self, name: &str) -> Result<Column>;

    /// Does the container hold a column with this name?
    fn has(&self, name: &str) -> bool;

    /// Scalar attributes attached to a group
    fn attributes(&self, group: &str) -> Result<BTreeMap<String, f64>>;

    /// Names of every column, sorted
    fn names(&self) -> Vec<String>;
}
