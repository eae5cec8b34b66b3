//! Index Module: Identifier Search and Resolution
//!
//! The merger tree is stored as flat parallel columns, so every traversal
//! step is an identifier lookup. This module provides:
//!
//! - `search.rs`: exact-match binary search over sorted (or permutation
//!   sorted) identifier arrays, the primitive everything else calls
//! - `node_index.rs`: the NodeIndex encoding
//!   (`snapshot × 10¹² + file × 10⁸ + local_index`)
//! - `resolver.rs`: conversions between GalaxyID, NodeIndex and
//!   `(subgroup_number, snapshot)`, with lazily built sort permutations

mod node_index;
mod resolver;
mod search;

pub use node_index::{NodeIndex, FILE_STRIDE, SNAPSHOT_STRIDE};
pub use resolver::IdentityResolver;
pub use search::{argsort, search, search_matched, search_one};
