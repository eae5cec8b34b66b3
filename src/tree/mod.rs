//! Tree Module: Walking the Merger Tree
//!
//! ## Depth-First Numbering
//!
//! The merger-tree builder assigns GalaxyIDs by a depth-first walk that
//! always visits the main (most massive) progenitor first:
//!
//! ```text
//!   snap 28        0                    GalaxyID  0
//!                /   \                  TopLeafID 3, LastProgID 5
//!   snap 27     1     4
//!               |     |
//!   snap 26     2     5
//!               |
//!   snap 25     3
//! ```
//!
//! Two consequences make tracking cheap:
//!
//! - the main-progenitor branch of `g` is exactly `[g, TopLeafID(g)]`
//! - every progenitor on any branch lies in `[g, LastProgID(g)]`
//!
//! Descendants are the other direction and need a pointer walk through
//! `DescendantID` until the tree root is reached.
//!
//! ## Breaks
//!
//! Along a merged track (descendants reversed, then the main branch) the
//! first place where consecutive GalaxyIDs do not differ by one marks the
//! snapshot where the object stopped being the main progenitor of what
//! came next: it merged into a more massive neighbour.

mod subgroup;
mod track;

pub use subgroup::Subgroup;
pub use track::{Track, TrackEntry};
