//! Synthetic Module: Seeded Merger Forests
//!
//! Real catalogues are large and not redistributable, so demos and tests
//! run against generated forests that obey every structural rule of a
//! depth-first numbered merger tree.
//!
//! ## Growth Model
//!
//! Each root sits at the last snapshot with a log-normal mass. Walking back
//! one snapshot at a time, a halo gets
//!
//! - a main progenitor carrying 60–95% of its mass, unless the branch is lost
//! - with some probability, one secondary progenitor carrying 2–30%
//!
//! Progenitors below the resolution mass are dropped, which keeps trees
//! finite. Positions random-walk inside a periodic box and velocities decay
//! with random kicks.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  grow trees  →  number depth-first  →  group by snapshot    │
//! │                 (main branch first)     (most massive first) │
//! │                                              ↓               │
//! │                                    NodeIndex = snap·10¹²     │
//! │                                      + file·10⁸ + local      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod forest;

pub use config::ForestConfig;
pub use forest::{SyntheticForest, SyntheticRow};
