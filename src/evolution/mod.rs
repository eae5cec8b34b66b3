//! Evolution Module: Properties Followed Along a Track
//!
//! Once a subgroup's track is known, any per-row quantity of the catalogue
//! can be read off along it. Three kinds of property are distinguished:
//!
//! - **Time axis**: scale factor, redshift and cosmic age, computed eagerly
//!   when the track is built since every analysis needs them
//! - **Vector**: position and velocity, stored as three `<stem>_x/_y/_z`
//!   columns and reassembled into an `n × 3` array
//! - **Named**: any other column, read as `<prefix><name>`
//!
//! All three share one memoization map keyed by property name, so a
//! property is gathered at most once per track.

mod cache;
mod property;

pub use cache::PropertyEvolution;
pub use property::{Evolution, Property, AXES};
