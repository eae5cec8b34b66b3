//! Property registry

use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::store::Column;

/// Component suffixes of a vector property, in column order
pub const AXES: [&str; 3] = ["x", "y", "z"];

/// A quantity that can be followed along a track
///
/// Time-axis properties are filled in when the track is built; vector
/// properties are split across three `<stem>_x/_y/_z` columns; everything
/// else is one named column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    ScaleFactor,
    Redshift,
    /// Age of the universe, in Gyr
    Age,
    Position,
    Velocity,
    Named(String),
}

impl Property {
    /// Memoization key, also the name users request it by
    pub fn name(&self) -> &str {
        match self {
            Property::ScaleFactor => "scale_factor",
            Property::Redshift => "redshift",
            Property::Age => "age",
            Property::Position => "position",
            Property::Velocity => "velocity",
            Property::Named(name) => name,
        }
    }

    pub fn is_time_axis(&self) -> bool {
        matches!(self, Property::ScaleFactor | Property::Redshift | Property::Age)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Property::Position | Property::Velocity)
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        match name {
            "scale_factor" => Property::ScaleFactor,
            "redshift" => Property::Redshift,
            "age" => Property::Age,
            "position" => Property::Position,
            "velocity" => Property::Velocity,
            other => Property::Named(other.to_string()),
        }
    }
}

impl From<String> for Property {
    fn from(name: String) -> Self {
        Property::from(name.as_str())
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of one property along a track, in track order
#[derive(Debug, Clone, PartialEq)]
pub enum Evolution {
    Int(Array1<i64>),
    Float(Array1<f64>),
    /// One row per track entry, columns x, y, z
    Vector(Array2<f64>),
}

impl Evolution {
    /// Number of track entries covered
    pub fn len(&self) -> usize {
        match self {
            Evolution::Int(values) => values.len(),
            Evolution::Float(values) => values.len(),
            Evolution::Vector(values) => values.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_ints(&self) -> Option<&Array1<i64>> {
        match self {
            Evolution::Int(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&Array1<f64>> {
        match self {
            Evolution::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_vectors(&self) -> Option<&Array2<f64>> {
        match self {
            Evolution::Vector(values) => Some(values),
            _ => None,
        }
    }

    /// Scalar values as floating point
    ///
    /// Fails with `TypeMismatch` for vector properties.
    pub fn to_f64(&self) -> Result<Array1<f64>> {
        match self {
            Evolution::Int(values) => Ok(values.mapv(|v| v as f64)),
            Evolution::Float(values) => Ok(values.clone()),
            Evolution::Vector(_) => Err(Error::type_mismatch("vector property has no scalar form")),
        }
    }
}

impl From<Column> for Evolution {
    fn from(column: Column) -> Self {
        match column {
            Column::Int(values) => {
                Evolution::Int(std::rc::Rc::try_unwrap(values).unwrap_or_else(|rc| (*rc).clone()))
            }
            Column::Float(values) => {
                Evolution::Float(std::rc::Rc::try_unwrap(values).unwrap_or_else(|rc| (*rc).clone()))
            }
        }
    }
}
