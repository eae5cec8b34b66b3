//! Typed catalogue columns

use std::rc::Rc;

use ndarray::Array1;

use crate::error::{Error, Result};

/// One flat column of the catalogue
///
/// Identifier columns are integers; physical properties are usually floats
/// but may be integers too (e.g. `SnapNum`). Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Rc<Array1<i64>>),
    Float(Rc<Array1<f64>>),
}

impl Column {
    pub fn from_ints(values: Vec<i64>) -> Self {
        Column::Int(Rc::new(Array1::from(values)))
    }

    pub fn from_floats(values: Vec<f64>) -> Self {
        Column::Float(Rc::new(Array1::from(values)))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            Column::Int(values) => values.len(),
            Column::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, for error messages
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Int(_) => "i64",
            Column::Float(_) => "f64",
        }
    }

    pub fn as_ints(&self) -> Option<&Rc<Array1<i64>>> {
        match self {
            Column::Int(values) => Some(values),
            Column::Float(_) => None,
        }
    }

    pub fn as_floats(&self) -> Option<&Rc<Array1<f64>>> {
        match self {
            Column::Float(values) => Some(values),
            Column::Int(_) => None,
        }
    }

    /// Widen to floating point
    pub fn to_f64(&self) -> Array1<f64> {
        match self {
            Column::Int(values) => values.mapv(|v| v as f64),
            Column::Float(values) => values.as_ref().clone(),
        }
    }

    /// Gather the values at `rows`, preserving their order
    ///
    /// Fails with `IndexOutOfRange` if any row lies past the end.
    pub fn gather(&self, rows: &[usize]) -> Result<Column> {
        match self {
            Column::Int(values) => Ok(Column::from_ints(gather(values, rows)?)),
            Column::Float(values) => Ok(Column::from_floats(gather(values, rows)?)),
        }
    }
}

fn gather<T: Copy>(values: &Array1<T>, rows: &[usize]) -> Result<Vec<T>> {
    rows.iter()
        .map(|&row| {
            values.get(row).copied().ok_or_else(|| {
                Error::out_of_range(format!("row {} of a {}-row column", row, values.len()))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_preserves_order() {
        let column = Column::from_ints(vec![10, 11, 12, 13]);
        let gathered = column.gather(&[3, 0, 2]).unwrap();
        assert_eq!(gathered, Column::from_ints(vec![13, 10, 12]));
    }

    #[test]
    fn test_gather_out_of_range() {
        let column = Column::from_floats(vec![1.0, 2.0]);
        let err = column.gather(&[0, 2]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange(_)));
    }

    #[test]
    fn test_widen_ints() {
        let column = Column::from_ints(vec![1, -2]);
        assert_eq!(column.to_f64().to_vec(), vec![1.0, -2.0]);
        assert_eq!(column.dtype(), "i64");
        assert!(column.as_floats().is_none());
    }
}
