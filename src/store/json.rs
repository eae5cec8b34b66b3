//! JSON container format
//!
//! A whole catalogue serialized as one document:
//!
//! ```text
//! {
//!   "attributes": { "Header": { "HubbleParam": 0.6777, ... } },
//!   "arrays":     { "MergerTree/GalaxyID": [0, 1, 2, ...], ... }
//! }
//! ```
//!
//! Arrays holding only integers load as `i64` columns, anything else as `f64`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Column, InMemoryStore};
use crate::error::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Container {
    #[serde(default)]
    attributes: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    arrays: BTreeMap<String, RawColumn>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

/// Load a JSON container into memory
pub fn open_json(path: impl AsRef<Path>) -> Result<InMemoryStore> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let container: Container = serde_json::from_reader(reader)?;

    let mut store = InMemoryStore::new();
    for (group, attrs) in container.attributes {
        for (key, value) in attrs {
            store.set_attribute(group.clone(), key, value);
        }
    }
    for (name, raw) in container.arrays {
        let column = match raw {
            RawColumn::Int(values) => Column::from_ints(values),
            RawColumn::Float(values) => Column::from_floats(values),
        };
        store.insert(name, column);
    }

    tracing::debug!(
        path = %path.display(),
        columns = store.len(),
        "opened JSON catalogue container"
    );
    Ok(store)
}

/// Write an in-memory store as a JSON container
pub fn write_json(store: &InMemoryStore, path: impl AsRef<Path>) -> Result<()> {
    let container = Container {
        attributes: store
            .attribute_groups()
            .iter()
            .map(|(group, attrs)| (group.clone(), attrs.clone()))
            .collect(),
        arrays: store
            .columns()
            .iter()
            .map(|(name, column)| {
                let raw = match column {
                    Column::Int(values) => RawColumn::Int(values.to_vec()),
                    Column::Float(values) => RawColumn::Float(values.to_vec()),
                };
                (name.clone(), raw)
            })
            .collect(),
    };

    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer(&mut writer, &container)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::ArrayStore;

    #[test]
    fn test_integer_and_float_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.json");
        std::fs::write(
            &path,
            r#"{
                "attributes": {"Header": {"HubbleParam": 0.6777}},
                "arrays": {
                    "MergerTree/GalaxyID": [5, 6, 7],
                    "Subhalo/Mass": [1, 2.5, 3]
                }
            }"#,
        )
        .unwrap();

        let store = open_json(&path).unwrap();
        assert_eq!(store.get("MergerTree/GalaxyID").unwrap().dtype(), "i64");
        assert_eq!(store.get("Subhalo/Mass").unwrap().dtype(), "f64");
        assert_eq!(store.attributes("Header").unwrap().len(), 1);
    }

    #[test]
    fn test_write_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let store = InMemoryStore::new()
            .with_ints("MergerTree/GalaxyID", vec![1, 2])
            .with_floats("Snapshots/ScaleFactor", vec![0.5, 1.0])
            .with_attribute("Header", "Omega0", 0.307);
        write_json(&store, &path).unwrap();

        let reopened = open_json(&path).unwrap();
        assert_eq!(reopened.names(), store.names());
        assert_eq!(
            reopened.get("Snapshots/ScaleFactor").unwrap(),
            Column::from_floats(vec![0.5, 1.0])
        );
    }

    #[test]
    fn test_missing_file() {
        let err = open_json("/nonexistent/catalogue.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
