//! Memoized property gathering

use std::collections::HashMap;

use ndarray::Array2;

use super::property::{Evolution, Property, AXES};
use crate::catalogue::Catalogue;
use crate::error::{Error, Result};
use crate::store::ArrayStore;

/// Property values already gathered along one track, keyed by name
#[derive(Debug, Clone, Default)]
pub struct PropertyEvolution {
    entries: HashMap<String, Evolution>,
}

impl PropertyEvolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a precomputed evolution, replacing any previous value
    pub fn insert(&mut self, property: &Property, values: Evolution) {
        self.entries.insert(property.name().to_string(), values);
    }

    pub fn get(&self, property: &Property) -> Option<&Evolution> {
        self.entries.get(property.name())
    }

    pub fn contains(&self, property: &Property) -> bool {
        self.entries.contains_key(property.name())
    }

    /// Names of every memoized property, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a property along `rows`, gathering it on first request
    ///
    /// A failure leaves the cache exactly as it was.
    pub fn get_or_gather<S: ArrayStore>(
        &mut self,
        catalogue: &Catalogue<S>,
        rows: &[usize],
        property: &Property,
    ) -> Result<&Evolution> {
        if !self.entries.contains_key(property.name()) {
            let values = self.gather(catalogue, rows, property)?;
            self.entries.insert(property.name().to_string(), values);
        }
        Ok(&self.entries[property.name()])
    }

    fn gather<S: ArrayStore>(
        &mut self,
        catalogue: &Catalogue<S>,
        rows: &[usize],
        property: &Property,
    ) -> Result<Evolution> {
        let layout = catalogue.layout();

        match property {
            Property::Named(name) => {
                let column = catalogue.get(&layout.property_column(name))?;
                Ok(Evolution::from(column.gather(rows)?))
            }
            Property::Position | Property::Velocity => {
                let stem = if *property == Property::Position {
                    layout.position_stem.clone()
                } else {
                    layout.velocity_stem.clone()
                };

                // Components go through the cache too, under their own names
                let mut components = Vec::with_capacity(AXES.len());
                for axis in AXES {
                    let component = Property::Named(format!("{}_{}", stem, axis));
                    components.push(self.get_or_gather(catalogue, rows, &component)?.to_f64()?);
                }

                let vectors =
                    Array2::from_shape_fn((rows.len(), AXES.len()), |(i, j)| components[j][i]);
                Ok(Evolution::Vector(vectors))
            }
            Property::ScaleFactor | Property::Redshift | Property::Age => {
                // Filled in when the track is built; reaching here means it was not
                Err(Error::missing_group(format!("time axis '{}' was not computed", property)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn catalogue() -> Catalogue<InMemoryStore> {
        let store = InMemoryStore::new()
            .with_attribute("Header", "HubbleParam", 0.7)
            .with_floats("Subhalo/Mass", vec![1.0, 2.0, 3.0, 4.0])
            .with_ints("Subhalo/SnapNum", vec![3, 2, 1, 0])
            .with_floats("Subhalo/Velocity_x", vec![1.0, 2.0, 3.0, 4.0])
            .with_floats("Subhalo/Velocity_y", vec![5.0, 6.0, 7.0, 8.0])
            .with_floats("Subhalo/Velocity_z", vec![9.0, 10.0, 11.0, 12.0]);
        Catalogue::open(store).unwrap()
    }

    #[test]
    fn test_named_gather_in_track_order() {
        let catalogue = catalogue();
        let mut cache = PropertyEvolution::new();

        let mass = cache
            .get_or_gather(&catalogue, &[2, 0, 3], &Property::from("Mass"))
            .unwrap();
        assert_eq!(mass.as_floats().unwrap().to_vec(), vec![3.0, 1.0, 4.0]);

        let snaps = cache
            .get_or_gather(&catalogue, &[2, 0, 3], &Property::from("SnapNum"))
            .unwrap();
        assert_eq!(snaps.as_ints().unwrap().to_vec(), vec![1, 3, 0]);
    }

    #[test]
    fn test_memoized_value_is_not_regathered() {
        let catalogue = catalogue();
        let mut cache = PropertyEvolution::new();
        let mass = Property::from("Mass");

        cache.get_or_gather(&catalogue, &[0, 1], &mass).unwrap();
        // Different rows on the second call: the stored value must win
        let again = cache.get_or_gather(&catalogue, &[3], &mass).unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_vector_stacks_components() {
        let catalogue = catalogue();
        let mut cache = PropertyEvolution::new();

        let velocity = cache
            .get_or_gather(&catalogue, &[1, 3], &Property::Velocity)
            .unwrap()
            .clone();
        let values = velocity.as_vectors().unwrap();
        assert_eq!(values.shape(), &[2, 3]);
        assert_eq!(values.row(0).to_vec(), vec![2.0, 6.0, 10.0]);
        assert_eq!(values.row(1).to_vec(), vec![4.0, 8.0, 12.0]);

        // Components were memoized on the way
        assert_eq!(
            cache.names(),
            vec!["Velocity_x", "Velocity_y", "Velocity_z", "velocity"]
        );
    }

    #[test]
    fn test_failure_keeps_existing_entries() {
        let catalogue = catalogue();
        let mut cache = PropertyEvolution::new();

        cache.get_or_gather(&catalogue, &[0], &Property::from("Mass")).unwrap();
        let err = cache
            .get_or_gather(&catalogue, &[0], &Property::from("Spin"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingGroup(ref name) if name == "Subhalo/Spin"));

        // Position components are absent: nothing partial is left behind
        assert!(cache.get_or_gather(&catalogue, &[0], &Property::Position).is_err());
        assert_eq!(cache.names(), vec!["Mass"]);
    }

    #[test]
    fn test_out_of_range_row() {
        let catalogue = catalogue();
        let mut cache = PropertyEvolution::new();
        let err = cache
            .get_or_gather(&catalogue, &[0, 9], &Property::from("Mass"))
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange(_)));
        assert!(cache.is_empty());
    }
}
