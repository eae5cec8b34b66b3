//! Random merger forests with depth-first numbering

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal};

use super::config::ForestConfig;
use crate::catalogue::{CatalogueLayout, NO_DESCENDANT};
use crate::error::{Error, Result};
use crate::evolution::AXES;
use crate::index::NodeIndex;
use crate::store::{Column, InMemoryStore};

/// One subgroup of the generated catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow {
    pub galaxy_id: i64,
    pub top_leaf_id: i64,
    pub last_prog_id: i64,
    /// `-1` at a tree root
    pub descendant_id: i64,
    pub node_index: i64,
    pub snapshot: i64,
    /// Position among the subgroups stored at `snapshot`
    pub subgroup_number: usize,
    /// Mass (10¹⁰ M☉)
    pub mass: f64,
    /// Position (cMpc)
    pub position: [f64; 3],
    /// Peculiar velocity (km/s)
    pub velocity: [f64; 3],
}

/// Halo in the generated tree, main progenitor first
struct Halo {
    snapshot: i64,
    mass: f64,
    position: [f64; 3],
    velocity: [f64; 3],
    progenitors: Vec<Halo>,
}

/// Random draws used while growing trees
struct Sampler {
    rng: StdRng,
    displacement: Normal<f64>,
    kick: Normal<f64>,
}

impl Sampler {
    fn new(config: &ForestConfig) -> Result<Self> {
        let invalid = |e: rand_distr::NormalError| Error::invalid_config(e.to_string());
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            displacement: Normal::new(0.0, 0.02 * config.box_size).map_err(invalid)?,
            kick: Normal::new(0.0, 50.0).map_err(invalid)?,
        })
    }

    fn progenitor_of(&mut self, halo: &Halo, mass: f64, box_size: f64) -> Halo {
        let mut position = halo.position;
        let mut velocity = halo.velocity;
        for axis in 0..3 {
            position[axis] = (position[axis] + self.displacement.sample(&mut self.rng)).rem_euclid(box_size);
            velocity[axis] = 0.9 * velocity[axis] + self.kick.sample(&mut self.rng);
        }
        Halo {
            snapshot: halo.snapshot - 1,
            mass,
            position,
            velocity,
            progenitors: Vec::new(),
        }
    }

    /// Grow the progenitor tree of `halo` back to snapshot 0
    fn grow(&mut self, halo: &mut Halo, config: &ForestConfig) {
        if halo.snapshot == 0 {
            return;
        }

        if !self.rng.random_bool(config.loss_probability) {
            let mass = halo.mass * self.rng.random_range(0.6..0.95);
            if mass >= config.min_mass {
                let main = self.progenitor_of(halo, mass, config.box_size);
                halo.progenitors.push(main);
            }
        }
        if self.rng.random_bool(config.merger_probability) {
            let mass = halo.mass * self.rng.random_range(0.02..0.3);
            if mass >= config.min_mass {
                let secondary = self.progenitor_of(halo, mass, config.box_size);
                halo.progenitors.push(secondary);
            }
        }

        for progenitor in &mut halo.progenitors {
            self.grow(progenitor, config);
        }
    }
}

/// Number a tree depth-first, main progenitor first
///
/// Returns `(TopLeafID, LastProgID)` of `halo`.
fn number(halo: &Halo, descendant_id: i64, next_id: &mut i64, rows: &mut Vec<SyntheticRow>) -> (i64, i64) {
    let galaxy_id = *next_id;
    *next_id += 1;

    let slot = rows.len();
    rows.push(SyntheticRow {
        galaxy_id,
        top_leaf_id: galaxy_id,
        last_prog_id: galaxy_id,
        descendant_id,
        node_index: 0,
        snapshot: halo.snapshot,
        subgroup_number: 0,
        mass: halo.mass,
        position: halo.position,
        velocity: halo.velocity,
    });

    let mut top_leaf_id = galaxy_id;
    let mut last_prog_id = galaxy_id;
    for (i, progenitor) in halo.progenitors.iter().enumerate() {
        let (top, last) = number(progenitor, galaxy_id, next_id, rows);
        if i == 0 {
            top_leaf_id = top;
        }
        last_prog_id = last_prog_id.max(last);
    }

    rows[slot].top_leaf_id = top_leaf_id;
    rows[slot].last_prog_id = last_prog_id;
    (top_leaf_id, last_prog_id)
}

/// A generated catalogue, rows grouped by snapshot
#[derive(Debug, Clone)]
pub struct SyntheticForest {
    config: ForestConfig,
    rows: Vec<SyntheticRow>,
    scale_factors: Vec<f64>,
}

impl SyntheticForest {
    /// Generate a forest; the same config always yields the same forest
    pub fn generate(config: ForestConfig) -> Result<Self> {
        config.validate()?;

        let mut sampler = Sampler::new(&config)?;
        let root_mass = LogNormal::new(10f64.ln(), 1.0).map_err(|e| Error::invalid_config(e.to_string()))?;
        let last_snapshot = config.snapshots as i64 - 1;

        let mut rows = Vec::new();
        let mut next_id = 0;
        for _ in 0..config.roots {
            let position = [0; 3].map(|_| sampler.rng.random_range(0.0..config.box_size));
            let velocity = [0; 3].map(|_| sampler.kick.sample(&mut sampler.rng));
            let mut root = Halo {
                snapshot: last_snapshot,
                mass: root_mass.sample(&mut sampler.rng).max(config.min_mass),
                position,
                velocity,
                progenitors: Vec::new(),
            };
            sampler.grow(&mut root, &config);
            number(&root, NO_DESCENDANT, &mut next_id, &mut rows);
        }

        // Subfind stores each snapshot's subgroups together, most massive first
        rows.sort_by(|a, b| a.snapshot.cmp(&b.snapshot).then(b.mass.total_cmp(&a.mass)));

        let mut position = 0;
        for i in 0..rows.len() {
            if i > 0 && rows[i].snapshot != rows[i - 1].snapshot {
                position = 0;
            }
            let file = (position / config.subgroups_per_file) as i64;
            let local = (position % config.subgroups_per_file) as i64;
            rows[i].node_index = NodeIndex::encode(rows[i].snapshot, file, local)?.get();
            rows[i].subgroup_number = position;
            position += 1;
        }

        tracing::debug!(roots = config.roots, rows = rows.len(), seed = config.seed, "generated synthetic forest");

        let scale_factors = config.scale_factors();
        Ok(Self {
            config,
            rows,
            scale_factors,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn rows(&self) -> &[SyntheticRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn scale_factors(&self) -> &[f64] {
        &self.scale_factors
    }

    /// Row holding `galaxy_id`
    pub fn find(&self, galaxy_id: i64) -> Option<&SyntheticRow> {
        self.rows.iter().find(|row| row.galaxy_id == galaxy_id)
    }

    /// Number of subgroups stored at `snapshot`
    pub fn subgroup_count(&self, snapshot: i64) -> usize {
        self.rows.iter().filter(|row| row.snapshot == snapshot).count()
    }

    /// Lay the forest out as catalogue columns under `layout`
    pub fn to_store_with_layout(&self, layout: &CatalogueLayout) -> InMemoryStore {
        let ints = |f: fn(&SyntheticRow) -> i64| Column::Int(Array1::from_iter(self.rows.iter().map(f)).into());
        let floats = |f: &dyn Fn(&SyntheticRow) -> f64| Column::Float(Array1::from_iter(self.rows.iter().map(f)).into());

        let mut store = InMemoryStore::new();
        store.insert(layout.galaxy_id.clone(), ints(|r| r.galaxy_id));
        store.insert(layout.top_leaf_id.clone(), ints(|r| r.top_leaf_id));
        store.insert(layout.last_prog_id.clone(), ints(|r| r.last_prog_id));
        store.insert(layout.descendant_id.clone(), ints(|r| r.descendant_id));
        store.insert(layout.node_index.clone(), ints(|r| r.node_index));
        store.insert(layout.snap_num.clone(), ints(|r| r.snapshot));
        store.insert(layout.property_column("Mass"), floats(&|r: &SyntheticRow| r.mass));

        for (axis, suffix) in AXES.iter().enumerate() {
            let position = format!("{}_{}", layout.position_stem, suffix);
            let velocity = format!("{}_{}", layout.velocity_stem, suffix);
            store.insert(layout.property_column(&position), floats(&|r: &SyntheticRow| r.position[axis]));
            store.insert(layout.property_column(&velocity), floats(&|r: &SyntheticRow| r.velocity[axis]));
        }

        store.insert(layout.scale_factor.clone(), Column::from_floats(self.scale_factors.clone()));
        store.set_attribute(&layout.header_group, &layout.hubble_param_attr, self.config.hubble_param);
        store.set_attribute(&layout.header_group, &layout.omega_matter_attr, self.config.omega_matter);
        store.set_attribute(&layout.header_group, "NumSnapshots", self.config.snapshots as f64);
        store
    }

    /// Convert into a store with the default EAGLE column names
    pub fn into_store(self) -> InMemoryStore {
        self.to_store_with_layout(&CatalogueLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ForestConfig {
        ForestConfig {
            snapshots: 12,
            roots: 4,
            seed: 7,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_forest() {
        let a = SyntheticForest::generate(small()).unwrap();
        let b = SyntheticForest::generate(small()).unwrap();
        assert_eq!(a.rows(), b.rows());

        let c = SyntheticForest::generate(ForestConfig { seed: 8, ..small() }).unwrap();
        assert_ne!(a.rows(), c.rows());
    }

    #[test]
    fn test_depth_first_ranges() {
        let forest = SyntheticForest::generate(small()).unwrap();
        assert_eq!(forest.subgroup_count(11), 4);

        for row in forest.rows() {
            assert!(row.top_leaf_id >= row.galaxy_id);
            assert!(row.last_prog_id >= row.top_leaf_id);

            if row.descendant_id != NO_DESCENDANT {
                let descendant = forest.find(row.descendant_id).unwrap();
                assert_eq!(descendant.snapshot, row.snapshot + 1);
                assert!(descendant.galaxy_id < row.galaxy_id);
                assert!(descendant.last_prog_id >= row.last_prog_id);
            }
        }
    }

    #[test]
    fn test_main_branch_is_contiguous() {
        let forest = SyntheticForest::generate(small()).unwrap();
        for row in forest.rows().iter().filter(|r| r.descendant_id == NO_DESCENDANT) {
            let mut expected_snapshot = row.snapshot;
            for id in row.galaxy_id..=row.top_leaf_id {
                let member = forest.find(id).unwrap();
                assert_eq!(member.snapshot, expected_snapshot);
                expected_snapshot -= 1;
            }
        }
    }

    #[test]
    fn test_rows_grouped_by_snapshot() {
        let forest = SyntheticForest::generate(small()).unwrap();
        let rows = forest.rows();
        assert!(rows.windows(2).all(|w| w[0].snapshot <= w[1].snapshot));

        for row in rows {
            let node = NodeIndex::from(row.node_index);
            assert_eq!(node.snapshot(), row.snapshot);
            let position = node.file_number() as usize * forest.config().subgroups_per_file
                + node.local_index() as usize;
            assert_eq!(position, row.subgroup_number);
        }
    }

    #[test]
    fn test_store_columns() {
        let forest = SyntheticForest::generate(small()).unwrap();
        let rows = forest.len();
        let store = forest.into_store();

        use crate::store::ArrayStore;
        for name in [
            "MergerTree/GalaxyID",
            "MergerTree/DescendantID",
            "Subhalo/SnapNum",
            "Subhalo/Mass",
            "Subhalo/CentreOfPotential_z",
            "Subhalo/Velocity_x",
        ] {
            assert_eq!(store.get(name).unwrap().len(), rows, "column {}", name);
        }
        assert_eq!(store.get("Snapshots/ScaleFactor").unwrap().len(), 12);
        let header = store.attributes("Header").unwrap();
        assert!((header["Omega0"] - 0.307).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SyntheticForest::generate(ForestConfig { roots: 0, ..small() });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
