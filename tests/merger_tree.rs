//! End-to-end tracking through the public API

use std::collections::HashSet;

use eagle_database::{
    open_json, search, write_json, Catalogue, Error, ForestConfig, InMemoryStore, NodeIndex, SyntheticForest,
};
use ndarray::aview1;

fn node(snapshot: i64, local: i64) -> i64 {
    NodeIndex::encode(snapshot, 0, local).unwrap().get()
}

fn header(store: InMemoryStore) -> InMemoryStore {
    store
        .with_attribute("Header", "HubbleParam", 0.6777)
        .with_attribute("Header", "Omega0", 0.307)
}

/// Three rows forming one unbroken main branch
fn single_branch() -> InMemoryStore {
    header(InMemoryStore::new())
        .with_ints("MergerTree/GalaxyID", vec![100, 101, 102])
        .with_ints("MergerTree/TopLeafID", vec![102, 102, 102])
        .with_ints("MergerTree/LastProgID", vec![102, 102, 102])
        .with_ints("MergerTree/DescendantID", vec![-1, -1, -1])
        .with_ints("MergerTree/nodeIndex", vec![node(2, 0), node(1, 0), node(0, 0)])
        .with_ints("Subhalo/SnapNum", vec![2, 1, 0])
        .with_floats("Subhalo/Mass", vec![3.0, 2.0, 1.0])
        .with_floats("Snapshots/ScaleFactor", vec![0.5, 0.75, 1.0])
}

fn synthetic() -> SyntheticForest {
    SyntheticForest::generate(ForestConfig {
        snapshots: 15,
        roots: 6,
        merger_probability: 0.3,
        seed: 11,
        ..ForestConfig::default()
    })
    .unwrap()
}

#[test]
fn test_unbroken_main_branch() {
    let catalogue = Catalogue::open(single_branch()).unwrap();
    let subgroup = catalogue.track_subgroup(0, 2).unwrap();

    assert_eq!(subgroup.main_progenitors().galaxy_ids(), vec![100, 101, 102]);
    assert_eq!(subgroup.main_merger_tree().galaxy_ids(), vec![100, 101, 102]);
    assert_eq!(subgroup.last_resolved_snapshot(), None);
    assert_eq!(subgroup.break_index(), None);
}

#[test]
fn test_single_entry_branch_with_descendant() {
    let store = header(InMemoryStore::new())
        .with_ints("MergerTree/GalaxyID", vec![205, 200])
        .with_ints("MergerTree/TopLeafID", vec![205, 200])
        .with_ints("MergerTree/LastProgID", vec![205, 200])
        .with_ints("MergerTree/DescendantID", vec![-1, 205])
        .with_ints("MergerTree/nodeIndex", vec![node(3, 0), node(2, 0)])
        .with_ints("Subhalo/SnapNum", vec![3, 2])
        .with_floats("Snapshots/ScaleFactor", vec![0.2, 0.4, 0.7, 1.0]);

    let catalogue = Catalogue::open(store).unwrap();
    let subgroup = catalogue.track_subgroup(0, 2).unwrap();

    assert_eq!(subgroup.main_progenitors().galaxy_ids(), vec![200]);
    // Descendants come first, then the main branch
    assert_eq!(subgroup.main_merger_tree().galaxy_ids(), vec![205, 200]);
    assert_eq!(subgroup.break_index(), Some(0));
    // Snapshot of the entry right after the break, GalaxyID 200
    assert_eq!(subgroup.last_resolved_snapshot(), Some(2));
}

#[test]
fn test_subgroup_beyond_snapshot_count() {
    let catalogue = Catalogue::open(single_branch()).unwrap();
    let result = catalogue.track_subgroup(1, 2);
    assert!(matches!(result, Err(Error::IndexOutOfRange(_))));
}

#[test]
fn test_corrupt_top_leaf_is_an_error() {
    let store = header(InMemoryStore::new())
        .with_ints("MergerTree/GalaxyID", vec![100, 101])
        .with_ints("MergerTree/TopLeafID", vec![i64::MAX / 2, 101])
        .with_ints("MergerTree/LastProgID", vec![i64::MAX / 2, 101])
        .with_ints("MergerTree/DescendantID", vec![-1, 100])
        .with_ints("MergerTree/nodeIndex", vec![node(1, 0), node(0, 0)])
        .with_ints("Subhalo/SnapNum", vec![1, 0])
        .with_floats("Snapshots/ScaleFactor", vec![0.5, 1.0]);

    let catalogue = Catalogue::open(store).unwrap();
    let result = catalogue.track_subgroup(0, 1);
    assert!(matches!(result, Err(Error::DataIntegrity(_))));
}

#[test]
fn test_node_index_round_trip() {
    let catalogue = Catalogue::open(synthetic().into_store()).unwrap();
    let resolver = catalogue.resolver().unwrap();

    for snapshot in resolver.snapshot_numbers() {
        for n in 0..resolver.subgroup_count(snapshot) {
            let node_index = resolver.subgroup_to_node_index(n, snapshot).unwrap();
            assert_eq!(resolver.node_index_to_subgroup(node_index).unwrap(), (n, snapshot));
        }
    }
}

#[test]
fn test_identity_translation_agrees_with_generator() {
    let forest = synthetic();
    let catalogue = Catalogue::open(forest.clone().into_store()).unwrap();
    let resolver = catalogue.resolver().unwrap();

    for row in forest.rows() {
        assert_eq!(resolver.galaxy_id_to_node_index(row.galaxy_id).unwrap(), row.node_index);
        assert_eq!(resolver.node_index_to_galaxy_id(row.node_index).unwrap(), row.galaxy_id);
        assert_eq!(
            resolver.node_index_to_subgroup(row.node_index).unwrap(),
            (row.subgroup_number, row.snapshot)
        );
    }
}

#[test]
fn test_search_exact_matches() {
    let forest = synthetic();
    let ids: Vec<i64> = forest.rows().iter().map(|r| r.galaxy_id).collect();
    let haystack = aview1(&ids);

    let max = *ids.iter().max().unwrap();
    let needles: Vec<i64> = (-3..max + 4).collect();
    let present: HashSet<i64> = ids.iter().copied().collect();

    let mut sorted = ids.clone();
    sorted.sort_unstable();
    let hits = search(aview1(&sorted), &needles, None);
    for (needle, hit) in needles.iter().zip(&hits) {
        match hit {
            Some(pos) => assert_eq!(sorted[*pos], *needle),
            None => assert!(!present.contains(needle)),
        }
    }

    let permutation = eagle_database::argsort(haystack);
    let hits = search(haystack, &needles, Some(permutation.as_slice()));
    for (needle, hit) in needles.iter().zip(&hits) {
        match hit {
            Some(pos) => assert_eq!(ids[*pos], *needle),
            None => assert!(!present.contains(needle)),
        }
    }
}

#[test]
fn test_every_track_is_well_formed() {
    let forest = synthetic();
    let snapshots = forest.config().snapshots;
    let catalogue = Catalogue::open(forest.clone().into_store()).unwrap();
    let mut breaks = 0;

    for row in forest.rows() {
        let subgroup = catalogue.track_subgroup(row.subgroup_number, row.snapshot).unwrap();
        assert_eq!(subgroup.galaxy_id(), row.galaxy_id);

        // Branch contiguity
        let branch = subgroup.main_progenitors().galaxy_ids();
        let expected: Vec<i64> = (row.galaxy_id..=row.top_leaf_id).collect();
        assert_eq!(branch, expected);
        assert_eq!(branch.len() as i64, row.top_leaf_id - row.galaxy_id + 1);

        // Termination: no repeats, bounded by the snapshot count
        let track = subgroup.main_merger_tree();
        let ids = track.galaxy_ids();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(track.len() <= snapshots);
        assert!(track.snapshots().windows(2).all(|w| w[0] == w[1] + 1));

        // Break detection
        let diffs: Vec<i64> = ids.windows(2).map(|w| w[1] - w[0]).collect();
        match subgroup.break_index() {
            Some(k) => {
                breaks += 1;
                assert!(diffs[..k].iter().all(|&d| d == 1));
                assert_ne!(diffs[k], 1);
                assert_eq!(subgroup.last_resolved_snapshot(), Some(track.entries()[k + 1].snapshot));
            }
            None => {
                assert!(diffs.iter().all(|&d| d == 1));
                assert_eq!(subgroup.last_resolved_snapshot(), None);
            }
        }
    }

    assert!(breaks > 0, "Expected at least one merged branch");
}

#[test]
fn test_properties_follow_track() {
    let forest = synthetic();
    let last = forest.config().snapshots as i64 - 1;
    let catalogue = Catalogue::open(forest.clone().into_store()).unwrap();
    let mut subgroup = catalogue.track_subgroup(0, last).unwrap();

    let ids = subgroup.main_merger_tree().galaxy_ids();
    let mass = subgroup.get_property_evolution("Mass").unwrap().to_f64().unwrap();
    for (id, m) in ids.iter().zip(mass.iter()) {
        let expected = forest.find(*id).unwrap().mass;
        assert!((m - expected).abs() < 1e-12);
    }

    let position = subgroup.get_property_evolution("position").unwrap().clone();
    let position = position.as_vectors().unwrap();
    assert_eq!(position.shape(), &[ids.len(), 3]);
    for (k, id) in ids.iter().enumerate() {
        let expected = forest.find(*id).unwrap().position;
        for axis in 0..3 {
            assert!((position[[k, axis]] - expected[axis]).abs() < 1e-12);
        }
    }

    let age = subgroup.get_property_evolution("age").unwrap().to_f64().unwrap();
    assert!((age[0] - 13.82).abs() < 0.01, "Expected ~13.82 Gyr today, got {}", age[0]);
    assert!(age.to_vec().windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_json_container_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.json");

    let forest = synthetic();
    let last = forest.config().snapshots as i64 - 1;
    let store = forest.into_store();
    write_json(&store, &path).unwrap();

    let in_memory = Catalogue::open(store).unwrap();
    let on_disk = Catalogue::open(open_json(&path).unwrap()).unwrap();

    for n in 0..3 {
        let a = in_memory.track_subgroup(n, last).unwrap();
        let b = on_disk.track_subgroup(n, last).unwrap();
        assert_eq!(a.main_merger_tree(), b.main_merger_tree());
        assert_eq!(a.last_resolved_snapshot(), b.last_resolved_snapshot());
    }
}

#[test]
fn test_missing_column_reports_group() {
    let store = header(InMemoryStore::new()).with_ints("Subhalo/SnapNum", vec![0]);
    let catalogue = Catalogue::open(store).unwrap();
    let result = catalogue.track_subgroup(0, 0);
    assert!(matches!(result, Err(Error::MissingGroup(ref name)) if name.starts_with("MergerTree/")));
}
