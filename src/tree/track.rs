//! Evolutionary Tracks
//!
//! A track is an ordered run of catalogue rows describing one object. In a
//! depth-first numbered forest an unbroken main branch is a run of
//! consecutive GalaxyIDs, so the first place where neighbouring IDs differ by
//! anything other than one is where the object stops being resolved on its
//! own branch (it was lost, or merged into something else).

/// One row of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEntry {
    /// Depth-first identifier
    pub galaxy_id: i64,
    /// Positional index into the catalogue columns
    pub row: usize,
    /// Encoded snapshot / file / local position
    pub node_index: i64,
    /// Snapshot number (`SnapNum`)
    pub snapshot: i64,
}

/// Ordered sequence of track entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    entries: Vec<TrackEntry>,
}

impl Track {
    pub fn new(entries: Vec<TrackEntry>) -> Self {
        Self { entries }
    }

    /// Merge a descendant chain with a main-progenitor branch
    ///
    /// `descendants` is in walk order (nearest descendant first). It is
    /// reversed and placed ahead of the branch. Either side may be empty.
    pub fn merge(mut descendants: Vec<TrackEntry>, main_branch: &Track) -> Self {
        descendants.reverse();
        descendants.extend_from_slice(&main_branch.entries);
        Self { entries: descendants }
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn galaxy_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.galaxy_id).collect()
    }

    pub fn rows(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.row).collect()
    }

    pub fn node_indices(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.node_index).collect()
    }

    pub fn snapshots(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.snapshot).collect()
    }

    /// Position `k` of the first contiguity break
    ///
    /// `k` is the first index with `galaxy_id[k + 1] - galaxy_id[k] != 1`.
    pub fn first_break(&self) -> Option<usize> {
        self.entries
            .windows(2)
            .position(|pair| pair[1].galaxy_id - pair[0].galaxy_id != 1)
    }

    /// Snapshot of the entry right after the first break
    pub fn last_resolved_snapshot(&self) -> Option<i64> {
        self.first_break().map(|k| self.entries[k + 1].snapshot)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TrackEntry;
    type IntoIter = std::slice::Iter<'a, TrackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
