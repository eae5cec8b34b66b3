//! NodeIndex Encoding
//!
//! The merger-tree builder labels every subgroup with a single integer
//!
//!   NodeIndex = snapshot × 10¹² + file_number × 10⁸ + local_index
//!
//! where `local_index` is the subgroup's position inside one Subfind output
//! file. The encoding is reproduced bit-for-bit so values read from a
//! catalogue can be decoded, and freshly encoded values compared against it.

use std::fmt;

use crate::error::{Error, Result};

/// Multiplier of the snapshot field
pub const SNAPSHOT_STRIDE: i64 = 1_000_000_000_000;

/// Multiplier of the file-number field
pub const FILE_STRIDE: i64 = 100_000_000;

/// Decoded NodeIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub i64);

impl NodeIndex {
    /// Encode the three fields
    ///
    /// Fails with `IndexOutOfRange` if a field would spill into its neighbour.
    pub fn encode(snapshot: i64, file_number: i64, local_index: i64) -> Result<Self> {
        if snapshot < 0 {
            return Err(Error::out_of_range(format!("negative snapshot {}", snapshot)));
        }
        if !(0..SNAPSHOT_STRIDE / FILE_STRIDE).contains(&file_number) {
            return Err(Error::out_of_range(format!(
                "file number {} does not fit the NodeIndex encoding",
                file_number
            )));
        }
        if !(0..FILE_STRIDE).contains(&local_index) {
            return Err(Error::out_of_range(format!(
                "local index {} does not fit the NodeIndex encoding",
                local_index
            )));
        }

        snapshot
            .checked_mul(SNAPSHOT_STRIDE)
            .and_then(|base| base.checked_add(file_number * FILE_STRIDE + local_index))
            .map(NodeIndex)
            .ok_or_else(|| Error::out_of_range(format!("snapshot {} overflows NodeIndex", snapshot)))
    }

    /// Snapshot number, `floor(NodeIndex / 10¹²)`
    pub fn snapshot(self) -> i64 {
        self.0.div_euclid(SNAPSHOT_STRIDE)
    }

    /// Subfind file number
    pub fn file_number(self) -> i64 {
        self.0.rem_euclid(SNAPSHOT_STRIDE) / FILE_STRIDE
    }

    /// Position inside the Subfind file
    pub fn local_index(self) -> i64 {
        self.0.rem_euclid(FILE_STRIDE)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeIndex {
    fn from(raw: i64) -> Self {
        NodeIndex(raw)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let node = NodeIndex::encode(28, 3, 1234).unwrap();
        assert_eq!(node.get(), 28_000_300_001_234);
        assert_eq!(node.snapshot(), 28);
        assert_eq!(node.file_number(), 3);
        assert_eq!(node.local_index(), 1234);
    }

    #[test]
    fn test_decode_raw_value() {
        let node = NodeIndex::from(19_000_000_000_007);
        assert_eq!(node.snapshot(), 19);
        assert_eq!(node.file_number(), 0);
        assert_eq!(node.local_index(), 7);
    }

    #[test]
    fn test_field_overflow_rejected() {
        assert!(NodeIndex::encode(1, 0, FILE_STRIDE).is_err());
        assert!(NodeIndex::encode(1, 10_000, 0).is_err());
        assert!(NodeIndex::encode(-1, 0, 0).is_err());
        assert!(NodeIndex::encode(i64::MAX / 2, 0, 0).is_err());
    }
}
