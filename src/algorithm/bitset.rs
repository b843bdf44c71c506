use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset over deployment indices of a [`TileCatalog`](crate::spatial::tiles::TileCatalog)
///
/// Indices are 0-based positions in the catalog's deployment arena.
/// Provides O(1) membership testing and cheap cloning for propagation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    bits: BitVec,
}

impl CandidateSet {
    /// Create a set with no deployments present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Create a set containing every deployment
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: bitvec![1; capacity],
        }
    }

    /// Number of deployments this set can address
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a deployment index; indices beyond capacity are ignored
    pub fn insert(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Test deployment membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Keep only `index`, clearing every other member
    pub fn retain_only(&mut self, index: usize) {
        self.bits.fill(false);
        self.insert(index);
    }

    /// Intersect this set with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Test if no deployments are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count deployments in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate member indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all member indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateSet({} deployments: {:?})", self.count(), self.to_vec())
    }
}
