//! Binary keccak Merkle tree over a power-of-two leaf set.

use alloy_primitives::B256;

use crate::{Hasher, Keccak256Hasher, MerkleError, MerkleProof, TransactionRecord, leaf_hashes};

/// A fully materialized Merkle tree, stored as one vector per level.
///
/// `levels[0]` holds the leaves and `levels[height]` holds the root. Node `j` of level `L + 1`
/// is `hash(levels[L][2j] ‖ levels[L][2j + 1])`. A single-leaf tree has height zero and its
/// root is the leaf itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree<H = Keccak256Hasher> {
    hasher: H,
    levels: Vec<Vec<B256>>,
}

impl MerkleTree<Keccak256Hasher> {
    /// Builds the keccak tree for a batch of decoded records, padding included.
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let leaves = leaf_hashes(&Keccak256Hasher, records);
        // Padded leaf sets are never empty and always a power of two.
        let levels = build_levels(&Keccak256Hasher, leaves);
        Self { hasher: Keccak256Hasher, levels }
    }
}

impl<H: Hasher> MerkleTree<H> {
    /// Builds a tree over `leaves`, which must be a non-empty power-of-two sized set.
    pub fn from_leaves(hasher: H, leaves: Vec<B256>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyLeaves);
        }
        if !leaves.len().is_power_of_two() {
            return Err(MerkleError::NotPowerOfTwo(leaves.len()));
        }

        let levels = build_levels(&hasher, leaves);
        Ok(Self { hasher, levels })
    }

    /// Returns the root hash.
    pub fn root(&self) -> B256 {
        // `levels` always ends with a single-node level.
        self.levels.last().and_then(|top| top.first()).copied().unwrap_or_default()
    }

    /// Returns the number of hashing rounds between the leaves and the root.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// Returns the number of leaves, padding included.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Returns the leaf hashes, padding included.
    pub fn leaves(&self) -> &[B256] {
        &self.levels[0]
    }

    /// Returns all levels, leaves first.
    pub fn levels(&self) -> &[Vec<B256>] {
        &self.levels
    }

    /// Returns the node at `position` within `level`.
    pub fn node(&self, level: usize, position: usize) -> Option<B256> {
        self.levels.get(level).and_then(|nodes| nodes.get(position)).copied()
    }

    /// Returns the hasher the tree was built with.
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the sibling path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfRange { index, leaves: self.leaf_count() });
        }

        let mut position = index;
        let siblings = self.levels[..self.height()]
            .iter()
            .map(|nodes| {
                let sibling = nodes[position ^ 1];
                position >>= 1;
                sibling
            })
            .collect();

        Ok(MerkleProof { index: index as u64, siblings })
    }
}

fn build_levels<H: Hasher>(hasher: &H, leaves: Vec<B256>) -> Vec<Vec<B256>> {
    let height = leaves.len().trailing_zeros() as usize;
    let mut levels = Vec::with_capacity(height + 1);
    levels.push(leaves);

    while levels[levels.len() - 1].len() > 1 {
        let next = levels[levels.len() - 1]
            .chunks_exact(2)
            .map(|pair| hasher.hash_pair(&pair[0], &pair[1]))
            .collect();
        levels.push(next);
    }
    levels
}
