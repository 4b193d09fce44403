//! Merkle inclusion proofs and their verification.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{Hasher, Keccak256Hasher};

/// A sibling path from a leaf up to, but excluding, the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// Batch-local index of the leaf.
    pub index: u64,
    /// One sibling per level, leaf level first.
    pub siblings: Vec<B256>,
}

impl MerkleProof {
    /// Verifies the proof for `leaf` against `root` with keccak-256.
    pub fn verify(&self, leaf: B256, root: B256) -> bool {
        verify_proof(&Keccak256Hasher, leaf, self.index, &self.siblings, root)
    }

    /// Recomputes the root implied by `leaf` and this path.
    pub fn compute_root<H: Hasher>(&self, hasher: &H, leaf: B256) -> B256 {
        fold_siblings(hasher, leaf, self.index, &self.siblings)
    }
}

/// Verifies that `leaf` sits at `index` under `root`.
///
/// At every level an even index means the sibling is the right neighbour and an odd index means
/// it is the left one; the index is halved after each step. Indices that do not fit in a tree of
/// `siblings.len()` levels are rejected.
pub fn verify_proof<H: Hasher>(
    hasher: &H,
    leaf: B256,
    index: u64,
    siblings: &[B256],
    root: B256,
) -> bool {
    if siblings.len() < 64 && index >> siblings.len() != 0 {
        return false;
    }
    fold_siblings(hasher, leaf, index, siblings) == root
}

fn fold_siblings<H: Hasher>(hasher: &H, leaf: B256, index: u64, siblings: &[B256]) -> B256 {
    let (computed, _) = siblings.iter().fold((leaf, index), |(node, index), sibling| {
        let parent = if index & 1 == 0 {
            hasher.hash_pair(&node, sibling)
        } else {
            hasher.hash_pair(sibling, &node)
        };
        (parent, index >> 1)
    });
    computed
}
