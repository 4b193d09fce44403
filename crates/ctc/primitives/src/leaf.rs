//! Leaf preimages for sequencer transactions.
//!
//! A sequencer leaf is `0x01 ‖ timestamp ‖ blockNumber ‖ data`, with both numbers encoded as
//! 32-byte big-endian words. Padding leaves are the hash of 32 zero bytes and carry no tag.

use alloy_primitives::{B256, U256};

use crate::{Hasher, TransactionRecord};

/// Tag prepended to sequencer leaf preimages.
pub const SEQUENCER_LEAF_TAG: u8 = 0x01;

/// Length of a leaf preimage without its payload.
pub const LEAF_PREIMAGE_OVERHEAD: usize = 1 + 32 + 32;

/// Returns the preimage hashed to form the leaf for `record`.
pub fn leaf_preimage(record: &TransactionRecord) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(LEAF_PREIMAGE_OVERHEAD + record.data.len());
    preimage.push(SEQUENCER_LEAF_TAG);
    preimage.extend_from_slice(&U256::from(record.timestamp).to_be_bytes::<32>());
    preimage.extend_from_slice(&U256::from(record.block_number).to_be_bytes::<32>());
    preimage.extend_from_slice(&record.data);
    preimage
}

/// Returns the number of leaves after padding `n` records: the next power of two, and a single
/// padding leaf for an empty batch.
pub const fn padded_leaf_count(n: usize) -> usize {
    if n == 0 { 1 } else { n.next_power_of_two() }
}

/// Hashes every record and appends padding leaves up to [`padded_leaf_count`].
pub fn leaf_hashes<H: Hasher>(hasher: &H, records: &[TransactionRecord]) -> Vec<B256> {
    let padded = padded_leaf_count(records.len());
    let mut leaves = Vec::with_capacity(padded);
    leaves.extend(records.iter().map(|record| hasher.hash(&leaf_preimage(record))));
    leaves.resize(padded, hasher.zero_leaf());
    leaves
}
