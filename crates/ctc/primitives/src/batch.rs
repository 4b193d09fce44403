//! Batch and transaction types shared by the decoder, the leaf encoder and the prover.

use core::ops::Range;

use alloy_primitives::{Address, B256, Bytes, address};
use serde::{Deserialize, Serialize};

/// The L2 entrypoint every sequencer transaction is executed through.
pub const SEQUENCER_ENTRYPOINT: Address = address!("4200000000000000000000000000000000000005");

/// `l1QueueOrigin` value of transactions submitted by the sequencer.
pub const SEQUENCER_QUEUE_ORIGIN: u8 = 0;

/// A `TransactionBatchAppended` event observed on L1.
///
/// The event covers the half-open global index range
/// `[prev_total_elements, prev_total_elements + batch_size)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEvent {
    /// Index of the batch in the chain of batches.
    pub batch_index: u64,
    /// Merkle root committed for the batch.
    pub batch_root: B256,
    /// Number of elements in the batch.
    pub batch_size: u64,
    /// Total number of elements committed before this batch.
    pub prev_total_elements: u64,
    /// Opaque extra data attached to the commitment.
    pub extra_data: Bytes,
    /// Hash of the L1 transaction that emitted the event.
    pub source_tx_hash: B256,
    /// L1 block the event was emitted in.
    pub block_number: u64,
}

impl CommitEvent {
    /// Returns the global index range covered by the batch.
    pub const fn element_range(&self) -> Range<u64> {
        self.prev_total_elements..self.prev_total_elements.saturating_add(self.batch_size)
    }

    /// Returns true if `global_index` belongs to this batch.
    pub const fn covers(&self, global_index: u64) -> bool {
        global_index >= self.prev_total_elements
            && global_index < self.prev_total_elements.saturating_add(self.batch_size)
    }

    /// Maps a global index to its batch-local index, if the batch covers it.
    pub const fn local_index(&self, global_index: u64) -> Option<u64> {
        if self.covers(global_index) {
            Some(global_index - self.prev_total_elements)
        } else {
            None
        }
    }

    /// Returns the batch header the verifier expects alongside a proof.
    pub fn header(&self) -> BatchHeader {
        BatchHeader {
            batch_index: self.batch_index,
            batch_root: self.batch_root,
            batch_size: self.batch_size,
            prev_total_elements: self.prev_total_elements,
            extra_data: self.extra_data.clone(),
        }
    }
}

/// The `ChainBatchHeader` struct checked by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchHeader {
    /// Index of the batch.
    pub batch_index: u64,
    /// Merkle root of the batch.
    pub batch_root: B256,
    /// Number of elements in the batch.
    pub batch_size: u64,
    /// Total number of elements committed before this batch.
    pub prev_total_elements: u64,
    /// Opaque extra data.
    pub extra_data: Bytes,
}

/// One 16-byte context record of a sequencer batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerContext {
    /// Number of sequencer transactions that share this context.
    pub num_sequenced_transactions: u64,
    /// Number of queue transactions following them. Parsed, not used for payload counting.
    pub num_subsequent_queue_transactions: u64,
    /// L1 timestamp assigned to the transactions.
    pub timestamp: u64,
    /// L1 block number assigned to the transactions.
    pub block_number: u64,
}

/// A reconstructed L2 transaction, in the shape the verifier's `Transaction` struct expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Context timestamp.
    pub timestamp: u64,
    /// Context block number.
    pub block_number: u64,
    /// Queue origin, always the sequencer queue here.
    pub l1_queue_origin: u8,
    /// L1 sender, zero for sequencer transactions.
    pub l1_tx_origin: Address,
    /// L2 entrypoint.
    pub entrypoint: Address,
    /// Maximum per-transaction gas.
    pub gas_limit: u64,
    /// Raw transaction payload.
    pub data: Bytes,
}

impl TransactionRecord {
    /// Builds the record for a sequencer transaction decoded under `context`.
    pub const fn sequenced(context: &SequencerContext, gas_limit: u64, data: Bytes) -> Self {
        Self {
            timestamp: context.timestamp,
            block_number: context.block_number,
            l1_queue_origin: SEQUENCER_QUEUE_ORIGIN,
            l1_tx_origin: Address::ZERO,
            entrypoint: SEQUENCER_ENTRYPOINT,
            gas_limit,
            data,
        }
    }

    /// Returns the chain element this record was committed as.
    pub fn chain_element(&self) -> ChainElement {
        ChainElement {
            is_sequenced: true,
            queue_index: 0,
            timestamp: self.timestamp,
            block_number: self.block_number,
            tx_data: self.data.clone(),
        }
    }
}

/// The `TransactionChainElement` struct checked by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainElement {
    /// True for sequencer transactions.
    pub is_sequenced: bool,
    /// Queue index, zero for sequencer transactions.
    pub queue_index: u64,
    /// Context timestamp.
    pub timestamp: u64,
    /// Context block number.
    pub block_number: u64,
    /// Raw transaction payload.
    pub tx_data: Bytes,
}
