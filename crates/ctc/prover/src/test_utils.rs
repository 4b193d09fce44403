//! In-memory collaborators and batch fixtures for tests.

use std::{collections::HashMap, sync::Mutex};

use alloy_primitives::{B256, Bytes};
use async_trait::async_trait;
use ctc_primitives::{CommitEvent, MerkleTree, SequencerBatch};

use crate::{CommitEventSource, RpcError, RpcResult, TransactionInputSource};

/// Event source backed by a list of events, each tagged with its L1 block.
#[derive(Debug, Default)]
pub struct MockEventSource {
    head: u64,
    events: Vec<CommitEvent>,
    failure: Option<RpcError>,
    queries: Mutex<Vec<(u64, u64)>>,
}

impl MockEventSource {
    /// Creates an empty source whose chain head is `head`.
    pub fn new(head: u64) -> Self {
        Self { head, ..Default::default() }
    }

    /// Adds an event, returned for any range containing its `block_number`.
    pub fn with_event(mut self, event: CommitEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Adds one placeholder event per `(block_number, prev_total_elements, batch_size)`.
    pub fn with_batches(mut self, batches: &[(u64, u64, u64)]) -> Self {
        for (batch_index, &(block_number, prev_total_elements, batch_size)) in
            batches.iter().enumerate()
        {
            self.events.push(CommitEvent {
                batch_index: batch_index as u64,
                batch_root: B256::ZERO,
                batch_size,
                prev_total_elements,
                extra_data: Bytes::new(),
                source_tx_hash: B256::with_last_byte(batch_index as u8),
                block_number,
            });
        }
        self
    }

    /// Makes every `commit_events` call fail with `err`.
    pub fn with_failure(mut self, err: RpcError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Returns the `(from, to)` ranges queried so far, in order.
    pub fn queries(&self) -> Vec<(u64, u64)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommitEventSource for MockEventSource {
    async fn block_number(&self) -> RpcResult<u64> {
        Ok(self.head)
    }

    async fn commit_events(&self, from_block: u64, to_block: u64) -> RpcResult<Vec<CommitEvent>> {
        self.queries.lock().unwrap().push((from_block, to_block));
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .events
            .iter()
            .filter(|event| (from_block..=to_block).contains(&event.block_number))
            .cloned()
            .collect())
    }
}

/// Transaction source backed by a map from hash to input.
#[derive(Debug, Default)]
pub struct MockTransactionSource {
    inputs: HashMap<B256, Bytes>,
}

impl MockTransactionSource {
    /// Registers the input of `tx_hash`.
    pub fn with_input(mut self, tx_hash: B256, input: impl Into<Bytes>) -> Self {
        self.inputs.insert(tx_hash, input.into());
        self
    }
}

#[async_trait]
impl TransactionInputSource for MockTransactionSource {
    async fn transaction_input(&self, tx_hash: B256) -> RpcResult<Bytes> {
        self.inputs
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| RpcError::TransactionNotFound(tx_hash.to_string()))
    }
}

/// Builds a batch with one context per `(timestamp, block_number, tx_count)`.
///
/// Payloads are distinct and non-empty: transaction `i` of the batch is `[i, i, ..]` of length
/// `i + 1`.
pub fn sample_batch(contexts: &[(u64, u64, usize)]) -> SequencerBatch {
    let mut batch = SequencerBatch::new(0);
    let mut next = 0usize;
    for &(timestamp, block_number, count) in contexts {
        let txs: Vec<Bytes> =
            (next..next + count).map(|i| Bytes::from(vec![i as u8; i + 1])).collect();
        next += count;
        batch.push_context(timestamp, block_number, 0, txs);
    }
    batch
}

/// Builds the commit event L1 would emit for `batch`, root included.
pub fn commit_event_for(
    batch: &SequencerBatch,
    batch_index: u64,
    prev_total_elements: u64,
    block_number: u64,
    source_tx_hash: B256,
) -> CommitEvent {
    let tree = MerkleTree::from_records(&batch.records(0));
    CommitEvent {
        batch_index,
        batch_root: tree.root(),
        batch_size: batch.transactions.len() as u64,
        prev_total_elements,
        extra_data: Bytes::new(),
        source_tx_hash,
        block_number,
    }
}
