//! Async trait definitions for the L1 data the prover consumes.

use alloy_primitives::{B256, Bytes};
use async_trait::async_trait;
use ctc_primitives::CommitEvent;

use super::error::RpcResult;

/// Source of `TransactionBatchAppended` events.
#[async_trait]
pub trait CommitEventSource: Send + Sync {
    /// Gets the latest block number.
    async fn block_number(&self) -> RpcResult<u64>;

    /// Gets the commit events emitted in the inclusive block range `[from_block, to_block]`,
    /// in emission order.
    async fn commit_events(&self, from_block: u64, to_block: u64) -> RpcResult<Vec<CommitEvent>>;
}

/// Source of raw transaction input bytes.
#[async_trait]
pub trait TransactionInputSource: Send + Sync {
    /// Gets the input of the transaction with the given hash.
    async fn transaction_input(&self, tx_hash: B256) -> RpcResult<Bytes>;
}

/// Source of the gas limit stamped on every reconstructed sequencer transaction.
#[async_trait]
pub trait GasLimitSource: Send + Sync {
    /// Gets the maximum per-transaction gas limit.
    async fn max_transaction_gas_limit(&self) -> RpcResult<u64>;
}
