//! Error types for the prover.

use alloy_primitives::B256;
use ctc_primitives::CallDataError;
use thiserror::Error;

use crate::rpc::RpcError;

/// Main error type for the prover.
///
/// Every variant is terminal for the request that raised it. Only
/// [`ProverError::SourceUnavailable`] may succeed when the whole request is retried.
#[derive(Debug, Error)]
pub enum ProverError {
    /// An L1 query failed after the client exhausted its retries.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] RpcError),

    /// No commit event covering the index exists between the chain head and the search floor.
    #[error("No batch covers index {index} above block {floor}")]
    NotFound {
        /// The requested global index.
        index: u64,
        /// The lowest block searched.
        floor: u64,
    },

    /// The commit transaction input does not decode as a sequencer batch.
    #[error("Malformed calldata: {0}")]
    MalformedCallData(#[from] CallDataError),

    /// The batch-local index does not exist in the batch.
    #[error("Index {index} out of range for batch of {size} elements")]
    IndexOutOfRange {
        /// The batch-local index.
        index: u64,
        /// Number of elements in the batch.
        size: u64,
    },

    /// The rebuilt tree does not match the root committed on L1.
    #[error("Root mismatch: expected {expected}, computed {computed}")]
    RootMismatch {
        /// Root from the commit event.
        expected: B256,
        /// Root of the rebuilt tree.
        computed: B256,
    },
}

impl ProverError {
    /// Returns true if retrying the whole request may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(err) if err.is_retryable())
    }
}

/// Result type alias for prover operations.
pub type ProverResult<T> = Result<T, ProverError>;
