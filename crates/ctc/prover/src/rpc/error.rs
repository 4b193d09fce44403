//! RPC-specific error types.

use alloy_transport::TransportError;
use thiserror::Error;

/// RPC-specific error type.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// Transport error from alloy.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Invalid response from RPC.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Contract call reverted or returned undecodable data.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Request timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl RpcError {
    /// Returns true if this error is transient and the operation should be retried.
    ///
    /// Only transport-level errors (network issues, timeouts, connection failures)
    /// are considered retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
