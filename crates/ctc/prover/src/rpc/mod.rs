use alloy_network::Ethereum;
use alloy_provider::RootProvider;

/// Shared type alias for the L1 HTTP provider.
/// Uses `RootProvider` directly since the prover only performs read operations.
pub type HttpProvider = RootProvider<Ethereum>;

mod error;
mod l1_client;
mod traits;

pub use error::{RpcError, RpcResult};
pub use l1_client::{L1ClientConfig, L1ClientImpl};
pub use traits::{CommitEventSource, GasLimitSource, TransactionInputSource};
