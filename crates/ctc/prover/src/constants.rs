//! Constants used throughout the prover.

use std::time::Duration;

use alloy_primitives::{Address, address};

/// `OVM_CanonicalTransactionChain` on Ethereum mainnet.
pub const DEFAULT_CTC_ADDRESS: Address = address!("4bf681894abec828b212c906082b444ceb2f6cf6");

/// `OVM_ExecutionManager` on Ethereum mainnet.
pub const DEFAULT_EXECUTION_MANAGER_ADDRESS: Address =
    address!("2745c24822f542bbffb41c6cb20edf766b5619f5");

/// Number of L1 blocks covered by each backward `eth_getLogs` window.
pub const DEFAULT_BLOCK_WINDOW: u64 = 250;

/// Lowest L1 block the batch search will scan.
pub const DEFAULT_SEARCH_FLOOR: u64 = 0;

/// Default timeout for a single RPC request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Retry Configuration Constants
// ============================================================================

/// Default maximum number of retry attempts for RPC operations.
pub const DEFAULT_RPC_MAX_RETRIES: u32 = 5;

/// Default initial delay for exponential backoff.
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Default maximum delay between retry attempts.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(10);
