//! Configuration types and validation for the prover.

use std::{num::NonZeroU64, time::Duration};

use alloy_primitives::Address;
use backon::ExponentialBuilder;
use thiserror::Error;
use url::Url;

use crate::{
    Cli, LogConfig,
    constants::{DEFAULT_RETRY_INITIAL_DELAY, DEFAULT_RETRY_MAX_DELAY, DEFAULT_RPC_MAX_RETRIES},
};

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid URL format.
    #[error("invalid {field} URL: {reason}")]
    InvalidUrl {
        /// The field name that contains the invalid URL.
        field: &'static str,
        /// The reason the URL is invalid.
        reason: String,
    },
    /// A field value is out of the allowed range.
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        /// The field name that is out of range.
        field: &'static str,
        /// The constraint description.
        constraint: &'static str,
        /// The actual value.
        value: String,
    },
}

/// Where the per-transaction gas limit comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitConfig {
    /// Read `getMaxTransactionGasLimit()` from the `ExecutionManager` at this address.
    ExecutionManager(Address),
    /// Use this value without touching L1.
    Fixed(u64),
}

/// Validated prover configuration.
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// URL of the L1 Ethereum RPC endpoint.
    pub l1_eth_rpc: Url,
    /// Global index of the transaction to prove.
    pub index: u64,
    /// Address of the `CanonicalTransactionChain` contract on L1.
    pub ctc_addr: Address,
    /// Gas limit source for reconstructed transactions.
    pub gas_limit: GasLimitConfig,
    /// Width of each backward log search window, in blocks.
    pub block_window: NonZeroU64,
    /// Lowest L1 block the search will scan.
    pub search_floor: u64,
    /// RPC request timeout.
    pub rpc_timeout: Duration,
    /// Skip TLS certificate verification.
    pub skip_tls_verify: bool,
    /// Pretty-print the JSON output.
    pub pretty: bool,
    /// Logging configuration.
    pub log: LogConfig,
    /// RPC retry configuration.
    pub retry: RetryConfig,
}

impl ProverConfig {
    /// Validates CLI arguments and builds the configuration.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let args = cli.prover;

        validate_url(&args.l1_eth_rpc, "l1-eth-rpc")?;

        let block_window =
            NonZeroU64::new(args.block_window).ok_or_else(|| ConfigError::OutOfRange {
                field: "block-window",
                constraint: "greater than 0",
                value: args.block_window.to_string(),
            })?;

        if args.rpc_retry_initial_delay > args.rpc_retry_max_delay {
            return Err(ConfigError::OutOfRange {
                field: "rpc-retry-initial-delay",
                constraint: "at most rpc-retry-max-delay",
                value: humantime::format_duration(args.rpc_retry_initial_delay).to_string(),
            });
        }

        let gas_limit = args.gas_limit.map_or(
            GasLimitConfig::ExecutionManager(args.execution_manager_addr),
            GasLimitConfig::Fixed,
        );

        Ok(Self {
            l1_eth_rpc: args.l1_eth_rpc,
            index: args.index,
            ctc_addr: args.ctc_addr,
            gas_limit,
            block_window,
            search_floor: args.search_floor,
            rpc_timeout: args.rpc_timeout,
            skip_tls_verify: args.skip_tls_verify,
            pretty: args.pretty,
            log: cli.logging.into(),
            retry: RetryConfig {
                max_attempts: args.rpc_max_retries,
                initial_delay: args.rpc_retry_initial_delay,
                max_delay: args.rpc_retry_max_delay,
            },
        })
    }
}

/// Validate that a URL has a scheme and host.
pub fn validate_url(url: &Url, field: &'static str) -> Result<(), ConfigError> {
    if url.scheme().is_empty() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing scheme".to_string() });
    }

    if url.host().is_none() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing host".to_string() });
    }

    Ok(())
}

/// Validated RPC retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,
    /// Initial delay for exponential backoff.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RPC_MAX_RETRIES,
            initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

impl RetryConfig {
    /// Creates a `backon` [`ExponentialBuilder`] from this configuration.
    pub fn to_backoff_builder(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts as usize)
            .with_jitter()
    }
}
