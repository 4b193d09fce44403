//! CLI argument definitions for the prover.

use std::time::Duration;

use alloy_primitives::Address;
use clap::{ArgAction, Parser};
use url::Url;

use crate::{LogConfig, LogFormat, StderrLogConfig, verbosity_to_level_filter};

/// CTC prover - Merkle inclusion proofs for canonical transaction chain transactions.
#[derive(Debug, Clone, Parser)]
#[command(name = "ctc-prover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Prover configuration arguments.
    #[command(flatten)]
    pub prover: ProverArgs,

    /// Logging configuration arguments.
    #[command(flatten)]
    pub logging: LogArgs,
}

/// Core prover configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Prover")]
pub struct ProverArgs {
    /// URL of the L1 Ethereum RPC endpoint.
    #[arg(
        long = "l1-eth-rpc",
        env = "CTC_PROVER_L1_ETH_RPC",
        value_parser = parse_url
    )]
    pub l1_eth_rpc: Url,

    /// Global index of the transaction to prove.
    #[arg(long = "index", env = "CTC_PROVER_INDEX")]
    pub index: u64,

    /// Address of the `CanonicalTransactionChain` contract on L1.
    #[arg(
        long = "ctc-addr",
        env = "CTC_PROVER_CTC_ADDR",
        default_value = "0x4bf681894abec828b212c906082b444ceb2f6cf6",
        value_parser = parse_address
    )]
    pub ctc_addr: Address,

    /// Address of the `ExecutionManager` contract on L1.
    #[arg(
        long = "execution-manager-addr",
        env = "CTC_PROVER_EXECUTION_MANAGER_ADDR",
        default_value = "0x2745c24822f542bbffb41c6cb20edf766b5619f5",
        value_parser = parse_address
    )]
    pub execution_manager_addr: Address,

    /// Gas limit for reconstructed transactions. Skips the `ExecutionManager` lookup.
    #[arg(long = "gas-limit", env = "CTC_PROVER_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// Number of L1 blocks scanned per log query.
    #[arg(long = "block-window", env = "CTC_PROVER_BLOCK_WINDOW", default_value = "250")]
    pub block_window: u64,

    /// Lowest L1 block to scan before giving up.
    #[arg(long = "search-floor", env = "CTC_PROVER_SEARCH_FLOOR", default_value = "0")]
    pub search_floor: u64,

    /// RPC request timeout (e.g., "30s", "1m").
    #[arg(
        long = "rpc-timeout",
        env = "CTC_PROVER_RPC_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration
    )]
    pub rpc_timeout: Duration,

    /// Maximum number of retry attempts for RPC operations.
    #[arg(long = "rpc-max-retries", env = "CTC_PROVER_RPC_MAX_RETRIES", default_value = "5")]
    pub rpc_max_retries: u32,

    /// Initial delay for exponential backoff (e.g., "100ms", "1s").
    #[arg(
        long = "rpc-retry-initial-delay",
        env = "CTC_PROVER_RPC_RETRY_INITIAL_DELAY",
        default_value = "100ms",
        value_parser = parse_duration
    )]
    pub rpc_retry_initial_delay: Duration,

    /// Maximum delay between retry attempts (e.g., "10s", "1m").
    #[arg(
        long = "rpc-retry-max-delay",
        env = "CTC_PROVER_RPC_RETRY_MAX_DELAY",
        default_value = "10s",
        value_parser = parse_duration
    )]
    pub rpc_retry_max_delay: Duration,

    /// Skip TLS certificate verification.
    #[arg(long = "skip-tls-verify", env = "CTC_PROVER_SKIP_TLS_VERIFY", default_value = "false")]
    pub skip_tls_verify: bool,

    /// Pretty-print the JSON output.
    #[arg(long = "pretty", env = "CTC_PROVER_PRETTY", default_value = "false")]
    pub pretty: bool,
}

/// Logging configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// Increase logging verbosity (1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5=TRACE).
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        default_value = "3",
        env = "CTC_PROVER_LOG_LEVEL",
        global = true
    )]
    pub level: u8,

    /// Suppress stderr logging.
    #[arg(long = "quiet", short = 'q', global = true)]
    pub quiet: bool,

    /// Stderr log format.
    #[arg(
        long = "log-format",
        default_value = "full",
        env = "CTC_PROVER_LOG_FORMAT",
        global = true
    )]
    pub format: LogFormat,
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        let stderr_logs = (!args.quiet).then_some(StderrLogConfig { format: args.format });
        Self { global_level: verbosity_to_level_filter(args.level), stderr_logs }
    }
}

/// Parse a duration string like "12s", "5m", "1h".
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// Parse a URL string.
fn parse_url(s: &str) -> Result<Url, url::ParseError> {
    Url::parse(s)
}

/// Parse an Ethereum address from hex string.
fn parse_address(s: &str) -> Result<Address, alloy_primitives::hex::FromHexError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;
    use crate::{DEFAULT_CTC_ADDRESS, DEFAULT_EXECUTION_MANAGER_ADDRESS};

    #[test]
    fn test_parse_duration_valid() {
        assert_eq!(parse_duration("100ms").unwrap(), Duration::from_millis(100));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
    }

    #[test]
    fn test_parse_url_invalid() {
        assert!(parse_url("not-a-url").is_err());
    }

    #[test]
    fn test_parse_address_invalid() {
        assert!(parse_address("0xnotanaddress").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let args =
            vec!["ctc-prover", "--l1-eth-rpc", "http://localhost:8545", "--index", "3596843"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.prover.index, 3_596_843);
        assert_eq!(cli.prover.ctc_addr, DEFAULT_CTC_ADDRESS);
        assert_eq!(cli.prover.execution_manager_addr, DEFAULT_EXECUTION_MANAGER_ADDRESS);
        assert_eq!(cli.prover.gas_limit, None);
        assert_eq!(cli.prover.block_window, 250);
        assert_eq!(cli.prover.search_floor, 0);
        assert_eq!(cli.prover.rpc_timeout, Duration::from_secs(30));
        assert!(!cli.prover.skip_tls_verify);
        assert!(!cli.prover.pretty);

        assert_eq!(cli.prover.rpc_max_retries, 5);
        assert_eq!(cli.prover.rpc_retry_initial_delay, Duration::from_millis(100));
        assert_eq!(cli.prover.rpc_retry_max_delay, Duration::from_secs(10));

        assert_eq!(cli.logging.level, 3);
        assert_eq!(cli.logging.format, LogFormat::Full);
        assert!(!cli.logging.quiet);
    }

    #[test]
    fn test_cli_missing_index() {
        let args = vec!["ctc-prover", "--l1-eth-rpc", "http://localhost:8545"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_quiet_disables_stderr_layer() {
        let args =
            vec!["ctc-prover", "--l1-eth-rpc", "http://localhost:8545", "--index", "1", "-q"];
        let config: LogConfig = Cli::try_parse_from(args).unwrap().logging.into();
        assert_eq!(config.global_level, LevelFilter::INFO);
        assert!(config.stderr_logs.is_none());
    }
}
