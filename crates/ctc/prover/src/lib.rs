#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod cli;
pub use cli::{Cli, LogArgs, ProverArgs};

mod config;
pub use config::{ConfigError, GasLimitConfig, ProverConfig, RetryConfig, validate_url};

mod constants;
pub use constants::*;

mod contracts;
pub use contracts::{
    ExecutionManagerContractClient, FixedGasLimit, ICanonicalTransactionChain, IExecutionManager,
    IOVMCanonicalTransactionChain, TRANSACTION_BATCH_APPENDED_TOPIC, commit_event_from_log,
};

mod error;
pub use error::{ProverError, ProverResult};

mod locator;
pub use locator::BatchLocator;

mod logging;
pub use logging::{LogConfig, LogFormat, StderrLogConfig, verbosity_to_level_filter};

mod prover;
pub use prover::{BatchProver, InclusionProof, build_inclusion_proof};

mod rpc;
pub use rpc::{
    CommitEventSource, GasLimitSource, HttpProvider, L1ClientConfig, L1ClientImpl, RpcError,
    RpcResult, TransactionInputSource,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
