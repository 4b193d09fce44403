#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::{io::Write, sync::Arc};

use clap::Parser;
use ctc_prover::{
    BatchLocator, BatchProver, Cli, ExecutionManagerContractClient, FixedGasLimit,
    GasLimitConfig, GasLimitSource, L1ClientConfig, L1ClientImpl, ProverConfig,
};
use eyre::{Result, WrapErr};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProverConfig::from_cli(Cli::parse())?;
    config.log.init_tracing_subscriber()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        index = config.index,
        ctc = %config.ctc_addr,
        block_window = config.block_window.get(),
        search_floor = config.search_floor,
        "Starting ctc-prover"
    );

    let l1 = Arc::new(L1ClientImpl::new(
        L1ClientConfig::new(config.l1_eth_rpc.clone())
            .with_ctc_address(config.ctc_addr)
            .with_timeout(config.rpc_timeout)
            .with_retry_config(config.retry.clone())
            .with_skip_tls_verify(config.skip_tls_verify),
    )?);

    let gas_limit: Arc<dyn GasLimitSource> = match config.gas_limit {
        GasLimitConfig::ExecutionManager(address) => {
            Arc::new(ExecutionManagerContractClient::new(address, l1.provider().clone()))
        }
        GasLimitConfig::Fixed(gas_limit) => Arc::new(FixedGasLimit(gas_limit)),
    };

    let locator = BatchLocator::new(Arc::clone(&l1), config.block_window, config.search_floor);
    let prover = BatchProver::new(locator, l1, gas_limit);

    let proof = prover
        .prove(config.index)
        .await
        .wrap_err_with(|| format!("failed to prove transaction {}", config.index))?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&proof)?
    } else {
        serde_json::to_string(&proof)?
    };
    writeln!(std::io::stdout().lock(), "{json}")?;

    Ok(())
}
