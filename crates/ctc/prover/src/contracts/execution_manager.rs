//! `ExecutionManager` contract bindings and gas limit sources.

use alloy_primitives::Address;
use alloy_sol_types::sol;
use async_trait::async_trait;

use crate::{GasLimitSource, HttpProvider, RpcError, RpcResult};

sol! {
    /// `OVM_ExecutionManager` contract interface.
    #[sol(rpc)]
    interface IExecutionManager {
        /// Returns the gas limit applied to every sequencer transaction.
        function getMaxTransactionGasLimit()
            external
            view
            returns (uint256 _maxTransactionGasLimit);
    }
}

/// Reads the gas limit from the `ExecutionManager` contract.
#[derive(Debug)]
pub struct ExecutionManagerContractClient {
    contract: IExecutionManager::IExecutionManagerInstance<HttpProvider>,
}

impl ExecutionManagerContractClient {
    /// Creates a new client for the contract at `address`, reusing an existing provider.
    pub fn new(address: Address, provider: HttpProvider) -> Self {
        Self { contract: IExecutionManager::IExecutionManagerInstance::new(address, provider) }
    }
}

#[async_trait]
impl GasLimitSource for ExecutionManagerContractClient {
    async fn max_transaction_gas_limit(&self) -> RpcResult<u64> {
        let gas_limit =
            self.contract.getMaxTransactionGasLimit().call().await.map_err(|e| match e {
                alloy_contract::Error::TransportError(e) => RpcError::from(e),
                other => RpcError::Contract(format!("getMaxTransactionGasLimit failed: {other}")),
            })?;

        let gas_limit: u64 = gas_limit.try_into().map_err(|_| {
            RpcError::Contract("maxTransactionGasLimit overflows u64".to_string())
        })?;

        tracing::info!(gas_limit, "Read max transaction gas limit from ExecutionManager");

        Ok(gas_limit)
    }
}

/// A gas limit supplied up front, for chains that no longer deploy an `ExecutionManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGasLimit(pub u64);

#[async_trait]
impl GasLimitSource for FixedGasLimit {
    async fn max_transaction_gas_limit(&self) -> RpcResult<u64> {
        Ok(self.0)
    }
}
