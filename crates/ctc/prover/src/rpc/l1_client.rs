//! L1 RPC client implementation.

use std::time::Duration;

use alloy_consensus::Transaction as _;
use alloy_primitives::{Address, B256, Bytes};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::Filter;
use alloy_transport_http::{Http, reqwest::Client};
use async_trait::async_trait;
use backon::Retryable;
use ctc_primitives::CommitEvent;
use url::Url;

use super::{
    HttpProvider,
    error::{RpcError, RpcResult},
    traits::{CommitEventSource, TransactionInputSource},
};
use crate::{
    TRANSACTION_BATCH_APPENDED_TOPIC, commit_event_from_log, config::RetryConfig,
    constants::{DEFAULT_CTC_ADDRESS, DEFAULT_RPC_TIMEOUT},
};

/// Configuration for the L1 client.
#[derive(Debug, Clone)]
pub struct L1ClientConfig {
    /// RPC endpoint URL.
    pub endpoint: Url,
    /// Address of the `CanonicalTransactionChain` whose logs are queried.
    pub ctc_address: Address,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
    /// Skip TLS certificate verification.
    pub skip_tls_verify: bool,
}

impl L1ClientConfig {
    /// Creates a new L1 client configuration with defaults.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            ctc_address: DEFAULT_CTC_ADDRESS,
            timeout: DEFAULT_RPC_TIMEOUT,
            retry_config: RetryConfig::default(),
            skip_tls_verify: false,
        }
    }

    /// Sets the `CanonicalTransactionChain` address.
    pub const fn with_ctc_address(mut self, ctc_address: Address) -> Self {
        self.ctc_address = ctc_address;
        self
    }

    /// Sets the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry configuration.
    pub const fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Sets whether to skip TLS certificate verification.
    pub const fn with_skip_tls_verify(mut self, skip: bool) -> Self {
        self.skip_tls_verify = skip;
        self
    }
}

/// L1 RPC client implementation using Alloy.
#[derive(Debug, Clone)]
pub struct L1ClientImpl {
    /// The underlying HTTP provider.
    provider: HttpProvider,
    /// Address of the `CanonicalTransactionChain`.
    ctc_address: Address,
    /// Retry configuration.
    retry_config: RetryConfig,
}

impl L1ClientImpl {
    /// Creates a new L1 client from the given configuration.
    pub fn new(config: L1ClientConfig) -> RpcResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout);

        if config.skip_tls_verify {
            tracing::warn!("TLS certificate verification is disabled for L1 RPC connection");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| RpcError::Connection(format!("Failed to build HTTP client: {e}")))?;

        let http = Http::with_client(client, config.endpoint);
        let rpc_client = RpcClient::new(http, false);
        let provider = RootProvider::new(rpc_client);

        Ok(Self { provider, ctc_address: config.ctc_address, retry_config: config.retry_config })
    }

    /// Returns the underlying provider, for contract bindings sharing the same transport.
    pub const fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}

#[async_trait]
impl CommitEventSource for L1ClientImpl {
    async fn block_number(&self) -> RpcResult<u64> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async { self.provider.get_block_number().await.map_err(RpcError::from) })
            .retry(backoff)
            .when(|e| e.is_retryable())
            .notify(|err, dur| {
                tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::block_number");
            })
            .await
    }

    async fn commit_events(&self, from_block: u64, to_block: u64) -> RpcResult<Vec<CommitEvent>> {
        let filter = Filter::new()
            .address(self.ctc_address)
            .event_signature(TRANSACTION_BATCH_APPENDED_TOPIC)
            .from_block(from_block)
            .to_block(to_block);

        let backoff = self.retry_config.to_backoff_builder();

        let logs = (|| async { self.provider.get_logs(&filter).await.map_err(RpcError::from) })
            .retry(backoff)
            .when(|e| e.is_retryable())
            .notify(|err, dur| {
                tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::commit_events");
            })
            .await?;

        logs.iter().map(commit_event_from_log).collect()
    }
}

#[async_trait]
impl TransactionInputSource for L1ClientImpl {
    async fn transaction_input(&self, tx_hash: B256) -> RpcResult<Bytes> {
        let backoff = self.retry_config.to_backoff_builder();

        let tx = (|| async {
            self.provider.get_transaction_by_hash(tx_hash).await.map_err(RpcError::from)
        })
        .retry(backoff)
        .when(|e| e.is_retryable())
        .notify(|err, dur| {
            tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::transaction_input");
        })
        .await?
        .ok_or_else(|| RpcError::TransactionNotFound(tx_hash.to_string()))?;

        Ok(tx.input().clone())
    }
}
