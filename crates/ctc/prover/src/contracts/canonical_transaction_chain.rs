//! `CanonicalTransactionChain` event bindings.
//!
//! Two deployments of the chain emit `TransactionBatchAppended` with the same signature but a
//! different indexing of `_batchIndex`. Both share one topic hash, so logs are told apart by
//! their topic count.

use alloy_primitives::{B256, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::{SolEvent, sol};
use ctc_primitives::CommitEvent;

use crate::{RpcError, RpcResult};

sol! {
    /// `CanonicalTransactionChain` interface with an indexed batch index.
    interface ICanonicalTransactionChain {
        /// Emitted once per appended batch.
        event TransactionBatchAppended(
            uint256 indexed _batchIndex,
            bytes32 _batchRoot,
            uint256 _batchSize,
            uint256 _prevTotalElements,
            bytes _extraData
        );
    }
}

sol! {
    /// `OVM_CanonicalTransactionChain` interface, which emits every field in the log data.
    interface IOVMCanonicalTransactionChain {
        /// Emitted once per appended batch.
        event TransactionBatchAppended(
            uint256 _batchIndex,
            bytes32 _batchRoot,
            uint256 _batchSize,
            uint256 _prevTotalElements,
            bytes _extraData
        );
    }
}

/// Topic 0 of `TransactionBatchAppended`, shared by both layouts.
pub const TRANSACTION_BATCH_APPENDED_TOPIC: B256 =
    ICanonicalTransactionChain::TransactionBatchAppended::SIGNATURE_HASH;

/// Converts an RPC log into a [`CommitEvent`].
pub fn commit_event_from_log(log: &Log) -> RpcResult<CommitEvent> {
    let source_tx_hash = log
        .transaction_hash
        .ok_or_else(|| RpcError::InvalidResponse("log is missing its transaction hash".into()))?;
    let block_number = log
        .block_number
        .ok_or_else(|| RpcError::InvalidResponse("log is missing its block number".into()))?;

    let invalid =
        |e: alloy_sol_types::Error| RpcError::InvalidResponse(format!("bad batch log: {e}"));

    let event = if log.topics().len() > 1 {
        ICanonicalTransactionChain::TransactionBatchAppended::decode_log(&log.inner)
            .map_err(invalid)?
            .data
    } else {
        let legacy = IOVMCanonicalTransactionChain::TransactionBatchAppended::decode_log(&log.inner)
            .map_err(invalid)?
            .data;
        ICanonicalTransactionChain::TransactionBatchAppended {
            _batchIndex: legacy._batchIndex,
            _batchRoot: legacy._batchRoot,
            _batchSize: legacy._batchSize,
            _prevTotalElements: legacy._prevTotalElements,
            _extraData: legacy._extraData,
        }
    };

    Ok(CommitEvent {
        batch_index: to_u64(event._batchIndex, "batchIndex")?,
        batch_root: event._batchRoot,
        batch_size: to_u64(event._batchSize, "batchSize")?,
        prev_total_elements: to_u64(event._prevTotalElements, "prevTotalElements")?,
        extra_data: event._extraData,
        source_tx_hash,
        block_number,
    })
}

fn to_u64(value: U256, field: &'static str) -> RpcResult<u64> {
    value.try_into().map_err(|_| RpcError::InvalidResponse(format!("{field} overflows u64")))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes, b256, bytes};

    use super::*;

    const TX_HASH: B256 = b256!("00000000000000000000000000000000000000000000000000000000000000aa");

    fn rpc_log(inner: alloy_primitives::LogData) -> Log {
        Log {
            inner: alloy_primitives::Log { address: Address::ZERO, data: inner },
            transaction_hash: Some(TX_HASH),
            block_number: Some(12_000_000),
            ..Default::default()
        }
    }

    fn indexed_event() -> ICanonicalTransactionChain::TransactionBatchAppended {
        ICanonicalTransactionChain::TransactionBatchAppended {
            _batchIndex: U256::from(7),
            _batchRoot: B256::repeat_byte(0x11),
            _batchSize: U256::from(4),
            _prevTotalElements: U256::from(100),
            _extraData: bytes!("beef"),
        }
    }

    #[test]
    fn test_topic_is_shared() {
        assert_eq!(
            ICanonicalTransactionChain::TransactionBatchAppended::SIGNATURE_HASH,
            IOVMCanonicalTransactionChain::TransactionBatchAppended::SIGNATURE_HASH
        );
    }

    #[test]
    fn test_indexed_log_to_commit_event() {
        let log = rpc_log(indexed_event().encode_log_data());
        let event = commit_event_from_log(&log).unwrap();
        assert_eq!(
            event,
            CommitEvent {
                batch_index: 7,
                batch_root: B256::repeat_byte(0x11),
                batch_size: 4,
                prev_total_elements: 100,
                extra_data: bytes!("beef"),
                source_tx_hash: TX_HASH,
                block_number: 12_000_000,
            }
        );
    }

    #[test]
    fn test_legacy_log_to_commit_event() {
        let legacy = IOVMCanonicalTransactionChain::TransactionBatchAppended {
            _batchIndex: U256::from(7),
            _batchRoot: B256::repeat_byte(0x11),
            _batchSize: U256::from(4),
            _prevTotalElements: U256::from(100),
            _extraData: bytes!("beef"),
        };
        let log = rpc_log(legacy.encode_log_data());
        assert_eq!(log.topics().len(), 1);

        let event = commit_event_from_log(&log).unwrap();
        assert_eq!(event.element_range(), 100..104);
        assert_eq!(event.batch_index, 7);
    }

    #[test]
    fn test_missing_tx_hash_is_invalid() {
        let mut log = rpc_log(indexed_event().encode_log_data());
        log.transaction_hash = None;
        assert!(matches!(commit_event_from_log(&log), Err(RpcError::InvalidResponse(_))));
    }

    #[test]
    fn test_u64_overflow_is_invalid() {
        let mut event = indexed_event();
        event._batchSize = U256::from(u64::MAX) + U256::from(1);
        let log = rpc_log(event.encode_log_data());
        let err = commit_event_from_log(&log).unwrap_err();
        assert_eq!(err.to_string(), "Invalid response: batchSize overflows u64");
    }

    #[test]
    fn test_truncated_data_is_invalid() {
        let data = indexed_event().encode_log_data();
        let truncated =
            alloy_primitives::LogData::new_unchecked(data.topics().to_vec(), Bytes::new());
        assert!(matches!(
            commit_event_from_log(&rpc_log(truncated)),
            Err(RpcError::InvalidResponse(_))
        ));
    }
}
