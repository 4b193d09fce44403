//! The locate, decode, rebuild and prove pipeline.

use std::sync::Arc;

use ctc_primitives::{
    BatchHeader, CallDataError, ChainElement, CommitEvent, Hasher, Keccak256Hasher, MerkleProof,
    MerkleTree, SequencerBatch, TransactionRecord, leaf_preimage,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    BatchLocator, CommitEventSource, GasLimitSource, ProverError, ProverResult,
    TransactionInputSource,
};

/// Everything a verifier needs to check that a transaction belongs to a committed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// The reconstructed transaction.
    pub transaction: TransactionRecord,
    /// The chain element the transaction was committed as.
    pub transaction_chain_element: ChainElement,
    /// Header of the batch containing the transaction.
    pub batch_header: BatchHeader,
    /// Sibling path from the transaction leaf to the batch root.
    pub proof: MerkleProof,
}

impl InclusionProof {
    /// Checks the proof against the batch root in the header.
    pub fn verify(&self) -> bool {
        let leaf = Keccak256Hasher.hash(&leaf_preimage(&self.transaction));
        self.proof.verify(leaf, self.batch_header.batch_root)
    }
}

/// Produces [`InclusionProof`]s for global transaction indices.
#[derive(Debug)]
pub struct BatchProver<E: ?Sized, T: ?Sized, G: ?Sized> {
    locator: BatchLocator<E>,
    transactions: Arc<T>,
    gas_limit: Arc<G>,
}

impl<E, T, G> BatchProver<E, T, G>
where
    E: CommitEventSource + ?Sized,
    T: TransactionInputSource + ?Sized,
    G: GasLimitSource + ?Sized,
{
    /// Creates a prover from its collaborators.
    pub const fn new(locator: BatchLocator<E>, transactions: Arc<T>, gas_limit: Arc<G>) -> Self {
        Self { locator, transactions, gas_limit }
    }

    /// Returns the batch locator.
    pub const fn locator(&self) -> &BatchLocator<E> {
        &self.locator
    }

    /// Proves inclusion of the transaction at `global_index`.
    pub async fn prove(&self, global_index: u64) -> ProverResult<InclusionProof> {
        let head = self.locator.source().block_number().await?;
        debug!(global_index, head, "Starting batch search");

        let event = self.locator.locate(global_index, head).await?;
        let calldata = self.transactions.transaction_input(event.source_tx_hash).await?;
        let gas_limit = self.gas_limit.max_transaction_gas_limit().await?;

        let proof = build_inclusion_proof(&event, &calldata, gas_limit, global_index)?;
        info!(
            global_index,
            batch_index = event.batch_index,
            local_index = proof.proof.index,
            siblings = proof.proof.siblings.len(),
            root = %event.batch_root,
            "Built inclusion proof"
        );
        Ok(proof)
    }
}

/// Decodes the batch committed by `event` and proves the element at `global_index`.
///
/// The decoded batch must hold exactly `event.batch_size` sequenced transactions and rebuild to
/// `event.batch_root`.
pub fn build_inclusion_proof(
    event: &CommitEvent,
    calldata: &[u8],
    gas_limit: u64,
    global_index: u64,
) -> ProverResult<InclusionProof> {
    let batch = SequencerBatch::decode(calldata)?;
    let mut records = batch.records(gas_limit);
    debug!(
        contexts = batch.contexts.len(),
        transactions = records.len(),
        should_start_at_batch = batch.should_start_at_batch,
        "Decoded sequencer batch"
    );

    if records.len() as u64 != event.batch_size {
        return Err(CallDataError::ElementCountMismatch {
            declared: event.batch_size,
            sequenced: records.len() as u64,
        }
        .into());
    }

    let local_index = event.local_index(global_index).ok_or(ProverError::IndexOutOfRange {
        index: global_index.saturating_sub(event.prev_total_elements),
        size: event.batch_size,
    })?;

    let tree = MerkleTree::from_records(&records);
    if tree.root() != event.batch_root {
        return Err(ProverError::RootMismatch { expected: event.batch_root, computed: tree.root() });
    }

    let proof = tree
        .proof(local_index as usize)
        .map_err(|_| ProverError::IndexOutOfRange { index: local_index, size: event.batch_size })?;

    let transaction = records.swap_remove(local_index as usize);
    Ok(InclusionProof {
        transaction_chain_element: transaction.chain_element(),
        transaction,
        batch_header: event.header(),
        proof,
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use alloy_primitives::{B256, b256};
    use ctc_primitives::SEQUENCER_ENTRYPOINT;

    use super::*;
    use crate::{
        FixedGasLimit, RpcError,
        test_utils::{MockEventSource, MockTransactionSource, commit_event_for, sample_batch},
    };

    const TX_HASH: B256 = b256!("00000000000000000000000000000000000000000000000000000000000000aa");

    fn fixture() -> (SequencerBatch, CommitEvent) {
        let batch = sample_batch(&[(1_620_000_000, 12_000_000, 3), (1_620_000_015, 12_000_001, 2)]);
        let event = commit_event_for(&batch, 9, 500, 1000, TX_HASH);
        (batch, event)
    }

    #[test]
    fn test_build_proof_for_every_element() {
        let (batch, event) = fixture();
        let calldata = batch.encode().unwrap();

        for global_index in event.element_range() {
            let proof = build_inclusion_proof(&event, &calldata, 9_000_000, global_index).unwrap();
            assert!(proof.verify());
            assert_eq!(proof.proof.index, global_index - 500);
            // Five transactions pad to eight leaves.
            assert_eq!(proof.proof.siblings.len(), 3);
            assert_eq!(proof.transaction.gas_limit, 9_000_000);
            assert_eq!(proof.transaction.entrypoint, SEQUENCER_ENTRYPOINT);
            assert_eq!(proof.batch_header, event.header());
        }
    }

    #[test]
    fn test_context_metadata_follows_owning_context() {
        let (batch, event) = fixture();
        let calldata = batch.encode().unwrap();

        let third = build_inclusion_proof(&event, &calldata, 0, 502).unwrap();
        let fourth = build_inclusion_proof(&event, &calldata, 0, 503).unwrap();
        assert_eq!(third.transaction.block_number, 12_000_000);
        assert_eq!(fourth.transaction.block_number, 12_000_001);
        assert_eq!(fourth.transaction_chain_element.timestamp, 1_620_000_015);
        assert_eq!(fourth.transaction_chain_element.tx_data, fourth.transaction.data);
    }

    #[test]
    fn test_root_mismatch() {
        let (batch, mut event) = fixture();
        let computed = event.batch_root;
        event.batch_root = B256::repeat_byte(0xee);

        let err = build_inclusion_proof(&event, &batch.encode().unwrap(), 0, 501).unwrap_err();
        assert!(matches!(
            err,
            ProverError::RootMismatch { expected, computed: c }
                if expected == B256::repeat_byte(0xee) && c == computed
        ));
    }

    #[test]
    fn test_batch_size_mismatch_is_malformed() {
        let (batch, mut event) = fixture();
        event.batch_size = 6;

        let err = build_inclusion_proof(&event, &batch.encode().unwrap(), 0, 501).unwrap_err();
        assert!(matches!(
            err,
            ProverError::MalformedCallData(CallDataError::ElementCountMismatch {
                declared: 6,
                sequenced: 5
            })
        ));
    }

    #[test]
    fn test_index_outside_batch() {
        let (batch, event) = fixture();
        let calldata = batch.encode().unwrap();

        assert!(matches!(
            build_inclusion_proof(&event, &calldata, 0, 505),
            Err(ProverError::IndexOutOfRange { index: 5, size: 5 })
        ));
        assert!(matches!(
            build_inclusion_proof(&event, &calldata, 0, 10),
            Err(ProverError::IndexOutOfRange { index: 0, size: 5 })
        ));
    }

    #[test]
    fn test_truncated_calldata_is_malformed() {
        let (batch, event) = fixture();
        let mut calldata = batch.encode().unwrap();
        calldata.pop();

        assert!(matches!(
            build_inclusion_proof(&event, &calldata, 0, 501),
            Err(ProverError::MalformedCallData(CallDataError::PayloadOverrun { .. }))
        ));
    }

    #[test]
    fn test_inclusion_proof_json_field_names() {
        let (batch, event) = fixture();
        let proof = build_inclusion_proof(&event, &batch.encode().unwrap(), 0, 500).unwrap();

        let json = serde_json::to_value(&proof).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        for key in ["transaction", "transactionChainElement", "batchHeader", "proof"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(serde_json::from_value::<InclusionProof>(json).unwrap(), proof);
    }

    #[tokio::test]
    async fn test_prove_uses_collaborators() {
        let (batch, event) = fixture();
        let events = Arc::new(MockEventSource::new(5000).with_event(event.clone()));
        let transactions =
            Arc::new(MockTransactionSource::default().with_input(TX_HASH, batch.encode().unwrap()));
        let locator = BatchLocator::new(events, NonZeroU64::new(250).unwrap(), 0);
        let prover = BatchProver::new(locator, transactions, Arc::new(FixedGasLimit(15_000_000)));

        let proof = prover.prove(503).await.unwrap();
        assert!(proof.verify());
        assert_eq!(proof.transaction.gas_limit, 15_000_000);
        assert_eq!(proof.batch_header.batch_index, 9);
    }

    #[tokio::test]
    async fn test_prove_missing_transaction() {
        let (_, event) = fixture();
        let events = Arc::new(MockEventSource::new(5000).with_event(event));
        let locator = BatchLocator::new(events, NonZeroU64::new(250).unwrap(), 0);
        let prover = BatchProver::new(
            locator,
            Arc::new(MockTransactionSource::default()),
            Arc::new(FixedGasLimit(0)),
        );

        assert!(matches!(
            prover.prove(500).await,
            Err(ProverError::SourceUnavailable(RpcError::TransactionNotFound(_)))
        ));
    }
}
