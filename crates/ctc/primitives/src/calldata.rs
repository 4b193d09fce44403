//! Packed `appendSequencerBatch()` calldata.
//!
//! The sequencer submits batches without ABI encoding. After the 4-byte selector the calldata
//! is laid out as:
//!
//! ```text
//! shouldStartAtBatch      5 bytes
//! totalElementsToAppend   3 bytes
//! numContexts             3 bytes
//! contexts                numContexts * 16 bytes
//!   numSequencedTransactions        3 bytes
//!   numSubsequentQueueTransactions  3 bytes
//!   timestamp                       5 bytes
//!   blockNumber                     5 bytes
//! transactions            repeated (length: 3 bytes ++ payload: length bytes)
//! ```
//!
//! All integers are big-endian and unsigned. Transactions are consumed in order with a single
//! cursor shared by every context; context `i` owns the next `numSequencedTransactions`
//! payloads.

use alloy_primitives::Bytes;
use alloy_sol_types::{SolCall, sol};

use crate::{CallDataError, SequencerContext, TransactionRecord};

sol! {
    /// `CanonicalTransactionChain.appendSequencerBatch()`. Arguments follow the selector packed.
    function appendSequencerBatch() external;
}

/// Length of the function selector.
pub const SELECTOR_LEN: usize = 4;

/// Width of `shouldStartAtBatch`.
pub const START_AT_BATCH_LEN: usize = 5;

/// Width of `totalElementsToAppend`.
pub const TOTAL_ELEMENTS_LEN: usize = 3;

/// Width of `numContexts`.
pub const NUM_CONTEXTS_LEN: usize = 3;

/// Selector plus fixed header.
pub const HEADER_LEN: usize =
    SELECTOR_LEN + START_AT_BATCH_LEN + TOTAL_ELEMENTS_LEN + NUM_CONTEXTS_LEN;

/// Width of one context record.
pub const CONTEXT_LEN: usize = 16;

/// Width of the length prefix in front of each transaction payload.
pub const TX_LENGTH_PREFIX_LEN: usize = 3;

const CONTEXT_COUNT_LEN: usize = 3;
const CONTEXT_TIMESTAMP_LEN: usize = 5;
const CONTEXT_BLOCK_NUMBER_LEN: usize = 5;

/// A decoded sequencer batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerBatch {
    /// Batch index the submitter expected to append at.
    pub should_start_at_batch: u64,
    /// Number of elements the batch appends.
    pub total_elements_to_append: u64,
    /// Context records, in order.
    pub contexts: Vec<SequencerContext>,
    /// Transaction payloads, in stream order.
    pub transactions: Vec<Bytes>,
}

impl SequencerBatch {
    /// Creates an empty batch that expects to start at `should_start_at_batch`.
    pub const fn new(should_start_at_batch: u64) -> Self {
        Self {
            should_start_at_batch,
            total_elements_to_append: 0,
            contexts: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Appends a context owning `transactions`, keeping the element count in sync.
    pub fn push_context(
        &mut self,
        timestamp: u64,
        block_number: u64,
        num_subsequent_queue_transactions: u64,
        transactions: impl IntoIterator<Item = Bytes>,
    ) -> &mut Self {
        let before = self.transactions.len();
        self.transactions.extend(transactions);
        let added = (self.transactions.len() - before) as u64;

        self.contexts.push(SequencerContext {
            num_sequenced_transactions: added,
            num_subsequent_queue_transactions,
            timestamp,
            block_number,
        });
        self.total_elements_to_append += added;
        self
    }

    /// Decodes packed calldata.
    ///
    /// The whole buffer must be consumed: trailing bytes, overruns and a header/context element
    /// count mismatch are all rejected.
    pub fn decode(calldata: &[u8]) -> Result<Self, CallDataError> {
        if calldata.len() < HEADER_LEN {
            return Err(CallDataError::HeaderTooShort {
                expected: HEADER_LEN,
                actual: calldata.len(),
            });
        }

        let mut reader = CallDataReader::new(&calldata[SELECTOR_LEN..HEADER_LEN]);
        let should_start_at_batch = reader.read_uint(START_AT_BATCH_LEN);
        let total_elements_to_append = reader.read_uint(TOTAL_ELEMENTS_LEN);
        let num_contexts = reader.read_uint(NUM_CONTEXTS_LEN);

        let body = &calldata[HEADER_LEN..];
        let table_len = usize::try_from(num_contexts)
            .ok()
            .and_then(|n| n.checked_mul(CONTEXT_LEN))
            .filter(|len| *len <= body.len())
            .ok_or(CallDataError::ContextTableOverrun { num_contexts, len: calldata.len() })?;

        let contexts: Vec<SequencerContext> = body[..table_len]
            .chunks_exact(CONTEXT_LEN)
            .map(|record| {
                let mut reader = CallDataReader::new(record);
                SequencerContext {
                    num_sequenced_transactions: reader.read_uint(CONTEXT_COUNT_LEN),
                    num_subsequent_queue_transactions: reader.read_uint(CONTEXT_COUNT_LEN),
                    timestamp: reader.read_uint(CONTEXT_TIMESTAMP_LEN),
                    block_number: reader.read_uint(CONTEXT_BLOCK_NUMBER_LEN),
                }
            })
            .collect();

        let sequenced = contexts
            .iter()
            .fold(0u64, |acc, ctx| acc.saturating_add(ctx.num_sequenced_transactions));
        if sequenced != total_elements_to_append {
            return Err(CallDataError::ElementCountMismatch {
                declared: total_elements_to_append,
                sequenced,
            });
        }

        let stream = &body[table_len..];
        let mut reader = CallDataReader::new(stream);
        // Every payload costs at least its length prefix.
        let capacity = (sequenced as usize).min(stream.len() / TX_LENGTH_PREFIX_LEN);
        let mut transactions = Vec::with_capacity(capacity);

        for tx_index in 0..sequenced as usize {
            let start = HEADER_LEN + table_len + reader.offset();
            let overrun = |needed: usize, remaining: usize| CallDataError::PayloadOverrun {
                tx_index,
                offset: start,
                needed,
                remaining,
            };

            let remaining = reader.remaining();
            let len = reader
                .try_read_uint(TX_LENGTH_PREFIX_LEN)
                .ok_or_else(|| overrun(TX_LENGTH_PREFIX_LEN, remaining))? as usize;
            let remaining = reader.remaining();
            let payload = reader.read_bytes(len).ok_or_else(|| overrun(len, remaining))?;
            transactions.push(Bytes::copy_from_slice(payload));
        }

        if reader.remaining() != 0 {
            return Err(CallDataError::TrailingBytes(reader.remaining()));
        }

        Ok(Self { should_start_at_batch, total_elements_to_append, contexts, transactions })
    }

    /// Encodes the batch into packed calldata, selector included.
    pub fn encode(&self) -> Result<Vec<u8>, CallDataError> {
        let payload_len: usize =
            self.transactions.iter().map(|tx| TX_LENGTH_PREFIX_LEN + tx.len()).sum();
        let mut out =
            Vec::with_capacity(HEADER_LEN + self.contexts.len() * CONTEXT_LEN + payload_len);

        out.extend_from_slice(&appendSequencerBatchCall::SELECTOR);
        write_uint(&mut out, "shouldStartAtBatch", START_AT_BATCH_LEN, self.should_start_at_batch)?;
        write_uint(
            &mut out,
            "totalElementsToAppend",
            TOTAL_ELEMENTS_LEN,
            self.total_elements_to_append,
        )?;
        write_uint(&mut out, "numContexts", NUM_CONTEXTS_LEN, self.contexts.len() as u64)?;

        for ctx in &self.contexts {
            write_uint(
                &mut out,
                "numSequencedTransactions",
                CONTEXT_COUNT_LEN,
                ctx.num_sequenced_transactions,
            )?;
            write_uint(
                &mut out,
                "numSubsequentQueueTransactions",
                CONTEXT_COUNT_LEN,
                ctx.num_subsequent_queue_transactions,
            )?;
            write_uint(&mut out, "ctxTimestamp", CONTEXT_TIMESTAMP_LEN, ctx.timestamp)?;
            write_uint(&mut out, "ctxBlockNumber", CONTEXT_BLOCK_NUMBER_LEN, ctx.block_number)?;
        }

        for tx in &self.transactions {
            write_uint(&mut out, "txDataLength", TX_LENGTH_PREFIX_LEN, tx.len() as u64)?;
            out.extend_from_slice(tx);
        }

        Ok(out)
    }

    /// Pairs every transaction with the context that owns it, in stream order.
    pub fn records(&self, gas_limit: u64) -> Vec<TransactionRecord> {
        self.contexts
            .iter()
            .flat_map(|ctx| core::iter::repeat_n(ctx, ctx.num_sequenced_transactions as usize))
            .zip(&self.transactions)
            .map(|(ctx, tx)| TransactionRecord::sequenced(ctx, gas_limit, tx.clone()))
            .collect()
    }
}

/// Bounds-checked cursor over fixed-width big-endian fields.
#[derive(Debug)]
struct CallDataReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> CallDataReader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    const fn offset(&self) -> usize {
        self.offset
    }

    const fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len).filter(|end| *end <= self.data.len())?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Some(bytes)
    }

    /// Reads a `width`-byte unsigned integer, `width <= 8`.
    fn try_read_uint(&mut self, width: usize) -> Option<u64> {
        debug_assert!(width <= 8);
        self.read_bytes(width).map(be_uint)
    }

    /// Reads a field whose presence the caller has already checked against the buffer length.
    /// A short read yields zero, never a panic.
    fn read_uint(&mut self, width: usize) -> u64 {
        self.try_read_uint(width).unwrap_or_default()
    }
}

fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn write_uint(
    out: &mut Vec<u8>,
    field: &'static str,
    width: usize,
    value: u64,
) -> Result<(), CallDataError> {
    if width < 8 && value >> (8 * width) != 0 {
        return Err(CallDataError::FieldOverflow { field, width, value });
    }
    out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{bytes, hex};
    use rstest::rstest;

    use super::*;

    fn two_context_batch() -> SequencerBatch {
        let mut batch = SequencerBatch::new(42);
        batch
            .push_context(1_620_000_000, 12_000_000, 0, [bytes!("aa"), bytes!("bbbb")])
            .push_context(1_620_000_015, 12_000_001, 3, [bytes!("cccccc")]);
        batch
    }

    #[test]
    fn test_selector_matches_signature() {
        let expected = alloy_primitives::keccak256("appendSequencerBatch()");
        assert_eq!(appendSequencerBatchCall::SELECTOR, expected[..4]);
    }

    #[test]
    fn test_encode_layout() {
        let mut batch = SequencerBatch::new(1);
        batch.push_context(0x0102030405, 0x0a0b0c0d0e, 2, [bytes!("ff")]);
        let encoded = batch.encode().unwrap();

        assert_eq!(&encoded[..4], &appendSequencerBatchCall::SELECTOR);
        assert_eq!(
            &encoded[4..],
            hex!(
                "0000000001" // shouldStartAtBatch
                "000001"     // totalElementsToAppend
                "000001"     // numContexts
                "000001" "000002" "0102030405" "0a0b0c0d0e"
                "000001" "ff"
            )
        );
    }

    #[test]
    fn test_decode_reads_fixed_width_fields() {
        let mut calldata = vec![0xde, 0xad, 0xbe, 0xef];
        calldata.extend_from_slice(&hex!(
            "ffffffffff" // shouldStartAtBatch = 2^40 - 1
            "000003"
            "000002"
            "000002" "000000" "0000000010" "0000000020"
            "000001" "000007" "0000000011" "0000000021"
            "000000"
            "000002" "abcd"
            "000001" "ee"
        ));

        let batch = SequencerBatch::decode(&calldata).unwrap();
        assert_eq!(batch.should_start_at_batch, (1 << 40) - 1);
        assert_eq!(batch.total_elements_to_append, 3);
        assert_eq!(batch.contexts.len(), 2);
        assert_eq!(batch.contexts[1].num_subsequent_queue_transactions, 7);
        assert_eq!(batch.contexts[1].timestamp, 0x11);
        assert_eq!(batch.contexts[1].block_number, 0x21);
        assert_eq!(batch.transactions, vec![Bytes::new(), bytes!("abcd"), bytes!("ee")]);
    }

    #[test]
    fn test_decode_round_trips_encoded_batch() {
        let batch = two_context_batch();
        let decoded = SequencerBatch::decode(&batch.encode().unwrap()).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_records_take_context_of_owner() {
        let records = two_context_batch().records(9_000_000);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, 1_620_000_000);
        assert_eq!(records[1].block_number, 12_000_000);
        assert_eq!(records[1].data, bytes!("bbbb"));
        assert_eq!(records[2].timestamp, 1_620_000_015);
        assert_eq!(records[2].block_number, 12_000_001);
        assert!(records.iter().all(|r| r.gas_limit == 9_000_000));
    }

    #[test]
    fn test_empty_batch() {
        let batch = SequencerBatch::new(0);
        let decoded = SequencerBatch::decode(&batch.encode().unwrap()).unwrap();
        assert!(decoded.contexts.is_empty());
        assert!(decoded.records(1).is_empty());
    }

    #[rstest]
    #[case::empty(0)]
    #[case::selector_only(4)]
    #[case::one_short(14)]
    fn test_decode_header_too_short(#[case] len: usize) {
        assert_eq!(
            SequencerBatch::decode(&vec![0u8; len]),
            Err(CallDataError::HeaderTooShort { expected: HEADER_LEN, actual: len })
        );
    }

    #[test]
    fn test_decode_context_table_overrun() {
        let mut calldata = two_context_batch().encode().unwrap();
        // Claim far more contexts than the buffer holds.
        calldata[12..15].copy_from_slice(&[0xff, 0xff, 0xff]);
        assert!(matches!(
            SequencerBatch::decode(&calldata),
            Err(CallDataError::ContextTableOverrun { num_contexts: 0xff_ffff, .. })
        ));
    }

    #[test]
    fn test_decode_payload_overrun() {
        let mut calldata = two_context_batch().encode().unwrap();
        calldata.truncate(calldata.len() - 1);
        assert!(matches!(
            SequencerBatch::decode(&calldata),
            Err(CallDataError::PayloadOverrun { tx_index: 2, needed: 3, remaining: 2, .. })
        ));
    }

    #[test]
    fn test_decode_truncated_length_prefix() {
        let mut batch = SequencerBatch::new(0);
        batch.push_context(1, 1, 0, [bytes!("01")]);
        let mut calldata = batch.encode().unwrap();
        calldata.truncate(HEADER_LEN + CONTEXT_LEN + 2);
        assert!(matches!(
            SequencerBatch::decode(&calldata),
            Err(CallDataError::PayloadOverrun { tx_index: 0, needed: 3, remaining: 2, .. })
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut calldata = two_context_batch().encode().unwrap();
        calldata.extend_from_slice(&[0, 0]);
        assert_eq!(SequencerBatch::decode(&calldata), Err(CallDataError::TrailingBytes(2)));
    }

    #[test]
    fn test_decode_element_count_mismatch() {
        let mut batch = two_context_batch();
        batch.total_elements_to_append = 4;
        assert_eq!(
            SequencerBatch::decode(&batch.encode().unwrap()),
            Err(CallDataError::ElementCountMismatch { declared: 4, sequenced: 3 })
        );
    }

    #[test]
    fn test_decode_consumes_exactly() {
        let batch = two_context_batch();
        let calldata = batch.encode().unwrap();
        let accounted = HEADER_LEN
            + batch.contexts.len() * CONTEXT_LEN
            + batch.transactions.iter().map(|tx| TX_LENGTH_PREFIX_LEN + tx.len()).sum::<usize>();
        assert_eq!(accounted, calldata.len());
        assert!(SequencerBatch::decode(&calldata).is_ok());
    }

    #[rstest]
    #[case::start_at_batch(1 << 40, 0)]
    #[case::timestamp(0, 1 << 40)]
    fn test_encode_field_overflow(#[case] start: u64, #[case] timestamp: u64) {
        let mut batch = SequencerBatch::new(start);
        batch.push_context(timestamp, 0, 0, []);
        assert!(matches!(batch.encode(), Err(CallDataError::FieldOverflow { width: 5, .. })));
    }

    #[test]
    fn test_encode_payload_too_long() {
        let mut batch = SequencerBatch::new(0);
        batch.push_context(0, 0, 0, [Bytes::from(vec![0u8; 1 << 24])]);
        assert!(matches!(
            batch.encode(),
            Err(CallDataError::FieldOverflow { field: "txDataLength", .. })
        ));
    }
}
