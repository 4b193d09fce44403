//! Error types for batch decoding and Merkle tree operations.

/// An error decoding or encoding packed `appendSequencerBatch()` calldata.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CallDataError {
    /// The calldata is shorter than the fixed selector + header region.
    #[error("Calldata too short for batch header: expected at least {expected} bytes, got {actual}")]
    HeaderTooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes present.
        actual: usize,
    },
    /// The declared context table does not fit in the calldata.
    #[error("Context table of {num_contexts} entries overruns calldata of {len} bytes")]
    ContextTableOverrun {
        /// Declared number of contexts.
        num_contexts: u64,
        /// Calldata length.
        len: usize,
    },
    /// A transaction length prefix or payload runs past the end of the calldata.
    #[error("Transaction {tx_index} at offset {offset} needs {needed} bytes, only {remaining} remain")]
    PayloadOverrun {
        /// Batch-local index of the transaction being read.
        tx_index: usize,
        /// Cursor position at which the read started.
        offset: usize,
        /// Bytes needed to complete the read.
        needed: usize,
        /// Bytes remaining in the buffer.
        remaining: usize,
    },
    /// Bytes remain after the last declared transaction payload.
    #[error("{0} trailing bytes after the last transaction payload")]
    TrailingBytes(usize),
    /// The contexts declare a different number of sequenced transactions than the header.
    #[error("Header declares {declared} elements but contexts sequence {sequenced}")]
    ElementCountMismatch {
        /// `totalElementsToAppend` from the header.
        declared: u64,
        /// Sum of `numSequencedTransactions` over all contexts.
        sequenced: u64,
    },
    /// A value does not fit in its fixed-width field when encoding.
    #[error("Value {value} does not fit in {width}-byte field {field}")]
    FieldOverflow {
        /// Name of the field.
        field: &'static str,
        /// Field width in bytes.
        width: usize,
        /// The offending value.
        value: u64,
    },
}

/// An error building or querying a Merkle tree.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    /// The tree was given no leaves.
    #[error("Cannot build a Merkle tree without leaves")]
    EmptyLeaves,
    /// The leaf count is not a power of two.
    #[error("Leaf count {0} is not a power of two")]
    NotPowerOfTwo(usize),
    /// The requested leaf index is outside the tree.
    #[error("Leaf index {index} out of range for tree with {leaves} leaves")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree, padding included.
        leaves: usize,
    },
}
