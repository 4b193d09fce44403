#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod batch;
pub use batch::{
    BatchHeader, ChainElement, CommitEvent, SEQUENCER_ENTRYPOINT, SEQUENCER_QUEUE_ORIGIN,
    SequencerContext, TransactionRecord,
};

mod calldata;
pub use calldata::{
    CONTEXT_LEN, HEADER_LEN, NUM_CONTEXTS_LEN, SELECTOR_LEN, START_AT_BATCH_LEN, SequencerBatch,
    TOTAL_ELEMENTS_LEN, TX_LENGTH_PREFIX_LEN, appendSequencerBatchCall,
};

mod errors;
pub use errors::{CallDataError, MerkleError};

mod hasher;
pub use hasher::{Hasher, Keccak256Hasher};

mod leaf;
pub use leaf::{
    LEAF_PREIMAGE_OVERHEAD, SEQUENCER_LEAF_TAG, leaf_hashes, leaf_preimage, padded_leaf_count,
};

mod merkle;
pub use merkle::MerkleTree;

mod proof;
pub use proof::{MerkleProof, verify_proof};
