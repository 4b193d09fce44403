mod canonical_transaction_chain;
pub use canonical_transaction_chain::*;

mod execution_manager;
pub use execution_manager::*;
