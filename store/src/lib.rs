//! Abstract storage traits for the accrue yield ledger.
//!
//! Every storage backend (in-memory for testing, embedded KV in production)
//! implements these traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod ledger;

pub use error::StoreError;
pub use ledger::LedgerStore;
