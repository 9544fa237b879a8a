//! LMDB storage backend for the accrue yield ledger.
//!
//! Implements [`accrue_store::LedgerStore`] using the `heed` LMDB bindings.
//! Accounts, stakes and metadata each live in their own named database
//! inside a single environment.

pub mod environment;
pub mod error;
pub mod ledger;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedgerStore;
