//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Everything the ledger reaches outside itself for (time, the price oracle,
//! LP escrow, storage) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what was asked of them
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod escrow;
pub mod oracle;
pub mod store;

pub use clock::NullClock;
pub use escrow::{EscrowCall, NullEscrow};
pub use oracle::NullOracle;
pub use store::NullLedgerStore;
