//! Continuously-accruing yield ledger.
//!
//! An account's spendable balance grows at a global yearly rate. Accounts can
//! additionally stake LP tokens in registered pools and earn a boosted rate
//! that grows cubically with staking duration.
//!
//! Rewards are never stored. Each balance carries an accrual window, and the
//! reward over that window is recomputed on demand. Mutating calls settle the
//! touched accounts first: they mint pending rewards when the claim cooldown
//! has elapsed, and otherwise just advance the windows. Every mint is clamped
//! to the supply cap.

pub mod access;
pub mod error;
pub mod events;
pub mod ledger;
pub mod persist;
pub mod policy;
pub mod supply;
pub mod views;

pub use access::AccessPolicy;
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use ledger::Ledger;
pub use persist::SCHEMA_VERSION;
pub use supply::Supply;
pub use views::PendingRewards;
