//! Fundamental types for the accrue yield ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account and token identifiers, pool ids, timestamps and clocks, ledger parameters,
//! and the fixed-point scales used by the accrual math.

pub mod address;
pub mod amount;
pub mod params;
pub mod pool;
pub mod ratio;
pub mod time;
pub mod token;

pub use address::{AccountId, IdError};
pub use params::{
    LedgerParams, BPS_SCALE, MULTIPLIER_SCALE, SECONDS_PER_DAY, SECONDS_PER_YEAR, TOKEN_UNIT,
};
pub use pool::PoolId;
pub use ratio::ReserveRatio;
pub use time::{Clock, SystemClock, Timestamp};
pub use token::{LpTokenId, TokenId};
