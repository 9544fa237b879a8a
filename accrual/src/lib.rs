//! Accrual engine: the time-weighted accounting behind the yield ledger.
//!
//! Every balance (spendable or staked) carries an open accrual window and a
//! running `balance × seconds` accumulator. Rewards are a pure function of the
//! window's average balance, its length and the yearly rate:
//! `reward = avg × window × rate_bps / (10_000 × 31_536_000)`
//!
//! This crate handles:
//! - Per-account base accrual (`AccountBalance`)
//! - Per-(pool, account) staking accrual with the cubic duration multiplier (`UserStake`)
//! - The append-only pool registry and the active staker set
//! - Widening fixed-point arithmetic so reward math never overflows silently
//!
//! Nothing here touches the supply cap, the cooldown or the oracle; those are
//! composed on top by `accrue-ledger`.

pub mod balance;
pub mod curve;
pub mod error;
pub mod math;
pub mod period;
pub mod pool;
pub mod stake;
pub mod stakers;

pub use balance::AccountBalance;
pub use curve::multiplier;
pub use error::AccrualError;
pub use math::mul_div;
pub use period::{AccrualPeriod, Advance};
pub use pool::{PoolRegistry, StakingPool};
pub use stake::UserStake;
pub use stakers::ActiveStakers;
