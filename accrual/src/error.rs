//! Accrual-specific errors.

use accrue_types::PoolId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccrualError {
    #[error("arithmetic overflow in accrual computation")]
    Overflow,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient stake: need {needed}, staked {available}")]
    InsufficientStake { needed: u128, available: u128 },

    #[error("multiplier cap {0} is below 1.0 (1_000_000)")]
    InvalidMultiplier(u128),

    #[error("time threshold must be non-zero")]
    InvalidTimeThreshold,

    #[error("{0} does not exist")]
    UnknownPool(PoolId),

    #[error("{0} is inactive")]
    PoolInactive(PoolId),

    #[error("pool registry is full")]
    RegistryFull,
}
