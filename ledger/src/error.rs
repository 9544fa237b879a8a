use accrue_accrual::AccrualError;
use accrue_oracle::EscrowError;
use accrue_types::{AccountId, PoolId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(AccountId),

    #[error("insufficient amount: {0}")]
    InsufficientAmount(u128),

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient stake: need {needed}, staked {available}")]
    InsufficientStake { needed: u128, available: u128 },

    #[error("yearly rate {rate} bps outside [{min}, {max}]")]
    InvalidYearlyRate { rate: u32, min: u32, max: u32 },

    #[error("invalid cooldown period: {0}s")]
    InvalidCooldownPeriod(u64),

    #[error("multiplier cap {0} is below 1.0 (1_000_000)")]
    InvalidMultiplier(u128),

    #[error("invalid time threshold: {0}s")]
    InvalidTimeThreshold(u64),

    #[error("{0} does not exist")]
    UnknownPool(PoolId),

    #[error("{0} is inactive")]
    PoolInactive(PoolId),

    #[error("pool registry is full")]
    TooManyPools,

    #[error("{caller} is not allowed to {action}")]
    Unauthorized {
        caller: AccountId,
        action: &'static str,
    },

    #[error("{account} was last settled at {latest}, cannot apply an operation at {now}")]
    StaleTimestamp {
        account: AccountId,
        now: Timestamp,
        latest: Timestamp,
    },

    #[error("invalid ledger parameters: {0}")]
    InvalidParams(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("escrow error: {0}")]
    Escrow(#[from] EscrowError),

    #[error("storage error: {0}")]
    Store(#[from] accrue_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<AccrualError> for LedgerError {
    fn from(err: AccrualError) -> Self {
        match err {
            AccrualError::Overflow => LedgerError::Overflow,
            AccrualError::ZeroAmount => LedgerError::InsufficientAmount(0),
            AccrualError::InsufficientBalance { needed, available } => {
                LedgerError::InsufficientBalance { needed, available }
            }
            AccrualError::InsufficientStake { needed, available } => {
                LedgerError::InsufficientStake { needed, available }
            }
            AccrualError::InvalidMultiplier(max) => LedgerError::InvalidMultiplier(max),
            AccrualError::InvalidTimeThreshold => LedgerError::InvalidTimeThreshold(0),
            AccrualError::UnknownPool(id) => LedgerError::UnknownPool(id),
            AccrualError::PoolInactive(id) => LedgerError::PoolInactive(id),
            AccrualError::RegistryFull => LedgerError::TooManyPools,
        }
    }
}

impl From<bincode::Error> for LedgerError {
    fn from(err: bincode::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
