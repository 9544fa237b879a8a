use accrue_types::{AccountId, LpTokenId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no price feed for {0}")]
    UnknownPool(LpTokenId),

    #[error("price feed unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    #[error("{account} holds {available} of {lp_token}, needs {needed}")]
    InsufficientFunds {
        lp_token: LpTokenId,
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("escrow holds {available} of {lp_token}, cannot release {needed}")]
    InsufficientEscrow {
        lp_token: LpTokenId,
        needed: u128,
        available: u128,
    },

    #[error("arithmetic overflow in escrow book")]
    Overflow,

    #[error("escrow transfer rejected: {0}")]
    Rejected(String),
}
