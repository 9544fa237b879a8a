//! Reserve ratio read from a liquidity pool.

use serde::{Deserialize, Serialize};

/// How many yield-token units back one LP-token unit, as an exact fraction
/// `reserve / lp_supply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveRatio {
    /// The pool's reserve of the ledger's own token.
    pub reserve: u128,
    /// Total LP-token supply of the pool.
    pub lp_supply: u128,
}

impl ReserveRatio {
    pub fn new(reserve: u128, lp_supply: u128) -> Self {
        Self { reserve, lp_supply }
    }

    /// A ratio that yields no staking reward.
    pub const ZERO: Self = Self {
        reserve: 0,
        lp_supply: 0,
    };

    /// Zero reserve or zero supply: the pool cannot be priced right now.
    pub fn is_degenerate(&self) -> bool {
        self.reserve == 0 || self.lp_supply == 0
    }
}
