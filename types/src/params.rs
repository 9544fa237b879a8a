//! Ledger parameters and the fixed-point scales shared by the accrual math.
//!
//! Every field here is applied uniformly to all accounts; there is no
//! per-account rate or cooldown.

use crate::token::TokenId;
use serde::{Deserialize, Serialize};

/// Basis-point denominator: 10_000 bps = 100%.
pub const BPS_SCALE: u128 = 10_000;

/// Seconds in a (non-leap) year, the denominator of the yearly rate.
pub const SECONDS_PER_YEAR: u128 = 31_536_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed-point scale of staking multipliers: 1_000_000 = 1.0x.
pub const MULTIPLIER_SCALE: u128 = 1_000_000;

/// Smallest-unit count of one whole token (18 decimals).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Global ledger parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// The ledger's own yield token. Used to pick the matching reserve out of
    /// a liquidity pool's reserve pair.
    #[serde(default = "default_token")]
    pub token: TokenId,

    /// Annual reward rate in basis points (1000 = 10%/year).
    #[serde(default = "default_yearly_rate_bps")]
    pub yearly_rate_bps: u32,

    /// Lowest rate `set_yearly_rate` will accept.
    #[serde(default = "default_min_yearly_rate_bps")]
    pub min_yearly_rate_bps: u32,

    /// Highest rate `set_yearly_rate` will accept.
    #[serde(default = "default_max_yearly_rate_bps")]
    pub max_yearly_rate_bps: u32,

    /// Minimum seconds between two reward realizations for one account.
    #[serde(default = "default_reward_cooldown_secs")]
    pub reward_cooldown_secs: u64,

    /// Hard cap on minted supply, in smallest units.
    #[serde(default = "default_max_supply", with = "crate::amount::decimal")]
    pub max_supply: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_token() -> TokenId {
    TokenId::new("ACR")
}

fn default_yearly_rate_bps() -> u32 {
    1_000
}

fn default_min_yearly_rate_bps() -> u32 {
    1
}

fn default_max_yearly_rate_bps() -> u32 {
    10_000
}

fn default_reward_cooldown_secs() -> u64 {
    SECONDS_PER_DAY
}

fn default_max_supply() -> u128 {
    1_000_000_000 * TOKEN_UNIT
}

impl LedgerParams {
    /// Whether `rate_bps` lies inside the configured bounds (inclusive).
    pub fn rate_in_bounds(&self, rate_bps: u32) -> bool {
        rate_bps >= self.min_yearly_rate_bps && rate_bps <= self.max_yearly_rate_bps
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            token: default_token(),
            yearly_rate_bps: default_yearly_rate_bps(),
            min_yearly_rate_bps: default_min_yearly_rate_bps(),
            max_yearly_rate_bps: default_max_yearly_rate_bps(),
            reward_cooldown_secs: default_reward_cooldown_secs(),
            max_supply: default_max_supply(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_consistent() {
        let p = LedgerParams::default();
        assert!(p.rate_in_bounds(p.yearly_rate_bps));
        assert!(p.reward_cooldown_secs > 0);
        assert!(p.max_supply > 0);
    }

    #[test]
    fn rate_bounds_are_inclusive() {
        let p = LedgerParams {
            min_yearly_rate_bps: 100,
            max_yearly_rate_bps: 500,
            ..LedgerParams::default()
        };
        assert!(!p.rate_in_bounds(99));
        assert!(p.rate_in_bounds(100));
        assert!(p.rate_in_bounds(500));
        assert!(!p.rate_in_bounds(501));
    }
}
