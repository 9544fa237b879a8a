//! External collaborators of the yield ledger.
//!
//! The ledger never owns liquidity pools. It reads their reserves through a
//! [`PriceOracle`] and moves staked LP tokens through an [`LpEscrow`]. Both
//! are injected as trait objects so tests can swap in deterministic
//! implementations (see `accrue-nullables`).
//!
//! Two in-process implementations ship here:
//! - [`StaticPriceFeed`]: reserves configured up front, updatable at runtime
//! - [`EscrowBook`]: an in-memory LP custody ledger

pub mod error;
pub mod escrow;
pub mod feed;

pub use error::{EscrowError, OracleError};
pub use escrow::{EscrowBook, EscrowSnapshot};
pub use feed::{PoolQuote, StaticPriceFeed};

use accrue_types::{AccountId, LpTokenId, ReserveRatio, TokenId};

/// Read-only view of a liquidity pool's pricing state.
pub trait PriceOracle: Send + Sync {
    /// The pool's `(reserve_a, reserve_b)` pair.
    fn reserves(&self, lp_token: &LpTokenId) -> Result<(u128, u128), OracleError>;

    /// The token on the `reserve_a` side of the pair.
    fn base_token(&self, lp_token: &LpTokenId) -> Result<TokenId, OracleError>;

    /// Total supply of the pool's LP token.
    fn pool_total_supply(&self, lp_token: &LpTokenId) -> Result<u128, OracleError>;

    /// Human-readable name of this oracle.
    fn name(&self) -> &str;
}

/// Custody of staked LP tokens.
pub trait LpEscrow: Send + Sync {
    /// Pull `amount` of `lp_token` from `staker` into escrow.
    fn transfer_from(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError>;

    /// Release `amount` of `lp_token` from escrow back to `staker`.
    fn transfer(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError>;
}

/// How much of `token` backs one unit of `lp_token`.
///
/// Uses reserve A when `token` is the pool's base token and reserve B
/// otherwise. The pair is not checked for `token`, so a pool that does not
/// contain it is still priced from reserve B.
pub fn reserve_ratio(
    oracle: &dyn PriceOracle,
    lp_token: &LpTokenId,
    token: &TokenId,
) -> Result<ReserveRatio, OracleError> {
    let (reserve_a, reserve_b) = oracle.reserves(lp_token)?;
    let base = oracle.base_token(lp_token)?;
    let reserve = if &base == token { reserve_a } else { reserve_b };
    let lp_supply = oracle.pool_total_supply(lp_token)?;
    Ok(ReserveRatio::new(reserve, lp_supply))
}
