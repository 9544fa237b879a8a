//! Nullable price oracle: fixed reserves, switchable failure.

use accrue_oracle::{OracleError, PriceOracle};
use accrue_types::{LpTokenId, TokenId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Reserves {
    reserve_a: u128,
    reserve_b: u128,
    total_supply: u128,
}

/// A price oracle for testing.
///
/// Every pool prices the ledger's token on the `reserve_a` side. Unknown
/// pools fall back to a default ratio. Failure can be toggled to exercise
/// the ledger's oracle-outage path.
#[derive(Debug)]
pub struct NullOracle {
    base_token: TokenId,
    default: Mutex<Reserves>,
    pools: Mutex<HashMap<LpTokenId, Reserves>>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

impl NullOracle {
    /// Every pool backs one LP unit with `reserve / total_supply` of `base_token`.
    pub fn new(base_token: TokenId, reserve: u128, total_supply: u128) -> Self {
        Self {
            base_token,
            default: Mutex::new(Reserves {
                reserve_a: reserve,
                reserve_b: reserve,
                total_supply,
            }),
            pools: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    /// Override the reserves for one pool.
    pub fn set_pool(&self, lp_token: LpTokenId, reserve: u128, total_supply: u128) {
        self.pools.lock().unwrap().insert(
            lp_token,
            Reserves {
                reserve_a: reserve,
                reserve_b: reserve,
                total_supply,
            },
        );
    }

    /// Change the fallback reserves used by pools without an override.
    pub fn set_default(&self, reserve: u128, total_supply: u128) {
        *self.default.lock().unwrap() = Reserves {
            reserve_a: reserve,
            reserve_b: reserve,
            total_supply,
        };
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of reserve reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn lookup(&self, lp_token: &LpTokenId) -> Result<Reserves, OracleError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OracleError::Unavailable("null oracle set to fail".into()));
        }
        let pools = self.pools.lock().unwrap();
        Ok(pools
            .get(lp_token)
            .copied()
            .unwrap_or_else(|| *self.default.lock().unwrap()))
    }
}

impl PriceOracle for NullOracle {
    fn reserves(&self, lp_token: &LpTokenId) -> Result<(u128, u128), OracleError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let r = self.lookup(lp_token)?;
        Ok((r.reserve_a, r.reserve_b))
    }

    fn base_token(&self, lp_token: &LpTokenId) -> Result<TokenId, OracleError> {
        self.lookup(lp_token)?;
        Ok(self.base_token.clone())
    }

    fn pool_total_supply(&self, lp_token: &LpTokenId) -> Result<u128, OracleError> {
        Ok(self.lookup(lp_token)?.total_supply)
    }

    fn name(&self) -> &str {
        "null-oracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_default() {
        let oracle = NullOracle::new(TokenId::new("ACR"), 1, 2);
        let lp = LpTokenId::new("lp");
        assert_eq!(oracle.pool_total_supply(&lp).unwrap(), 2);

        oracle.set_pool(lp.clone(), 5, 10);
        assert_eq!(oracle.reserves(&lp).unwrap(), (5, 5));
        assert_eq!(oracle.pool_total_supply(&lp).unwrap(), 10);
        assert_eq!(oracle.reads(), 1);
    }

    #[test]
    fn failing_oracle_errors() {
        let oracle = NullOracle::new(TokenId::new("ACR"), 1, 2);
        oracle.set_failing(true);
        assert!(oracle.reserves(&LpTokenId::new("lp")).is_err());
        oracle.set_failing(false);
        assert!(oracle.reserves(&LpTokenId::new("lp")).is_ok());
    }
}
