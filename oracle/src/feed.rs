//! Static price feed: reserves supplied by configuration.

use crate::error::OracleError;
use crate::PriceOracle;
use accrue_types::{LpTokenId, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Snapshot of one liquidity pool's pricing state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolQuote {
    /// Token on the `reserve_a` side.
    pub base_token: TokenId,
    #[serde(with = "accrue_types::amount::decimal")]
    pub reserve_a: u128,
    #[serde(with = "accrue_types::amount::decimal")]
    pub reserve_b: u128,
    /// Total LP-token supply.
    #[serde(with = "accrue_types::amount::decimal")]
    pub total_supply: u128,
}

/// A price oracle whose quotes are set explicitly rather than fetched.
///
/// Used by the daemon (quotes come from the node config) and handy for
/// scenario tests. Quotes can be replaced at any time to simulate price moves.
#[derive(Debug, Default)]
pub struct StaticPriceFeed {
    quotes: RwLock<HashMap<LpTokenId, PoolQuote>>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quotes(quotes: impl IntoIterator<Item = (LpTokenId, PoolQuote)>) -> Self {
        Self {
            quotes: RwLock::new(quotes.into_iter().collect()),
        }
    }

    /// Insert or replace the quote for `lp_token`.
    pub fn set_quote(&self, lp_token: LpTokenId, quote: PoolQuote) {
        match self.quotes.write() {
            Ok(mut quotes) => {
                quotes.insert(lp_token, quote);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(lp_token, quote);
            }
        }
    }

    fn quote(&self, lp_token: &LpTokenId) -> Result<PoolQuote, OracleError> {
        let quotes = self
            .quotes
            .read()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        quotes
            .get(lp_token)
            .cloned()
            .ok_or_else(|| OracleError::UnknownPool(lp_token.clone()))
    }
}

impl PriceOracle for StaticPriceFeed {
    fn reserves(&self, lp_token: &LpTokenId) -> Result<(u128, u128), OracleError> {
        let q = self.quote(lp_token)?;
        Ok((q.reserve_a, q.reserve_b))
    }

    fn base_token(&self, lp_token: &LpTokenId) -> Result<TokenId, OracleError> {
        Ok(self.quote(lp_token)?.base_token)
    }

    fn pool_total_supply(&self, lp_token: &LpTokenId) -> Result<u128, OracleError> {
        Ok(self.quote(lp_token)?.total_supply)
    }

    fn name(&self) -> &str {
        "static-feed"
    }
}
