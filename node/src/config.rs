//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use accrue_oracle::PoolQuote;
use accrue_types::amount::decimal;
use accrue_types::{AccountId, LedgerParams, LpTokenId, TokenId, MULTIPLIER_SCALE, SECONDS_PER_DAY};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an accrue ledger node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Account allowed to change parameters, manage pools and mint.
    #[serde(default = "default_admin")]
    pub admin: AccountId,

    /// Accounts granted the minter role at startup.
    #[serde(default)]
    pub minters: Vec<AccountId>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON-lines command log to replay on startup.
    #[serde(default)]
    pub command_log: Option<PathBuf>,

    /// LMDB directory holding the ledger snapshot. When it already holds a
    /// saved ledger, that state is restored instead of bootstrapping from
    /// `ledger`, `minters` and `pools`.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    /// Rate, cooldown and supply parameters.
    #[serde(default)]
    pub ledger: LedgerParams,

    /// Staking pools registered at startup, in order. The first becomes
    /// pool 0.
    #[serde(default)]
    pub pools: Vec<PoolConfig>,

    /// Reserves served by the static price feed.
    #[serde(default)]
    pub quotes: Vec<QuoteConfig>,

    /// LP-token wallet balances the in-process escrow starts with.
    #[serde(default)]
    pub lp_wallets: Vec<WalletConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub lp_token: LpTokenId,
    /// Fixed point, 1_000_000 = 1.0x.
    #[serde(default = "default_multiplier_max", with = "decimal")]
    pub multiplier_max: u128,
    #[serde(default = "default_time_threshold_secs")]
    pub time_threshold_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub lp_token: LpTokenId,
    pub base_token: TokenId,
    #[serde(with = "decimal")]
    pub reserve_a: u128,
    #[serde(with = "decimal")]
    pub reserve_b: u128,
    #[serde(with = "decimal")]
    pub total_supply: u128,
}

impl QuoteConfig {
    pub fn to_quote(&self) -> PoolQuote {
        PoolQuote {
            base_token: self.base_token.clone(),
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            total_supply: self.total_supply,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub lp_token: LpTokenId,
    pub account: AccountId,
    #[serde(with = "decimal")]
    pub amount: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_admin() -> AccountId {
    AccountId::new("acct_admin")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_multiplier_max() -> u128 {
    2 * MULTIPLIER_SCALE
}

fn default_time_threshold_secs() -> u64 {
    365 * SECONDS_PER_DAY
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The configured log format. Unknown values fall back to human output.
    pub fn log_format(&self) -> LogFormat {
        self.log_format.parse().unwrap_or(LogFormat::Human)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            minters: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            command_log: None,
            snapshot_dir: None,
            ledger: LedgerParams::default(),
            pools: Vec::new(),
            quotes: Vec::new(),
            lp_wallets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.admin, config.admin);
        assert_eq!(parsed.ledger, config.ledger);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.admin, AccountId::new("acct_admin"));
        assert_eq!(config.ledger, LedgerParams::default());
        assert_eq!(config.log_format, "human");
        assert!(config.pools.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            admin = "acct_root"
            minters = ["acct_faucet"]

            [ledger]
            yearly_rate_bps = 500
            max_supply = "21_000_000_000000000000000000"

            [[pools]]
            lp_token = "ACR-USD"

            [[pools]]
            lp_token = "ACR-ETH"
            multiplier_max = "3000000"
            time_threshold_secs = 86400

            [[quotes]]
            lp_token = "ACR-USD"
            base_token = "ACR"
            reserve_a = "1000"
            reserve_b = "2000"
            total_supply = "500"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.admin, AccountId::new("acct_root"));
        assert_eq!(config.minters, vec![AccountId::new("acct_faucet")]);
        assert_eq!(config.ledger.yearly_rate_bps, 500);
        assert_eq!(config.ledger.max_supply, 21_000_000 * accrue_types::TOKEN_UNIT);
        assert_eq!(config.ledger.reward_cooldown_secs, SECONDS_PER_DAY); // default
        assert_eq!(config.pools[0].multiplier_max, 2_000_000);
        assert_eq!(config.pools[1].time_threshold_secs, 86_400);
        assert_eq!(config.quotes[0].to_quote().total_supply, 500);
    }

    #[test]
    fn invalid_account_is_a_config_error() {
        let err = NodeConfig::from_toml_str(r#"admin = "root""#).unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/accrue.toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }
}
