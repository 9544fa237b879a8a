//! Ledger commands and the JSON-lines command log.
//!
//! Every mutation the node accepts is a [`LoggedCommand`]: who asked, what
//! they asked for and the instant it takes effect. Because the ledger takes
//! explicit timestamps, applying the same log to the same starting config
//! always yields the same state.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use accrue_types::amount::decimal;
use accrue_types::{AccountId, LpTokenId, PoolId, Timestamp};

use crate::NodeError;

/// One ledger mutation. The acting account comes from the enclosing
/// [`LoggedCommand`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Mint {
        to: AccountId,
        #[serde(with = "decimal")]
        amount: u128,
    },
    Burn {
        #[serde(with = "decimal")]
        amount: u128,
    },
    Transfer {
        to: AccountId,
        #[serde(with = "decimal")]
        amount: u128,
    },
    Claim,
    Stake {
        pool: PoolId,
        #[serde(with = "decimal")]
        amount: u128,
    },
    Unstake {
        pool: PoolId,
        #[serde(with = "decimal")]
        amount: u128,
    },
    SetYearlyRate {
        rate_bps: u32,
    },
    SetCooldownPeriod {
        secs: u64,
    },
    AddPool {
        lp_token: LpTokenId,
        #[serde(with = "decimal")]
        multiplier_max: u128,
        time_threshold: u64,
    },
    DisablePool {
        pool: PoolId,
    },
    GrantMinter {
        account: AccountId,
    },
    RevokeMinter {
        account: AccountId,
    },
}

impl Command {
    /// Short name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mint { .. } => "mint",
            Command::Burn { .. } => "burn",
            Command::Transfer { .. } => "transfer",
            Command::Claim => "claim",
            Command::Stake { .. } => "stake",
            Command::Unstake { .. } => "unstake",
            Command::SetYearlyRate { .. } => "set_yearly_rate",
            Command::SetCooldownPeriod { .. } => "set_cooldown_period",
            Command::AddPool { .. } => "add_pool",
            Command::DisablePool { .. } => "disable_pool",
            Command::GrantMinter { .. } => "grant_minter",
            Command::RevokeMinter { .. } => "revoke_minter",
        }
    }
}

/// A command stamped with its caller and effective time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCommand {
    pub at: Timestamp,
    pub caller: AccountId,
    #[serde(flatten)]
    pub command: Command,
}

/// What an applied command produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Amount minted by a mint (after the cap) or realized by a claim.
    Minted(u128),
    PoolAdded(PoolId),
}

/// Read a JSON-lines command log. Blank lines and lines starting with `#`
/// are skipped.
pub fn read_command_log(reader: impl BufRead) -> Result<Vec<LoggedCommand>, NodeError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = serde_json::from_str(trimmed).map_err(|e| NodeError::CommandLog {
            line: index + 1,
            reason: e.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Append `entries` to `writer` as JSON lines.
pub fn write_command_log<'a>(
    mut writer: impl Write,
    entries: impl IntoIterator<Item = &'a LoggedCommand>,
) -> Result<(), NodeError> {
    for entry in entries {
        let line = serde_json::to_string(entry).map_err(|e| NodeError::Other(e.to_string()))?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
