//! accrue daemon: command-line entry point for the yield ledger.

use std::path::PathBuf;
use std::sync::Arc;

use accrue_node::{init_logging, AccrueNode, NodeConfig};
use accrue_types::{AccountId, SystemClock};
use accrue_utils::{format_amount, format_bps, format_duration, format_multiplier};
use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "accrue-daemon", about = "Continuously-accruing yield ledger")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file's value.
    #[arg(long, env = "ACCRUE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the config file's value.
    #[arg(long, env = "ACCRUE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(long, env = "ACCRUE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Build the ledger from config, replay a command log and print the
    /// resulting balances.
    Replay {
        /// JSON-lines command log. Defaults to the config's `command_log`.
        #[arg(long, env = "ACCRUE_COMMAND_LOG")]
        log: Option<PathBuf>,

        /// Accounts to report on. Defaults to every account the log touched.
        #[arg(long, value_delimiter = ',')]
        accounts: Vec<String>,

        /// Print Prometheus metrics after the replay.
        #[arg(long)]
        metrics: bool,
    },

    /// Print the staking multiplier curve for a pool shape.
    PreviewMultiplier {
        /// Maximum multiplier, fixed point (1_000_000 = 1.0x).
        #[arg(long, default_value_t = 2_000_000)]
        max: u128,

        /// Seconds until the maximum is reached.
        #[arg(long, default_value_t = 31_536_000)]
        threshold: u64,

        /// Number of evenly spaced points to print.
        #[arg(long, default_value_t = 8)]
        steps: u64,
    },

    /// Print the effective configuration as TOML.
    PrintConfig,
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            NodeConfig::from_toml_file(path)?
        }
        None => NodeConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Command::Replay {
            log,
            accounts,
            metrics,
        } => {
            init_logging(config.log_format(), &config.log_level);
            if let Some(path) = log {
                config.command_log = Some(path);
            }
            if config.command_log.is_none() {
                anyhow::bail!("no command log: pass --log or set command_log in the config");
            }
            if let Some(path) = &cli.config {
                tracing::info!("Loaded config from {}", path.display());
            }

            let node = AccrueNode::new(config, Arc::new(SystemClock))?;
            let summary = node
                .replay_configured_log()
                .await?
                .context("command log vanished from config")?;
            for (index, reason) in &summary.rejected {
                println!("rejected #{index}: {reason}");
            }
            println!(
                "applied {} command(s), rejected {}",
                summary.applied,
                summary.rejected.len()
            );

            let now = node.service.last_applied();
            let (rows, minted, max, rate) = node
                .service
                .read(|ledger| {
                    let mut accounts: Vec<AccountId> = if accounts.is_empty() {
                        ledger.accounts().cloned().collect()
                    } else {
                        accounts.iter().map(AccountId::new).collect()
                    };
                    accounts.sort();
                    let rows: Vec<_> = accounts
                        .into_iter()
                        .map(|account| {
                            let balance = ledger.balance_of(&account, now);
                            (account, balance)
                        })
                        .collect();
                    (
                        rows,
                        ledger.minted_supply(),
                        ledger.max_supply(),
                        ledger.yearly_rate(),
                    )
                })
                .await;
            println!("balances as of {now}:");
            for (account, balance) in rows {
                println!("{account}: {}", format_amount(balance));
            }
            println!(
                "supply: {} / {} at {}",
                format_amount(minted),
                format_amount(max),
                format_bps(rate)
            );

            if node.save_snapshot().await? {
                println!("snapshot saved");
            }
            if metrics {
                print!("{}", node.metrics.encode());
            }
        }
        Command::PreviewMultiplier {
            max,
            threshold,
            steps,
        } => {
            accrue_utils::init_tracing("warn");
            let steps = steps.max(1);
            println!("max {} after {}", format_multiplier(max), format_duration(threshold));
            for i in 0..=steps {
                let staked = threshold.saturating_mul(i) / steps;
                println!(
                    "{:>12}  {}",
                    format_duration(staked),
                    format_multiplier(accrue_accrual::multiplier(max, threshold, staked))
                );
            }
        }
        Command::PrintConfig => {
            accrue_utils::init_tracing("warn");
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
