//! Serialized access to one ledger instance.
//!
//! Mutations take the write lock and run to completion before the next one
//! starts; queries share the read lock and always see a fully applied state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use accrue_ledger::{Ledger, PendingRewards};
use accrue_types::{AccountId, Clock, PoolId, Timestamp};

use crate::command::{Command, LoggedCommand, Outcome};
use crate::metrics::NodeMetrics;
use crate::NodeError;

/// Result of replaying a command log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    /// `(index in the log, error message)` for every rejected command.
    pub rejected: Vec<(usize, String)>,
}

/// A ledger behind a single-writer lock, plus the clock used to stamp
/// commands submitted without a timestamp.
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<RwLock<Ledger>>,
    clock: Arc<dyn Clock>,
    metrics: Arc<NodeMetrics>,
    /// Effective time of the newest applied command.
    high_water: Arc<AtomicU64>,
}

impl LedgerService {
    /// Wrap `ledger`. Its events feed `metrics`. Commands older than the
    /// newest instant already recorded in `ledger` are rejected.
    pub fn new(mut ledger: Ledger, clock: Arc<dyn Clock>, metrics: Arc<NodeMetrics>) -> Self {
        let resume_at = ledger.latest_activity().map_or(0, |at| at.as_secs());
        let sink = Arc::clone(&metrics);
        ledger.subscribe(Box::new(move |event| sink.observe(event)));
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            clock,
            metrics,
            high_water: Arc::new(AtomicU64::new(resume_at)),
        }
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    /// Effective time of the newest applied command.
    pub fn last_applied(&self) -> Timestamp {
        Timestamp::new(self.high_water.load(Ordering::SeqCst))
    }

    /// Stamp `command` with the service clock and apply it.
    pub async fn submit(&self, caller: &AccountId, command: Command) -> Result<Outcome, NodeError> {
        let entry = LoggedCommand {
            at: self.clock.now(),
            caller: caller.clone(),
            command,
        };
        self.apply(&entry).await
    }

    /// Apply one stamped command. Commands must arrive in time order.
    pub async fn apply(&self, entry: &LoggedCommand) -> Result<Outcome, NodeError> {
        let mut ledger = self.ledger.write().await;

        let last = self.last_applied();
        if entry.at < last {
            self.metrics.commands_rejected.inc();
            return Err(NodeError::OutOfOrder { at: entry.at, last });
        }

        let started = Instant::now();
        let result = execute(&mut ledger, entry);
        self.metrics
            .command_apply_time_ms
            .observe(started.elapsed().as_secs_f64() * 1_000.0);

        match &result {
            Ok(outcome) => {
                self.high_water.store(entry.at.as_secs(), Ordering::SeqCst);
                self.metrics.commands_applied.inc();
                tracing::debug!(
                    op = entry.command.name(),
                    caller = %entry.caller,
                    at = %entry.at,
                    ?outcome,
                    "command applied"
                );
            }
            Err(e) => {
                self.metrics.commands_rejected.inc();
                tracing::warn!(
                    op = entry.command.name(),
                    caller = %entry.caller,
                    at = %entry.at,
                    error = %e,
                    "command rejected"
                );
            }
        }
        self.refresh_gauges(&ledger);
        result
    }

    /// Apply `entries` in order. Rejected commands are recorded and skipped.
    pub async fn replay(&self, entries: impl IntoIterator<Item = LoggedCommand>) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match self.apply(&entry).await {
                Ok(_) => summary.applied += 1,
                Err(e) => summary.rejected.push((index, e.to_string())),
            }
        }
        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected.len(),
            "command log replayed"
        );
        summary
    }

    /// Run `f` against a consistent snapshot of the ledger.
    pub async fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.ledger.read().await;
        f(&ledger)
    }

    /// Balance including pending rewards, as of the service clock.
    pub async fn balance_of(&self, account: &AccountId) -> u128 {
        let now = self.clock.now();
        self.read(|ledger| ledger.balance_of(account, now)).await
    }

    pub async fn pending_rewards(&self, account: &AccountId) -> PendingRewards {
        let now = self.clock.now();
        self.read(|ledger| ledger.pending_rewards(account, now)).await
    }

    pub async fn current_multiplier(
        &self,
        pool: PoolId,
        account: &AccountId,
    ) -> Result<u128, NodeError> {
        let now = self.clock.now();
        Ok(self
            .read(|ledger| ledger.current_multiplier(pool, account, now))
            .await?)
    }

    pub async fn minted_supply(&self) -> u128 {
        self.read(|ledger| ledger.minted_supply()).await
    }

    fn refresh_gauges(&self, ledger: &Ledger) {
        self.metrics.account_count.set(ledger.account_count() as i64);
        self.metrics
            .active_stakers
            .set(ledger.active_staker_count() as i64);
        self.metrics.pool_count.set(ledger.pool_count() as i64);
    }
}

fn execute(ledger: &mut Ledger, entry: &LoggedCommand) -> Result<Outcome, NodeError> {
    let LoggedCommand { at, caller, command } = entry;
    let now = *at;
    let outcome = match command {
        Command::Mint { to, amount } => Outcome::Minted(ledger.mint(caller, to, *amount, now)?),
        Command::Burn { amount } => {
            ledger.burn(caller, *amount, now)?;
            Outcome::Done
        }
        Command::Transfer { to, amount } => {
            ledger.transfer(caller, to, *amount, now)?;
            Outcome::Done
        }
        Command::Claim => Outcome::Minted(ledger.claim(caller, now)?),
        Command::Stake { pool, amount } => {
            ledger.stake(caller, *pool, *amount, now)?;
            Outcome::Done
        }
        Command::Unstake { pool, amount } => {
            ledger.unstake(caller, *pool, *amount, now)?;
            Outcome::Done
        }
        Command::SetYearlyRate { rate_bps } => {
            ledger.set_yearly_rate(caller, *rate_bps)?;
            Outcome::Done
        }
        Command::SetCooldownPeriod { secs } => {
            ledger.set_cooldown_period(caller, *secs)?;
            Outcome::Done
        }
        Command::AddPool {
            lp_token,
            multiplier_max,
            time_threshold,
        } => Outcome::PoolAdded(ledger.add_pool(
            caller,
            lp_token.clone(),
            *multiplier_max,
            *time_threshold,
        )?),
        Command::DisablePool { pool } => {
            ledger.disable_pool(caller, *pool)?;
            Outcome::Done
        }
        Command::GrantMinter { account } => {
            ledger.grant_minter(caller, account)?;
            Outcome::Done
        }
        Command::RevokeMinter { account } => {
            ledger.revoke_minter(caller, account)?;
            Outcome::Done
        }
    };
    Ok(outcome)
}
