//! Reward realization policy.
//!
//! Every mutating entry point settles the accounts it touches before applying
//! its own change. Settling either *realizes* (mints pending base and staking
//! rewards, then reopens the windows) or merely *accumulates* (folds the
//! balance held so far into the windows). Which one happens depends on the
//! claim cooldown, unless the caller forces realization. An account cannot
//! be settled at an instant older than the newest one already recorded for it.
//!
//! Settlement is computed on copies. Nothing in the ledger changes until
//! [`Ledger::commit`] is called, so an operation that fails after settling
//! (insufficient balance, escrow rejection) leaves no trace.

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Ledger;
use accrue_accrual::{AccountBalance, Advance, StakingPool, UserStake};
use accrue_types::{AccountId, PoolId, ReserveRatio, Timestamp};

/// Whether settling may skip realization while the cooldown runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Realize {
    /// Realize only if the account's cooldown has elapsed.
    Auto,
    /// Realize unconditionally (mint and burn).
    Force,
}

/// An account's settled state, not yet written back.
#[derive(Clone, Debug)]
pub(crate) struct Settlement {
    pub account: AccountId,
    pub balance: AccountBalance,
    /// Stakes in active pools, advanced or restarted to `now`.
    pub stakes: Vec<(PoolId, UserStake)>,
    pub base_reward: u128,
    pub staking_reward: u128,
    pub realized: bool,
    pub started_earning: bool,
}

impl Settlement {
    /// Total minted by this settlement.
    pub fn minted(&self) -> u128 {
        self.base_reward + self.staking_reward
    }

    /// Remove the settled copy of the stake in `pool`, if settling touched it.
    pub fn take_stake(&mut self, pool: PoolId) -> Option<UserStake> {
        let slot = self.stakes.iter().position(|(id, _)| *id == pool)?;
        Some(self.stakes.swap_remove(slot).1)
    }
}

impl Ledger {
    /// Whether `account` would realize rewards if settled at `now`.
    pub fn is_realizable(&self, account: &AccountId, now: Timestamp) -> bool {
        match self.state.latest_claim.get(account) {
            None => true,
            Some(last) => last.has_expired(self.state.params.reward_cooldown_secs, now),
        }
    }

    /// Settle `account` at `now` on copies of its state.
    ///
    /// `reserved` is supply already promised to an earlier, uncommitted
    /// settlement in the same operation; rewards are clamped to what remains.
    pub(crate) fn settle(
        &self,
        account: &AccountId,
        now: Timestamp,
        mode: Realize,
        reserved: u128,
    ) -> Result<Settlement, LedgerError> {
        if let Some(latest) = self.last_activity(account) {
            if now < latest {
                return Err(LedgerError::StaleTimestamp {
                    account: account.clone(),
                    now,
                    latest,
                });
            }
        }
        let realize = mode == Realize::Force || self.is_realizable(account, now);
        let rate = self.state.params.yearly_rate_bps;
        let mut balance = self.state.accounts.get(account).cloned().unwrap_or_default();
        let held = self.state.stakes.get(account);
        let mut stakes = Vec::new();

        if !realize {
            let started_earning = balance.advance(now)? == Advance::Started;
            for (pool_id, _) in self.state.pools.iter_active() {
                let Some(stake) = held.and_then(|s| s.get(&pool_id)) else {
                    continue;
                };
                if stake.period.is_none() {
                    continue;
                }
                let mut stake = stake.clone();
                stake.advance(now)?;
                stakes.push((pool_id, stake));
            }
            tracing::debug!(account = %account, pools = stakes.len(), "accumulated");
            return Ok(Settlement {
                account: account.clone(),
                balance,
                stakes,
                base_reward: 0,
                staking_reward: 0,
                realized: false,
                started_earning,
            });
        }

        let mut room = self.state.supply.room().saturating_sub(reserved);

        let base_reward = balance
            .pending_reward_checked(now, rate)
            .ok_or(LedgerError::Overflow)?
            .min(room);
        room -= base_reward;
        let started_earning = balance.restart_period(now) == Advance::Started;

        let mut staking_reward = 0u128;
        for (pool_id, pool) in self.state.pools.iter_active() {
            let Some(stake) = held.and_then(|s| s.get(&pool_id)) else {
                continue;
            };
            if stake.period.is_none() {
                continue;
            }
            let mut stake = stake.clone();
            let ratio = self.reserve_ratio(pool_id, pool);
            let reward = stake
                .pending_reward_checked(pool, ratio, now, rate)
                .ok_or(LedgerError::Overflow)?
                .min(room);
            room -= reward;
            staking_reward += reward;
            stake.restart_period(now);
            stakes.push((pool_id, stake));
        }

        balance.credit(base_reward + staking_reward)?;

        Ok(Settlement {
            account: account.clone(),
            balance,
            stakes,
            base_reward,
            staking_reward,
            realized: true,
            started_earning,
        })
    }

    /// Write a settlement back and record its mint. Infallible: everything
    /// that can fail was checked while settling.
    pub(crate) fn commit(&mut self, settlement: Settlement, now: Timestamp) {
        let Settlement {
            account,
            balance,
            stakes,
            base_reward,
            staking_reward,
            realized,
            started_earning,
        } = settlement;

        self.state.accounts.insert(account.clone(), balance);
        if !stakes.is_empty() {
            let held = self.state.stakes.entry(account.clone()).or_default();
            for (pool, stake) in stakes {
                if stake.is_empty() && stake.period.is_none() {
                    held.remove(&pool);
                } else {
                    held.insert(pool, stake);
                }
            }
            if held.is_empty() {
                self.state.stakes.remove(&account);
            }
        }

        if started_earning {
            tracing::debug!(account = %account, at = %now, "started earning");
            self.events.emit(&LedgerEvent::StartedEarning {
                account: account.clone(),
                at: now,
            });
        }

        if realized {
            let minted = base_reward + staking_reward;
            self.state.supply.record_mint(minted);
            self.state.latest_claim.insert(account.clone(), now);
            self.state.last_global_update = Some(now);
            if minted > 0 {
                tracing::info!(
                    account = %account,
                    base = base_reward,
                    staking = staking_reward,
                    "rewards realized"
                );
                self.events.emit(&LedgerEvent::RewardsRealized {
                    account,
                    base: base_reward,
                    staking: staking_reward,
                });
            }
        }
    }

    /// Reserve ratio for `pool`, or [`ReserveRatio::ZERO`] when the oracle
    /// cannot price it. Oracle trouble never fails an operation.
    pub(crate) fn reserve_ratio(&self, pool_id: PoolId, pool: &StakingPool) -> ReserveRatio {
        match accrue_oracle::reserve_ratio(
            self.oracle.as_ref(),
            &pool.lp_token,
            &self.state.params.token,
        ) {
            Ok(ratio) if !ratio.is_degenerate() => ratio,
            Ok(ratio) => {
                tracing::warn!(
                    pool = %pool_id,
                    lp = %pool.lp_token,
                    reserve = ratio.reserve,
                    lp_supply = ratio.lp_supply,
                    "degenerate reserve ratio, staking reward is zero for this window"
                );
                ReserveRatio::ZERO
            }
            Err(e) => {
                tracing::warn!(
                    pool = %pool_id,
                    lp = %pool.lp_token,
                    oracle = self.oracle.name(),
                    error = %e,
                    "oracle read failed, staking reward is zero for this window"
                );
                ReserveRatio::ZERO
            }
        }
    }
}
