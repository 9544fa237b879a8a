//! Read-only queries. None of these change state.

use crate::ledger::Ledger;
use crate::error::LedgerError;
use accrue_accrual::StakingPool;
use accrue_types::{AccountId, LedgerParams, PoolId, Timestamp, MULTIPLIER_SCALE};

/// Unrealized rewards of one account, split by source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingRewards {
    pub base: u128,
    pub staking: u128,
}

impl PendingRewards {
    pub fn total(&self) -> u128 {
        self.base + self.staking
    }
}

impl Ledger {
    /// Realized balance plus everything pending as of `now`, clamped to the
    /// remaining supply.
    pub fn balance_of(&self, account: &AccountId, now: Timestamp) -> u128 {
        self.realized_balance(account) + self.pending_rewards(account, now).total()
    }

    /// Minted balance only.
    pub fn realized_balance(&self, account: &AccountId) -> u128 {
        self.state.accounts.get(account).map(|b| b.value).unwrap_or(0)
    }

    /// What realizing at `now` would mint, ignoring the cooldown.
    pub fn pending_rewards(&self, account: &AccountId, now: Timestamp) -> PendingRewards {
        let rate = self.state.params.yearly_rate_bps;
        let mut room = self.state.supply.room();

        let base = self
            .state
            .accounts
            .get(account)
            .map(|b| b.pending_reward(now, rate))
            .unwrap_or(0)
            .min(room);
        room -= base;

        let mut staking = 0u128;
        if let Some(held) = self.state.stakes.get(account) {
            for (pool_id, pool) in self.state.pools.iter_active() {
                let Some(stake) = held.get(&pool_id) else {
                    continue;
                };
                if stake.period.is_none() {
                    continue;
                }
                let ratio = self.reserve_ratio(pool_id, pool);
                let reward = stake.pending_reward(pool, ratio, now, rate).min(room);
                room -= reward;
                staking += reward;
            }
        }

        PendingRewards { base, staking }
    }

    pub fn staked_balance(&self, pool: PoolId, account: &AccountId) -> u128 {
        self.stake_of(account, pool).map(|s| s.amount).unwrap_or(0)
    }

    /// LP tokens held in `pool` across all accounts.
    pub fn total_staked(&self, pool: PoolId) -> u128 {
        self.state
            .stakes
            .values()
            .filter_map(|held| held.get(&pool))
            .fold(0u128, |total, s| total.saturating_add(s.amount))
    }

    /// Duration multiplier `account` currently earns in `pool`
    /// (1_000_000 = 1.0x). 1.0x with no stake.
    pub fn current_multiplier(
        &self,
        pool: PoolId,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let pool_ref = self.state.pools.get(pool)?;
        Ok(self
            .stake_of(account, pool)
            .map(|s| s.multiplier(pool_ref, now))
            .unwrap_or(MULTIPLIER_SCALE))
    }

    pub fn pool(&self, pool: PoolId) -> Result<&StakingPool, LedgerError> {
        Ok(self.state.pools.get(pool)?)
    }

    /// All pools, active or not, in registration order.
    pub fn pools(&self) -> impl Iterator<Item = (PoolId, &StakingPool)> {
        self.state.pools.iter()
    }

    pub fn pool_count(&self) -> usize {
        self.state.pools.len()
    }

    pub fn active_stakers(&self) -> impl Iterator<Item = &AccountId> {
        self.state.stakers.iter()
    }

    pub fn active_staker_count(&self) -> usize {
        self.state.stakers.len()
    }

    pub fn is_active_staker(&self, account: &AccountId) -> bool {
        self.state.stakers.contains(account)
    }

    pub fn minted_supply(&self) -> u128 {
        self.state.supply.minted
    }

    pub fn max_supply(&self) -> u128 {
        self.state.supply.max
    }

    pub fn remaining_supply(&self) -> u128 {
        self.state.supply.room()
    }

    /// Sum of all realized balances. Equals [`Ledger::minted_supply`].
    pub fn total_realized(&self) -> u128 {
        self.state.accounts.values().map(|b| b.value).sum()
    }

    pub fn yearly_rate(&self) -> u32 {
        self.state.params.yearly_rate_bps
    }

    pub fn cooldown_period(&self) -> u64 {
        self.state.params.reward_cooldown_secs
    }

    pub fn params(&self) -> &LedgerParams {
        &self.state.params
    }

    pub fn admin(&self) -> &AccountId {
        self.state.access.admin()
    }

    pub fn is_minter(&self, account: &AccountId) -> bool {
        self.state.access.is_minter(account)
    }

    pub fn latest_claim(&self, account: &AccountId) -> Option<Timestamp> {
        self.state.latest_claim.get(account).copied()
    }

    /// Earliest instant `account` can realize again. `None` if it never
    /// realized, meaning it can right away.
    pub fn next_claim_at(&self, account: &AccountId) -> Option<Timestamp> {
        self.latest_claim(account)
            .map(|last| last.plus_secs(self.state.params.reward_cooldown_secs))
    }

    pub fn last_global_update(&self) -> Option<Timestamp> {
        self.state.last_global_update
    }

    /// Newest instant `account` was settled or staked at. `None` if the
    /// ledger never touched it.
    pub fn last_activity(&self, account: &AccountId) -> Option<Timestamp> {
        let balance = self
            .state
            .accounts
            .get(account)
            .and_then(|b| b.period)
            .map(|p| p.last_update);
        let stakes = self
            .state
            .stakes
            .get(account)
            .into_iter()
            .flat_map(|held| held.values())
            .flat_map(|s| [s.period.map(|p| p.last_update), s.stake_started_at])
            .flatten();
        balance
            .into_iter()
            .chain(stakes)
            .chain(self.latest_claim(account))
            .max()
    }

    /// Newest instant recorded anywhere in the ledger.
    pub fn latest_activity(&self) -> Option<Timestamp> {
        self.state
            .accounts
            .keys()
            .chain(self.state.stakes.keys())
            .filter_map(|account| self.last_activity(account))
            .chain(self.state.last_global_update)
            .max()
    }

    /// Number of accounts the ledger has ever touched.
    pub fn account_count(&self) -> usize {
        self.state.accounts.len()
    }

    /// Every account the ledger has touched, in no particular order.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountId> {
        self.state.accounts.keys()
    }
}
