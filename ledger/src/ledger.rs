//! The ledger facade: balances, supply, transfers, staking and claims.

use crate::access::AccessPolicy;
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::policy::Realize;
use crate::supply::Supply;
use accrue_accrual::{AccountBalance, ActiveStakers, PoolRegistry, UserStake};
use accrue_oracle::{LpEscrow, PriceOracle};
use accrue_types::{AccountId, LedgerParams, LpTokenId, PoolId, Timestamp};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Everything the ledger persists. Rewards are never stored; they are
/// recomputed from the accrual windows.
#[derive(Clone, Debug)]
pub(crate) struct LedgerState {
    pub params: LedgerParams,
    pub access: AccessPolicy,
    pub supply: Supply,
    pub accounts: HashMap<AccountId, AccountBalance>,
    pub stakes: HashMap<AccountId, BTreeMap<PoolId, UserStake>>,
    pub pools: PoolRegistry,
    pub stakers: ActiveStakers,
    pub latest_claim: HashMap<AccountId, Timestamp>,
    pub last_global_update: Option<Timestamp>,
}

impl LedgerState {
    pub fn new(params: LedgerParams, admin: AccountId) -> Self {
        Self {
            supply: Supply::new(params.max_supply),
            params,
            access: AccessPolicy::new(admin),
            accounts: HashMap::new(),
            stakes: HashMap::new(),
            pools: PoolRegistry::new(),
            stakers: ActiveStakers::new(),
            latest_claim: HashMap::new(),
            last_global_update: None,
        }
    }
}

/// A continuously-accruing yield ledger.
///
/// Every method takes an explicit `now`, so a stamped sequence of calls
/// replays deterministically. All mutations go through the realization
/// policy first (see [`crate::policy`]).
pub struct Ledger {
    pub(crate) state: LedgerState,
    pub(crate) oracle: Arc<dyn PriceOracle>,
    pub(crate) escrow: Arc<dyn LpEscrow>,
    pub(crate) events: EventBus,
}

impl Ledger {
    pub fn new(
        params: LedgerParams,
        admin: AccountId,
        oracle: Arc<dyn PriceOracle>,
        escrow: Arc<dyn LpEscrow>,
    ) -> Result<Self, LedgerError> {
        validate_params(&params)?;
        if admin.is_null() {
            return Err(LedgerError::InvalidParams("admin must not be the null account".into()));
        }
        tracing::info!(
            admin = %admin,
            token = %params.token,
            rate_bps = params.yearly_rate_bps,
            cooldown_secs = params.reward_cooldown_secs,
            max_supply = params.max_supply,
            oracle = oracle.name(),
            "ledger initialized"
        );
        Ok(Self::from_state(LedgerState::new(params, admin), oracle, escrow))
    }

    pub(crate) fn from_state(
        state: LedgerState,
        oracle: Arc<dyn PriceOracle>,
        escrow: Arc<dyn LpEscrow>,
    ) -> Self {
        Self {
            state,
            oracle,
            escrow,
            events: EventBus::new(),
        }
    }

    /// Register a listener for ledger events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Token surface ──────────────────────────────────────────────────

    /// Mint `amount` to `to`, truncated to the remaining supply.
    ///
    /// Forces realization of `to`'s pending rewards first. Returns the amount
    /// actually minted; a mint truncated to zero changes nothing.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.state.access.ensure_minter(caller)?;
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient(to.clone()));
        }
        if amount == 0 {
            return Err(LedgerError::InsufficientAmount(0));
        }

        let mut settlement = self.settle(to, now, Realize::Force, 0)?;
        let minted = self.state.supply.clamp(amount, settlement.minted());
        if minted == 0 {
            tracing::debug!(to = %to, requested = amount, "mint truncated to zero by supply cap");
            return Ok(0);
        }
        settlement.balance.credit(minted)?;
        self.commit(settlement, now);
        self.state.supply.record_mint(minted);

        tracing::info!(to = %to, amount = minted, requested = amount, "minted");
        self.events.emit(&LedgerEvent::Minted {
            to: to.clone(),
            amount: minted,
            requested: amount,
        });
        Ok(minted)
    }

    /// Burn `amount` from `from`'s realized balance, after forcing realization.
    pub fn burn(
        &mut self,
        from: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InsufficientAmount(0));
        }
        let mut settlement = self.settle(from, now, Realize::Force, 0)?;
        settlement.balance.debit(amount)?;
        self.commit(settlement, now);
        self.state.supply.record_burn(amount);

        tracing::info!(from = %from, amount, "burned");
        self.events.emit(&LedgerEvent::Burned {
            from: from.clone(),
            amount,
        });
        Ok(())
    }

    /// Move `amount` of realized balance from `from` to `to`.
    ///
    /// Both parties are settled first. A zero amount only settles.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient(to.clone()));
        }

        if from == to {
            let mut settlement = self.settle(from, now, Realize::Auto, 0)?;
            settlement.balance.debit(amount)?;
            settlement.balance.credit(amount)?;
            self.commit(settlement, now);
        } else {
            let mut sender = self.settle(from, now, Realize::Auto, 0)?;
            let mut recipient = self.settle(to, now, Realize::Auto, sender.minted())?;
            sender.balance.debit(amount)?;
            recipient.balance.credit(amount)?;
            self.commit(sender, now);
            self.commit(recipient, now);
        }

        tracing::debug!(from = %from, to = %to, amount, "transferred");
        self.events.emit(&LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Settle `account`, realizing its rewards if the cooldown allows.
    /// Returns the amount minted, 0 while the cooldown runs.
    pub fn claim(&mut self, account: &AccountId, now: Timestamp) -> Result<u128, LedgerError> {
        let settlement = self.settle(account, now, Realize::Auto, 0)?;
        let minted = settlement.minted();
        let realized = settlement.realized;
        self.commit(settlement, now);
        if !realized {
            tracing::debug!(account = %account, "claim inside cooldown, nothing realized");
        }
        Ok(minted)
    }

    // ── Staking ────────────────────────────────────────────────────────

    /// Stake `amount` LP tokens of `pool`'s token, pulling them into escrow.
    pub fn stake(
        &mut self,
        account: &AccountId,
        pool: PoolId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let lp_token = self.state.pools.get_active(pool)?.lp_token.clone();
        if amount == 0 {
            return Err(LedgerError::InsufficientAmount(0));
        }

        let mut settlement = self.settle(account, now, Realize::Auto, 0)?;
        let mut stake = settlement
            .take_stake(pool)
            .unwrap_or_else(|| self.stake_of(account, pool).cloned().unwrap_or_default());
        stake.advance(now)?;
        let fresh = stake.deposit(amount, now)?;

        self.escrow.transfer_from(&lp_token, account, amount)?;

        settlement.stakes.push((pool, stake));
        self.commit(settlement, now);
        if fresh && self.state.stakers.insert(account.clone()) {
            tracing::debug!(account = %account, "joined active stakers");
        }

        tracing::info!(account = %account, pool = %pool, amount, fresh, "staked");
        self.events.emit(&LedgerEvent::Staked {
            account: account.clone(),
            pool,
            amount,
        });
        Ok(())
    }

    /// Withdraw `amount` LP tokens from `pool` back out of escrow.
    ///
    /// Allowed on inactive pools, so stakes are never stranded.
    pub fn unstake(
        &mut self,
        account: &AccountId,
        pool: PoolId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let lp_token = self.state.pools.get(pool)?.lp_token.clone();
        if amount == 0 {
            return Err(LedgerError::InsufficientAmount(0));
        }
        let staked = self.staked_balance(pool, account);
        if amount > staked {
            return Err(LedgerError::InsufficientStake {
                needed: amount,
                available: staked,
            });
        }

        let mut settlement = self.settle(account, now, Realize::Auto, 0)?;
        let mut stake = settlement
            .take_stake(pool)
            .unwrap_or_else(|| self.stake_of(account, pool).cloned().unwrap_or_default());
        stake.advance(now)?;
        let drained = stake.withdraw(amount)?;

        self.escrow.transfer(&lp_token, account, amount)?;

        settlement.stakes.push((pool, stake));
        self.commit(settlement, now);
        if drained && !self.has_any_stake(account) && self.state.stakers.remove(account) {
            tracing::debug!(account = %account, "left active stakers");
        }

        tracing::info!(account = %account, pool = %pool, amount, drained, "unstaked");
        self.events.emit(&LedgerEvent::Unstaked {
            account: account.clone(),
            pool,
            amount,
        });
        Ok(())
    }

    // ── Administration ─────────────────────────────────────────────────

    /// Change the yearly rate. Takes effect for every open window, including
    /// the time already elapsed in it.
    pub fn set_yearly_rate(&mut self, caller: &AccountId, rate_bps: u32) -> Result<(), LedgerError> {
        self.state.access.ensure_admin(caller, "set the yearly rate")?;
        let params = &self.state.params;
        if !params.rate_in_bounds(rate_bps) {
            return Err(LedgerError::InvalidYearlyRate {
                rate: rate_bps,
                min: params.min_yearly_rate_bps,
                max: params.max_yearly_rate_bps,
            });
        }
        let old = params.yearly_rate_bps;
        self.state.params.yearly_rate_bps = rate_bps;
        tracing::info!(old, new = rate_bps, "yearly rate changed");
        self.events.emit(&LedgerEvent::YearlyRateChanged { old, new: rate_bps });
        Ok(())
    }

    pub fn set_cooldown_period(&mut self, caller: &AccountId, secs: u64) -> Result<(), LedgerError> {
        self.state.access.ensure_admin(caller, "set the cooldown period")?;
        if secs == 0 {
            return Err(LedgerError::InvalidCooldownPeriod(secs));
        }
        let old = self.state.params.reward_cooldown_secs;
        self.state.params.reward_cooldown_secs = secs;
        tracing::info!(old, new = secs, "cooldown period changed");
        self.events.emit(&LedgerEvent::CooldownChanged { old, new: secs });
        Ok(())
    }

    /// Register a staking pool for `lp_token`. Returns its id.
    pub fn add_pool(
        &mut self,
        caller: &AccountId,
        lp_token: LpTokenId,
        multiplier_max: u128,
        time_threshold: u64,
    ) -> Result<PoolId, LedgerError> {
        self.state.access.ensure_admin(caller, "add a pool")?;
        if time_threshold == 0 {
            return Err(LedgerError::InvalidTimeThreshold(time_threshold));
        }
        let pool = self
            .state
            .pools
            .add(lp_token.clone(), multiplier_max, time_threshold)?;
        tracing::info!(pool = %pool, lp = %lp_token, multiplier_max, time_threshold, "pool added");
        self.events.emit(&LedgerEvent::PoolAdded {
            pool,
            lp_token,
            multiplier_max,
            time_threshold,
        });
        Ok(pool)
    }

    pub fn disable_pool(&mut self, caller: &AccountId, pool: PoolId) -> Result<(), LedgerError> {
        self.state.access.ensure_admin(caller, "disable a pool")?;
        self.state.pools.disable(pool)?;
        tracing::info!(pool = %pool, "pool disabled");
        self.events.emit(&LedgerEvent::PoolDisabled { pool });
        Ok(())
    }

    pub fn grant_minter(&mut self, caller: &AccountId, account: &AccountId) -> Result<(), LedgerError> {
        self.state.access.ensure_admin(caller, "grant minter")?;
        if account.is_null() {
            return Err(LedgerError::InvalidRecipient(account.clone()));
        }
        if self.state.access.grant(account.clone()) {
            tracing::info!(account = %account, "minter granted");
            self.events.emit(&LedgerEvent::MinterGranted {
                account: account.clone(),
            });
        }
        Ok(())
    }

    pub fn revoke_minter(&mut self, caller: &AccountId, account: &AccountId) -> Result<(), LedgerError> {
        self.state.access.ensure_admin(caller, "revoke minter")?;
        if self.state.access.revoke(account) {
            tracing::info!(account = %account, "minter revoked");
            self.events.emit(&LedgerEvent::MinterRevoked {
                account: account.clone(),
            });
        }
        Ok(())
    }

    // ── Internal lookups ───────────────────────────────────────────────

    pub(crate) fn stake_of(&self, account: &AccountId, pool: PoolId) -> Option<&UserStake> {
        self.state.stakes.get(account).and_then(|held| held.get(&pool))
    }

    pub(crate) fn has_any_stake(&self, account: &AccountId) -> bool {
        self.state
            .stakes
            .get(account)
            .is_some_and(|held| held.values().any(|s| !s.is_empty()))
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("state", &self.state)
            .field("oracle", &self.oracle.name())
            .field("events", &self.events)
            .finish()
    }
}

/// Reject parameter sets the ledger cannot run with.
pub(crate) fn validate_params(params: &LedgerParams) -> Result<(), LedgerError> {
    if params.min_yearly_rate_bps > params.max_yearly_rate_bps {
        return Err(LedgerError::InvalidParams(format!(
            "min rate {} bps exceeds max rate {} bps",
            params.min_yearly_rate_bps, params.max_yearly_rate_bps
        )));
    }
    if !params.rate_in_bounds(params.yearly_rate_bps) {
        return Err(LedgerError::InvalidYearlyRate {
            rate: params.yearly_rate_bps,
            min: params.min_yearly_rate_bps,
            max: params.max_yearly_rate_bps,
        });
    }
    if params.reward_cooldown_secs == 0 {
        return Err(LedgerError::InvalidCooldownPeriod(0));
    }
    Ok(())
}
