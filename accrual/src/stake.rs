//! Per-(pool, account) staking accrual.

use crate::curve::multiplier;
use crate::error::AccrualError;
use crate::math::mul_div;
use crate::period::{advance_or_open, AccrualPeriod, Advance};
use crate::pool::StakingPool;
use accrue_types::{ReserveRatio, Timestamp, BPS_SCALE, MULTIPLIER_SCALE, SECONDS_PER_YEAR};
use serde::{Deserialize, Serialize};

/// LP tokens one account holds in one pool, plus the stake's accrual window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStake {
    pub amount: u128,
    pub period: Option<AccrualPeriod>,
    /// When the current continuous stake began. Drives the duration
    /// multiplier; cleared whenever the stake drains to zero.
    pub stake_started_at: Option<Timestamp>,
}

impl UserStake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Bring the accumulator up to `now` without minting anything.
    pub fn advance(&mut self, now: Timestamp) -> Result<Advance, AccrualError> {
        advance_or_open(&mut self.period, self.amount, now)
    }

    /// Seconds of continuous staking as of `now`.
    pub fn time_staked(&self, now: Timestamp) -> u64 {
        self.stake_started_at
            .map(|start| start.elapsed_since(now))
            .unwrap_or(0)
    }

    /// Duration multiplier for this stake in `pool` as of `now`.
    pub fn multiplier(&self, pool: &StakingPool, now: Timestamp) -> u128 {
        if self.stake_started_at.is_none() {
            return MULTIPLIER_SCALE;
        }
        multiplier(pool.multiplier_max, pool.time_threshold, self.time_staked(now))
    }

    /// Staking reward earned over the open window as of `now`.
    ///
    /// `avg_staked × reserve/lp_supply × multiplier × rate_bps × window
    ///  / (MULTIPLIER_SCALE × BPS_SCALE × SECONDS_PER_YEAR)`
    ///
    /// A degenerate reserve ratio yields zero.
    pub fn pending_reward_checked(
        &self,
        pool: &StakingPool,
        ratio: ReserveRatio,
        now: Timestamp,
        rate_bps: u32,
    ) -> Option<u128> {
        let Some(period) = &self.period else {
            return Some(0);
        };
        if ratio.is_degenerate() {
            return Some(0);
        }
        let weighted = period.weighted_balance(self.amount, now)?;
        let in_tokens = mul_div(weighted, ratio.reserve, ratio.lp_supply)?;
        let boosted = mul_div(in_tokens, self.multiplier(pool, now), MULTIPLIER_SCALE)?;
        mul_div(boosted, rate_bps as u128, BPS_SCALE * SECONDS_PER_YEAR)
    }

    /// Staking reward as of `now`, returning 0 on overflow.
    pub fn pending_reward(
        &self,
        pool: &StakingPool,
        ratio: ReserveRatio,
        now: Timestamp,
        rate_bps: u32,
    ) -> u128 {
        self.pending_reward_checked(pool, ratio, now, rate_bps)
            .unwrap_or(0)
    }

    /// Close the window and open a fresh one at `now`.
    pub fn restart_period(&mut self, now: Timestamp) {
        self.period = Some(AccrualPeriod::open(now));
    }

    /// Fold `amount` into the stake. Returns `true` when this was a fresh
    /// stake from zero, which (re)starts the duration clock. The window must
    /// already be advanced to `now`.
    pub fn deposit(&mut self, amount: u128, now: Timestamp) -> Result<bool, AccrualError> {
        if amount == 0 {
            return Err(AccrualError::ZeroAmount);
        }
        let fresh = self.amount == 0;
        self.amount = self.amount.checked_add(amount).ok_or(AccrualError::Overflow)?;
        if fresh {
            self.stake_started_at = Some(now);
        }
        if self.period.is_none() {
            self.period = Some(AccrualPeriod::open(now));
        }
        Ok(fresh)
    }

    /// Remove `amount` from the stake. Returns `true` when the stake drained
    /// to zero, in which case the window and duration clock are cleared.
    pub fn withdraw(&mut self, amount: u128) -> Result<bool, AccrualError> {
        if amount == 0 {
            return Err(AccrualError::ZeroAmount);
        }
        if amount > self.amount {
            return Err(AccrualError::InsufficientStake {
                needed: amount,
                available: self.amount,
            });
        }
        self.amount -= amount;
        if self.amount == 0 {
            self.period = None;
            self.stake_started_at = None;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accrue_types::LpTokenId;

    const DAY: u64 = 86_400;
    const YEAR: u64 = 365 * DAY;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn pool(max: u128, threshold: u64) -> StakingPool {
        StakingPool {
            lp_token: LpTokenId::new("lp"),
            multiplier_max: max,
            time_threshold: threshold,
            active: true,
        }
    }

    fn staked(amount: u128, at: u64) -> UserStake {
        let mut s = UserStake::new();
        s.advance(ts(at)).unwrap();
        s.deposit(amount, ts(at)).unwrap();
        s
    }

    #[test]
    fn one_year_at_full_boost_and_half_ratio() {
        // 500 LP × 0.5 × 10% × 2.0 = 50
        let s = staked(500, 0);
        let reward = s.pending_reward(
            &pool(2_000_000, YEAR),
            ReserveRatio::new(1, 2),
            ts(YEAR),
            1_000,
        );
        assert_eq!(reward, 50);
    }

    #[test]
    fn degenerate_ratio_earns_nothing() {
        let s = staked(500, 0);
        let p = pool(2_000_000, YEAR);
        assert_eq!(s.pending_reward(&p, ReserveRatio::new(0, 10), ts(YEAR), 1_000), 0);
        assert_eq!(s.pending_reward(&p, ReserveRatio::new(10, 0), ts(YEAR), 1_000), 0);
    }

    #[test]
    fn multiplier_uses_continuous_stake_age() {
        let s = staked(1, 1_000);
        let p = pool(2_000_000, 2 * DAY);
        assert_eq!(s.multiplier(&p, ts(1_000)), MULTIPLIER_SCALE);
        assert_eq!(s.multiplier(&p, ts(1_000 + DAY)), 1_125_000);
        assert_eq!(s.multiplier(&p, ts(1_000 + 2 * DAY)), 2_000_000);
    }

    #[test]
    fn top_up_keeps_stake_clock() {
        let mut s = staked(100, 0);
        s.advance(ts(DAY)).unwrap();
        assert!(!s.deposit(50, ts(DAY)).unwrap());
        assert_eq!(s.stake_started_at, Some(ts(0)));
        assert_eq!(s.amount, 150);
    }

    #[test]
    fn draining_clears_window_and_clock() {
        let mut s = staked(100, 0);
        assert!(!s.withdraw(40).unwrap());
        assert!(s.withdraw(60).unwrap());
        assert!(s.is_empty());
        assert_eq!(s.period, None);
        assert_eq!(s.stake_started_at, None);
    }

    #[test]
    fn restake_after_drain_restarts_clock() {
        let mut s = staked(100, 0);
        s.withdraw(100).unwrap();
        s.advance(ts(YEAR)).unwrap();
        assert!(s.deposit(10, ts(YEAR)).unwrap());
        assert_eq!(s.stake_started_at, Some(ts(YEAR)));
        assert_eq!(s.multiplier(&pool(3_000_000, DAY), ts(YEAR)), MULTIPLIER_SCALE);
    }

    #[test]
    fn withdraw_more_than_staked() {
        let mut s = staked(10, 0);
        assert_eq!(
            s.withdraw(11),
            Err(AccrualError::InsufficientStake {
                needed: 11,
                available: 10
            })
        );
        assert_eq!(s.withdraw(0), Err(AccrualError::ZeroAmount));
    }

    #[test]
    fn large_stakes_do_not_overflow() {
        // 10^27 LP units against a 10^30 reserve: intermediates exceed u128.
        let s = staked(1_000_000_000_000_000_000_000_000, 0);
        let reward = s.pending_reward_checked(
            &pool(5_000_000, YEAR),
            ReserveRatio::new(1_000_000_000_000_000_000_000_000_000_000, 1_000_000_000_000_000_000_000_000),
            ts(YEAR),
            1_000,
        );
        // 10^27 × 1000 × 5.0 × 10% = 5 × 10^29
        assert_eq!(reward, Some(500_000_000_000_000_000_000_000_000_000));
    }
}
