//! Per-account base accrual.

use crate::error::AccrualError;
use crate::math::mul_div;
use crate::period::{advance_or_open, AccrualPeriod, Advance};
use accrue_types::{Timestamp, BPS_SCALE, SECONDS_PER_YEAR};
use serde::{Deserialize, Serialize};

/// Spendable balance of one account plus its open accrual window.
///
/// `value` is the realized (minted) balance. Pending base reward is never
/// stored; it is recomputed from the window on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub value: u128,
    /// `None` until the first balance-affecting event.
    pub period: Option<AccrualPeriod>,
}

impl AccountBalance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_earning(&self) -> bool {
        self.period.is_some()
    }

    /// Bring the accumulator up to `now` without minting anything.
    pub fn advance(&mut self, now: Timestamp) -> Result<Advance, AccrualError> {
        advance_or_open(&mut self.period, self.value, now)
    }

    /// Base reward earned over the open window as of `now`.
    ///
    /// `avg × window × rate_bps / (BPS_SCALE × SECONDS_PER_YEAR)`, where `avg`
    /// is the truncated time-weighted average balance. Zero with no open window.
    pub fn pending_reward_checked(&self, now: Timestamp, rate_bps: u32) -> Option<u128> {
        let Some(period) = &self.period else {
            return Some(0);
        };
        let weighted = period.weighted_balance(self.value, now)?;
        mul_div(weighted, rate_bps as u128, BPS_SCALE * SECONDS_PER_YEAR)
    }

    /// Base reward as of `now`, returning 0 on overflow.
    pub fn pending_reward(&self, now: Timestamp, rate_bps: u32) -> u128 {
        self.pending_reward_checked(now, rate_bps).unwrap_or(0)
    }

    /// Close the window and open a fresh one at `now`.
    ///
    /// Returns `Advance::Started` if this is the account's first touch.
    pub fn restart_period(&mut self, now: Timestamp) -> Advance {
        let started = if self.period.is_none() {
            Advance::Started
        } else {
            Advance::Accumulated
        };
        self.period = Some(AccrualPeriod::open(now));
        started
    }

    /// Add minted or received value. The window must already be advanced to
    /// the current instant.
    pub fn credit(&mut self, amount: u128) -> Result<(), AccrualError> {
        self.value = self.value.checked_add(amount).ok_or(AccrualError::Overflow)?;
        Ok(())
    }

    /// Remove burned or sent value. The window must already be advanced to
    /// the current instant.
    pub fn debit(&mut self, amount: u128) -> Result<(), AccrualError> {
        if amount > self.value {
            return Err(AccrualError::InsufficientBalance {
                needed: amount,
                available: self.value,
            });
        }
        self.value -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: u64 = 365 * 86_400;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn funded(value: u128, at: u64) -> AccountBalance {
        let mut b = AccountBalance::new();
        b.advance(ts(at)).unwrap();
        b.credit(value).unwrap();
        b
    }

    #[test]
    fn untouched_account_earns_nothing() {
        let b = AccountBalance::new();
        assert!(!b.is_earning());
        assert_eq!(b.pending_reward(ts(YEAR), 1_000), 0);
    }

    #[test]
    fn first_advance_starts_earning() {
        let mut b = AccountBalance::new();
        assert_eq!(b.advance(ts(10)).unwrap(), Advance::Started);
        assert!(b.is_earning());
        assert_eq!(b.advance(ts(20)).unwrap(), Advance::Accumulated);
    }

    #[test]
    fn ten_percent_for_a_year() {
        let b = funded(1_000, 0);
        assert_eq!(b.pending_reward(ts(YEAR), 1_000), 100);
    }

    #[test]
    fn half_year_accrues_half() {
        let b = funded(1_000_000, 0);
        assert_eq!(b.pending_reward(ts(YEAR / 2), 1_000), 50_000);
    }

    #[test]
    fn advance_does_not_change_pending() {
        let mut b = funded(5_000_000, 0);
        let before = b.pending_reward(ts(1_000_000), 700);
        b.advance(ts(400_000)).unwrap();
        b.advance(ts(1_000_000)).unwrap();
        assert_eq!(b.pending_reward(ts(1_000_000), 700), before);
    }

    #[test]
    fn balance_change_mid_window_is_time_weighted() {
        let mut b = funded(1_000, 0);
        b.advance(ts(YEAR / 2)).unwrap();
        b.credit(1_000).unwrap();
        // 1000 for half a year + 2000 for half a year = avg 1500.
        assert_eq!(b.pending_reward(ts(YEAR), 1_000), 150);
    }

    #[test]
    fn restart_closes_window() {
        let mut b = funded(1_000, 0);
        b.restart_period(ts(YEAR));
        assert_eq!(b.pending_reward(ts(YEAR), 1_000), 0);
        assert_eq!(b.period.unwrap().accumulated, 0);
        assert_eq!(b.pending_reward(ts(2 * YEAR), 1_000), 100);
    }

    #[test]
    fn debit_rejects_overdraft() {
        let mut b = funded(10, 0);
        assert_eq!(
            b.debit(11),
            Err(AccrualError::InsufficientBalance {
                needed: 11,
                available: 10
            })
        );
        b.debit(10).unwrap();
        assert_eq!(b.value, 0);
    }
}
