//! The open accrual window shared by spendable and staked balances.

use crate::error::AccrualError;
use accrue_types::Timestamp;
use serde::{Deserialize, Serialize};

/// An open accrual window `[started_at, now]`.
///
/// `accumulated` is `Σ balance × seconds` from `started_at` up to
/// `last_update`. The balance held since `last_update` is folded in lazily,
/// either by [`AccrualPeriod::advance`] or on the fly when a reward is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualPeriod {
    pub started_at: Timestamp,
    pub last_update: Timestamp,
    pub accumulated: u128,
}

/// What an `advance` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// No window was open; one was opened at `now`. The owner starts earning.
    Started,
    /// The accumulator absorbed the balance held since the last update.
    Accumulated,
}

impl AccrualPeriod {
    /// A fresh window opened at `now`.
    pub fn open(now: Timestamp) -> Self {
        Self {
            started_at: now,
            last_update: now,
            accumulated: 0,
        }
    }

    /// Accumulator value as of `now`, including the balance held since
    /// `last_update`.
    pub fn accumulated_at(&self, balance: u128, now: Timestamp) -> Option<u128> {
        let held = self.last_update.elapsed_since(now) as u128;
        self.accumulated.checked_add(balance.checked_mul(held)?)
    }

    /// Fold the balance held since `last_update` into the accumulator.
    pub fn advance(&mut self, balance: u128, now: Timestamp) -> Result<(), AccrualError> {
        self.accumulated = self
            .accumulated_at(balance, now)
            .ok_or(AccrualError::Overflow)?;
        if now > self.last_update {
            self.last_update = now;
        }
        Ok(())
    }

    /// Length of the window as of `now`, in seconds.
    pub fn window(&self, now: Timestamp) -> u64 {
        self.started_at.elapsed_since(now)
    }

    /// `average balance × window` as of `now`.
    ///
    /// The average is truncated before being scaled back up, so the result
    /// never exceeds the exact accumulator. Zero when the window is empty.
    pub fn weighted_balance(&self, balance: u128, now: Timestamp) -> Option<u128> {
        let total = self.accumulated_at(balance, now)?;
        let window = self.window(now) as u128;
        if total == 0 || window == 0 {
            return Some(0);
        }
        let average = total / window;
        average.checked_mul(window)
    }
}

/// Advance an optional window, opening it on first touch.
pub(crate) fn advance_or_open(
    period: &mut Option<AccrualPeriod>,
    balance: u128,
    now: Timestamp,
) -> Result<Advance, AccrualError> {
    match period {
        None => {
            *period = Some(AccrualPeriod::open(now));
            Ok(Advance::Started)
        }
        Some(open) => {
            open.advance(balance, now)?;
            Ok(Advance::Accumulated)
        }
    }
}
