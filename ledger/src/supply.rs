//! Global supply bookkeeping and the cap.

use serde::{Deserialize, Serialize};

/// Minted supply against a hard cap.
///
/// Every mint, explicit or reward, is clamped to [`Supply::room`] before it
/// is recorded, so `minted <= max` holds at all times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub minted: u128,
    pub max: u128,
}

impl Supply {
    pub fn new(max: u128) -> Self {
        Self { minted: 0, max }
    }

    /// How much more can be minted.
    pub fn room(&self) -> u128 {
        self.max.saturating_sub(self.minted)
    }

    pub fn is_exhausted(&self) -> bool {
        self.room() == 0
    }

    /// `amount` truncated to what still fits, after `reserved` has been
    /// claimed by an uncommitted mint.
    pub fn clamp(&self, amount: u128, reserved: u128) -> u128 {
        amount.min(self.room().saturating_sub(reserved))
    }

    /// Record an amount already clamped against the cap.
    pub(crate) fn record_mint(&mut self, amount: u128) {
        debug_assert!(amount <= self.room(), "mint exceeds remaining supply");
        self.minted += amount;
    }

    /// Record burned value. Never underflows while balances sum to `minted`.
    pub(crate) fn record_burn(&mut self, amount: u128) {
        debug_assert!(amount <= self.minted, "burn exceeds minted supply");
        self.minted = self.minted.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_truncates_near_cap() {
        let mut supply = Supply::new(1_000);
        supply.record_mint(990);
        assert_eq!(supply.room(), 10);
        assert_eq!(supply.clamp(25, 0), 10);
        assert_eq!(supply.clamp(25, 4), 6);
        assert_eq!(supply.clamp(25, 40), 0);
    }

    #[test]
    fn exhausted_at_cap() {
        let mut supply = Supply::new(5);
        supply.record_mint(5);
        assert!(supply.is_exhausted());
        assert_eq!(supply.clamp(1, 0), 0);

        supply.record_burn(2);
        assert_eq!(supply.room(), 2);
    }

    #[test]
    fn lowered_cap_leaves_no_room() {
        let supply = Supply { minted: 10, max: 4 };
        assert_eq!(supply.room(), 0);
    }
}
