//! Append-only registry of staking pools.

use crate::error::AccrualError;
use accrue_types::{LpTokenId, PoolId, MULTIPLIER_SCALE};
use serde::{Deserialize, Serialize};

/// A staking pool accepting one LP token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPool {
    pub lp_token: LpTokenId,
    /// Multiplier cap, fixed point (1_000_000 = 1.0x).
    pub multiplier_max: u128,
    /// Seconds of continuous staking needed to reach `multiplier_max`.
    pub time_threshold: u64,
    /// Inactive pools accept no new stake and earn no rewards.
    pub active: bool,
}

/// Ordered list of pools. Pools are never removed, only deactivated, so a
/// `PoolId` stays valid forever.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: Vec<StakingPool>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pool. Rejects a cap below 1.0x or a zero threshold.
    pub fn add(
        &mut self,
        lp_token: LpTokenId,
        multiplier_max: u128,
        time_threshold: u64,
    ) -> Result<PoolId, AccrualError> {
        if multiplier_max < MULTIPLIER_SCALE {
            return Err(AccrualError::InvalidMultiplier(multiplier_max));
        }
        if time_threshold == 0 {
            return Err(AccrualError::InvalidTimeThreshold);
        }
        let id = u32::try_from(self.pools.len()).map_err(|_| AccrualError::RegistryFull)?;
        self.pools.push(StakingPool {
            lp_token,
            multiplier_max,
            time_threshold,
            active: true,
        });
        Ok(PoolId::new(id))
    }

    /// Deactivate a pool. Existing stakes are left untouched.
    pub fn disable(&mut self, id: PoolId) -> Result<(), AccrualError> {
        let pool = self
            .pools
            .get_mut(id.index())
            .ok_or(AccrualError::UnknownPool(id))?;
        if !pool.active {
            return Err(AccrualError::PoolInactive(id));
        }
        pool.active = false;
        Ok(())
    }

    pub fn get(&self, id: PoolId) -> Result<&StakingPool, AccrualError> {
        self.pools.get(id.index()).ok_or(AccrualError::UnknownPool(id))
    }

    /// Like [`PoolRegistry::get`], but also rejects inactive pools.
    pub fn get_active(&self, id: PoolId) -> Result<&StakingPool, AccrualError> {
        let pool = self.get(id)?;
        if !pool.active {
            return Err(AccrualError::PoolInactive(id));
        }
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// All pools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolId, &StakingPool)> {
        self.pools
            .iter()
            .enumerate()
            .map(|(i, pool)| (PoolId::new(i as u32), pool))
    }

    /// Active pools only, in registration order.
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolId, &StakingPool)> {
        self.iter().filter(|(_, pool)| pool.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lp(name: &str) -> LpTokenId {
        LpTokenId::new(name)
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut reg = PoolRegistry::new();
        let a = reg.add(lp("lp-a"), 2_000_000, 100).unwrap();
        let b = reg.add(lp("lp-b"), 1_000_000, 100).unwrap();
        assert_eq!(a, PoolId::new(0));
        assert_eq!(b, PoolId::new(1));
        assert_eq!(reg.get(b).unwrap().lp_token, lp("lp-b"));
    }

    #[test]
    fn rejects_cap_below_one() {
        let mut reg = PoolRegistry::new();
        assert_eq!(
            reg.add(lp("lp"), 999_999, 100),
            Err(AccrualError::InvalidMultiplier(999_999))
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn rejects_zero_threshold() {
        let mut reg = PoolRegistry::new();
        assert_eq!(
            reg.add(lp("lp"), 2_000_000, 0),
            Err(AccrualError::InvalidTimeThreshold)
        );
    }

    #[test]
    fn disable_is_one_way() {
        let mut reg = PoolRegistry::new();
        let id = reg.add(lp("lp"), 2_000_000, 100).unwrap();
        reg.disable(id).unwrap();
        assert!(!reg.get(id).unwrap().active);
        assert_eq!(reg.disable(id), Err(AccrualError::PoolInactive(id)));
        assert_eq!(reg.get_active(id), Err(AccrualError::PoolInactive(id)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn disable_unknown_pool() {
        let mut reg = PoolRegistry::new();
        let id = PoolId::new(3);
        assert_eq!(reg.disable(id), Err(AccrualError::UnknownPool(id)));
    }

    #[test]
    fn iter_active_skips_disabled() {
        let mut reg = PoolRegistry::new();
        let a = reg.add(lp("a"), 2_000_000, 10).unwrap();
        let b = reg.add(lp("b"), 2_000_000, 10).unwrap();
        reg.disable(a).unwrap();
        let active: Vec<_> = reg.iter_active().map(|(id, _)| id).collect();
        assert_eq!(active, vec![b]);
    }
}
