//! Events emitted by the ledger facade for subscribers.

use accrue_types::{AccountId, LpTokenId, PoolId, Timestamp};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// An account's base accrual window opened for the first time.
    StartedEarning { account: AccountId, at: Timestamp },
    /// Explicit mint. `amount` is what was actually minted after the cap.
    Minted {
        to: AccountId,
        amount: u128,
        requested: u128,
    },
    Burned { from: AccountId, amount: u128 },
    Transferred {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// Pending rewards were minted into an account's balance.
    RewardsRealized {
        account: AccountId,
        base: u128,
        staking: u128,
    },
    Staked {
        account: AccountId,
        pool: PoolId,
        amount: u128,
    },
    Unstaked {
        account: AccountId,
        pool: PoolId,
        amount: u128,
    },
    PoolAdded {
        pool: PoolId,
        lp_token: LpTokenId,
        multiplier_max: u128,
        time_threshold: u64,
    },
    PoolDisabled { pool: PoolId },
    YearlyRateChanged { old: u32, new: u32 },
    CooldownChanged { old: u64, new: u64 },
    MinterGranted { account: AccountId },
    MinterRevoked { account: AccountId },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the mutating call; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};

    fn alice() -> AccountId {
        AccountId::new("acct_alice")
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&LedgerEvent::Burned {
            from: alice(),
            amount: 5,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&LedgerEvent::PoolDisabled {
            pool: PoolId::new(0),
        });
    }

    #[test]
    fn listener_receives_correct_event_variant() {
        let saw_minted = Arc::new(AtomicUsize::new(0));
        let saw_realized = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let sm = Arc::clone(&saw_minted);
        let sr = Arc::clone(&saw_realized);
        bus.subscribe(Box::new(move |event| match event {
            LedgerEvent::Minted { .. } => {
                sm.fetch_add(1, Ordering::SeqCst);
            }
            LedgerEvent::RewardsRealized { .. } => {
                sr.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }));

        bus.emit(&LedgerEvent::Minted {
            to: alice(),
            amount: 10,
            requested: 10,
        });
        bus.emit(&LedgerEvent::RewardsRealized {
            account: alice(),
            base: 1,
            staking: 0,
        });
        bus.emit(&LedgerEvent::YearlyRateChanged { old: 1, new: 2 });

        assert_eq!(saw_minted.load(Ordering::SeqCst), 1);
        assert_eq!(saw_realized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_creates_empty_bus() {
        let bus = EventBus::default();
        assert!(bus.listeners.is_empty());
    }
}
