use std::sync::Arc;

use proptest::prelude::*;

use accrue_ledger::Ledger;
use accrue_nullables::{NullEscrow, NullOracle};
use accrue_types::{AccountId, LedgerParams, LpTokenId, PoolId, Timestamp, TokenId};

#[derive(Clone, Debug)]
enum Op {
    Mint(usize, u128),
    Burn(usize, u128),
    Transfer(usize, usize, u128),
    Claim(usize),
    Stake(usize, u32, u128),
    Unstake(usize, u32, u128),
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 1u128..2_000_000).prop_map(|(a, n)| Op::Mint(a, n)),
        (0..4usize, 1u128..500_000).prop_map(|(a, n)| Op::Burn(a, n)),
        (0..4usize, 0..4usize, 0u128..500_000).prop_map(|(a, b, n)| Op::Transfer(a, b, n)),
        (0..4usize).prop_map(Op::Claim),
        (0..4usize, 0u32..2, 1u128..1_000_000).prop_map(|(a, p, n)| Op::Stake(a, p, n)),
        (0..4usize, 0u32..2, 1u128..1_000_000).prop_map(|(a, p, n)| Op::Unstake(a, p, n)),
        (1u64..60 * 86_400).prop_map(Op::Wait),
    ]
}

fn account(i: usize) -> AccountId {
    AccountId::new(format!("acct_{i}"))
}

fn admin() -> AccountId {
    AccountId::new("acct_admin")
}

fn ledger(max_supply: u128) -> Ledger {
    let params = LedgerParams {
        max_supply,
        ..LedgerParams::default()
    };
    let oracle = Arc::new(NullOracle::new(TokenId::new("ACR"), 3, 4));
    let mut ledger = Ledger::new(params, admin(), oracle, Arc::new(NullEscrow::new())).unwrap();
    ledger
        .add_pool(&admin(), LpTokenId::new("a"), 2_000_000, 365 * 86_400)
        .unwrap();
    ledger
        .add_pool(&admin(), LpTokenId::new("b"), 5_000_000, 30 * 86_400)
        .unwrap();
    ledger
}

fn apply(ledger: &mut Ledger, op: &Op, now: &mut u64) {
    let t = Timestamp::new(*now);
    let _ = match op {
        Op::Mint(a, n) => ledger.mint(&admin(), &account(*a), *n, t).map(|_| ()),
        Op::Burn(a, n) => ledger.burn(&account(*a), *n, t),
        Op::Transfer(a, b, n) => ledger.transfer(&account(*a), &account(*b), *n, t),
        Op::Claim(a) => ledger.claim(&account(*a), t).map(|_| ()),
        Op::Stake(a, p, n) => ledger.stake(&account(*a), PoolId::new(*p), *n, t),
        Op::Unstake(a, p, n) => ledger.unstake(&account(*a), PoolId::new(*p), *n, t),
        Op::Wait(secs) => {
            *now += secs;
            Ok(())
        }
    };
}

proptest! {
    /// Realized balances always sum to minted supply, which never exceeds the cap.
    #[test]
    fn supply_is_conserved_and_capped(
        max_supply in 1_000_000u128..20_000_000,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut ledger = ledger(max_supply);
        let mut now = 0u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
            prop_assert_eq!(ledger.total_realized(), ledger.minted_supply(), "after {:?}", op);
            prop_assert!(ledger.minted_supply() <= ledger.max_supply());
        }
    }

    /// An account is an active staker iff it has a nonzero stake somewhere.
    #[test]
    fn staker_set_matches_stakes(ops in prop::collection::vec(op(), 1..60)) {
        let mut ledger = ledger(u128::MAX / 2);
        let mut now = 0u64;
        for op in &ops {
            apply(&mut ledger, op, &mut now);
            for i in 0..4 {
                let id = account(i);
                let staked = (0..2).any(|p| ledger.staked_balance(PoolId::new(p), &id) > 0);
                prop_assert_eq!(ledger.is_active_staker(&id), staked, "{} after {:?}", id, op);
            }
        }
    }

    /// Two claims inside the cooldown leave the realized balance unchanged.
    #[test]
    fn cooldown_blocks_second_claim(
        amount in 1u128..1_000_000_000_000_000,
        first in 86_400u64..10_000_000,
        gap in 0u64..86_400,
    ) {
        let mut ledger = ledger(u128::MAX / 2);
        let alice = account(0);
        ledger.mint(&admin(), &alice, amount, Timestamp::new(0)).unwrap();
        ledger.claim(&alice, Timestamp::new(first)).unwrap();
        let after_first = ledger.realized_balance(&alice);
        prop_assert_eq!(ledger.claim(&alice, Timestamp::new(first + gap)).unwrap(), 0);
        prop_assert_eq!(ledger.realized_balance(&alice), after_first);
    }

    /// The balance view never decreases while nothing happens.
    #[test]
    fn balance_view_monotonic(
        amount in 1u128..1_000_000_000_000,
        t1 in 0u64..100_000_000,
        dt in 0u64..100_000_000,
    ) {
        let mut ledger = ledger(u128::MAX / 2);
        let alice = account(0);
        ledger.mint(&admin(), &alice, amount, Timestamp::new(0)).unwrap();
        let b1 = ledger.balance_of(&alice, Timestamp::new(t1));
        let b2 = ledger.balance_of(&alice, Timestamp::new(t1 + dt));
        prop_assert!(b2 >= b1, "balance went from {} to {}", b1, b2);
    }
}
