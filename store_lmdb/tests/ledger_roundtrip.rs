//! A ledger saved to LMDB comes back identical after the environment is
//! closed and reopened.

use std::sync::Arc;

use accrue_ledger::Ledger;
use accrue_nullables::{NullEscrow, NullOracle};
use accrue_store_lmdb::environment::DEFAULT_MAP_SIZE;
use accrue_store_lmdb::{LmdbEnvironment, LmdbLedgerStore};
use accrue_types::{AccountId, LedgerParams, LpTokenId, Timestamp, TokenId};

const YEAR: u64 = 31_536_000;

#[test]
fn ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let admin = AccountId::new("acct_admin");
    let alice = AccountId::new("acct_alice");
    let oracle = Arc::new(NullOracle::new(TokenId::new("ACR"), 1, 2));
    let escrow = Arc::new(NullEscrow::new());

    let mut ledger = Ledger::new(
        LedgerParams::default(),
        admin.clone(),
        oracle.clone(),
        escrow.clone(),
    )
    .unwrap();
    let pool = ledger
        .add_pool(&admin, LpTokenId::new("ACR-USD"), 2_000_000, YEAR)
        .unwrap();
    ledger.mint(&admin, &alice, 1_000, Timestamp::new(0)).unwrap();
    ledger.stake(&alice, pool, 500, Timestamp::new(0)).unwrap();

    {
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        ledger.save_to_store(&LmdbLedgerStore::new(env)).unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
    let restored = Ledger::load_from_store(&LmdbLedgerStore::new(env), oracle, escrow).unwrap();

    let year = Timestamp::new(YEAR);
    assert_eq!(restored.balance_of(&alice, year), ledger.balance_of(&alice, year));
    assert_eq!(restored.balance_of(&alice, year), 1_150);
    assert_eq!(restored.staked_balance(pool, &alice), 500);
    assert_eq!(restored.minted_supply(), 1_000);
    assert!(restored.is_active_staker(&alice));
}
