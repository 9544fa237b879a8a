//! Nullable store: thread-safe in-memory storage for testing.

use accrue_store::{LedgerStore, StoreError};
use accrue_types::{AccountId, PoolId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// An in-memory ledger store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Debug, Default)]
pub struct NullLedgerStore {
    accounts: Mutex<HashMap<AccountId, Vec<u8>>>,
    stakes: Mutex<BTreeMap<(PoolId, AccountId), Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stake_count(&self) -> usize {
        self.stakes.lock().unwrap().len()
    }
}

impl LedgerStore for NullLedgerStore {
    fn get_account(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(account).cloned())
    }

    fn put_account(&self, account: &AccountId, state: &[u8]) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.clone(), state.to_vec());
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_stake(&self, pool: PoolId, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .stakes
            .lock()
            .unwrap()
            .get(&(pool, account.clone()))
            .cloned())
    }

    fn put_stake(&self, pool: PoolId, account: &AccountId, state: &[u8]) -> Result<(), StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .insert((pool, account.clone()), state.to_vec());
        Ok(())
    }

    fn delete_stake(&self, pool: PoolId, account: &AccountId) -> Result<(), StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .remove(&(pool, account.clone()));
        Ok(())
    }

    fn iter_stakes(&self) -> Result<Vec<(PoolId, AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .stakes
            .lock()
            .unwrap()
            .iter()
            .map(|((pool, account), bytes)| (*pool, account.clone(), bytes.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stake_records_round_trip() {
        let store = NullLedgerStore::new();
        let alice = AccountId::new("acct_alice");
        store.put_stake(PoolId::new(1), &alice, b"s").unwrap();
        assert_eq!(store.get_stake(PoolId::new(1), &alice).unwrap(), Some(b"s".to_vec()));
        assert_eq!(store.iter_stakes().unwrap().len(), 1);

        store.delete_stake(PoolId::new(1), &alice).unwrap();
        assert_eq!(store.stake_count(), 0);
    }

    #[test]
    fn meta_overwrites() {
        let store = NullLedgerStore::new();
        store.put_meta(b"k", b"1").unwrap();
        store.put_meta(b"k", b"2").unwrap();
        assert_eq!(store.get_meta(b"k").unwrap(), Some(b"2".to_vec()));
    }
}
