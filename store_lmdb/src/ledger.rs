//! LMDB implementation of LedgerStore.
//!
//! Stake key format: `pool_id (4 bytes, big endian) ++ account id bytes`,
//! so all stakes of one pool sort together.

use accrue_store::{LedgerStore, StoreError};
use accrue_types::{AccountId, PoolId};
use heed::types::Bytes;
use heed::Database;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

pub struct LmdbLedgerStore {
    env: LmdbEnvironment,
}

impl LmdbLedgerStore {
    pub fn new(env: LmdbEnvironment) -> Self {
        Self { env }
    }

    fn get(&self, db: Database<Bytes, Bytes>, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let val = db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn put(&self, db: Database<Bytes, Bytes>, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn entries(&self, db: Database<Bytes, Bytes>) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for result in db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, val) = result.map_err(LmdbError::from)?;
            out.push((key.to_vec(), val.to_vec()));
        }
        Ok(out)
    }
}

fn stake_key(pool: PoolId, account: &AccountId) -> Vec<u8> {
    let id = account.as_str().as_bytes();
    let mut key = Vec::with_capacity(4 + id.len());
    key.extend_from_slice(&pool.get().to_be_bytes());
    key.extend_from_slice(id);
    key
}

fn parse_account(bytes: &[u8]) -> Result<AccountId, LmdbError> {
    let raw = std::str::from_utf8(bytes).map_err(|e| LmdbError::BadKey(e.to_string()))?;
    AccountId::parse(raw).map_err(|e| LmdbError::BadKey(e.to_string()))
}

fn parse_stake_key(key: &[u8]) -> Result<(PoolId, AccountId), LmdbError> {
    if key.len() < 4 {
        return Err(LmdbError::BadKey(format!("stake key of {} bytes", key.len())));
    }
    let (pool, account) = key.split_at(4);
    let mut raw = [0u8; 4];
    raw.copy_from_slice(pool);
    Ok((PoolId::new(u32::from_be_bytes(raw)), parse_account(account)?))
}

impl LedgerStore for LmdbLedgerStore {
    fn get_account(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.env.accounts_db, account.as_str().as_bytes())
    }

    fn put_account(&self, account: &AccountId, state: &[u8]) -> Result<(), StoreError> {
        self.put(self.env.accounts_db, account.as_str().as_bytes(), state)
    }

    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        self.entries(self.env.accounts_db)?
            .into_iter()
            .map(|(key, val)| -> Result<_, StoreError> { Ok((parse_account(&key)?, val)) })
            .collect()
    }

    fn get_stake(&self, pool: PoolId, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.env.stakes_db, &stake_key(pool, account))
    }

    fn put_stake(&self, pool: PoolId, account: &AccountId, state: &[u8]) -> Result<(), StoreError> {
        self.put(self.env.stakes_db, &stake_key(pool, account), state)
    }

    fn delete_stake(&self, pool: PoolId, account: &AccountId) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .stakes_db
            .delete(&mut wtxn, &stake_key(pool, account))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_stakes(&self) -> Result<Vec<(PoolId, AccountId, Vec<u8>)>, StoreError> {
        self.entries(self.env.stakes_db)?
            .into_iter()
            .map(|(key, val)| -> Result<_, StoreError> {
                let (pool, account) = parse_stake_key(&key)?;
                Ok((pool, account, val))
            })
            .collect()
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.env.meta_db, key)
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.put(self.env.meta_db, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;

    fn open() -> (tempfile::TempDir, LmdbLedgerStore) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        (dir, LmdbLedgerStore::new(env))
    }

    #[test]
    fn stake_keys_round_trip() {
        let account = AccountId::new("acct_alice");
        let key = stake_key(PoolId::new(7), &account);
        assert_eq!(parse_stake_key(&key).unwrap(), (PoolId::new(7), account));
        assert!(parse_stake_key(&[0, 1]).is_err());
    }

    #[test]
    fn accounts_and_meta_persist() {
        let (_dir, store) = open();
        let alice = AccountId::new("acct_alice");
        assert_eq!(store.get_account(&alice).unwrap(), None);
        store.put_account(&alice, b"state").unwrap();
        store.put_meta(b"k", b"v").unwrap();
        assert_eq!(store.get_account(&alice).unwrap(), Some(b"state".to_vec()));
        assert_eq!(store.get_meta(b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.iter_accounts().unwrap(), vec![(alice, b"state".to_vec())]);
    }

    #[test]
    fn stakes_sort_by_pool_and_delete() {
        let (_dir, store) = open();
        let alice = AccountId::new("acct_alice");
        let bob = AccountId::new("acct_bob");
        store.put_stake(PoolId::new(1), &alice, b"a1").unwrap();
        store.put_stake(PoolId::new(0), &bob, b"b0").unwrap();
        let pools: Vec<_> = store
            .iter_stakes()
            .unwrap()
            .into_iter()
            .map(|(pool, account, _)| (pool.get(), account))
            .collect();
        assert_eq!(pools, vec![(0, bob.clone()), (1, alice.clone())]);

        store.delete_stake(PoolId::new(0), &bob).unwrap();
        assert_eq!(store.get_stake(PoolId::new(0), &bob).unwrap(), None);
        assert_eq!(store.iter_stakes().unwrap().len(), 1);
    }
}
