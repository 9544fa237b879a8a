use accrue_types::{AccountId, PoolId};

use crate::StoreError;

/// Store trait for persisting ledger state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on `accrue-ledger`
/// (which would create a circular dependency). The ledger serializes and
/// deserializes its own types.
///
/// Layout: one record per account balance, one per (pool, account) stake,
/// and named metadata blobs for the pool array and global scalars.
pub trait LedgerStore {
    fn get_account(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_account(&self, account: &AccountId, state: &[u8]) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_stake(&self, pool: PoolId, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_stake(&self, pool: PoolId, account: &AccountId, state: &[u8]) -> Result<(), StoreError>;
    fn delete_stake(&self, pool: PoolId, account: &AccountId) -> Result<(), StoreError>;
    fn iter_stakes(&self) -> Result<Vec<(PoolId, AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
