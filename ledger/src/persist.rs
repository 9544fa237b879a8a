//! Saving and restoring ledger state through a [`LedgerStore`].

use crate::access::AccessPolicy;
use crate::error::LedgerError;
use crate::ledger::{validate_params, Ledger, LedgerState};
use crate::supply::Supply;
use accrue_accrual::{AccountBalance, ActiveStakers, PoolRegistry, UserStake};
use accrue_oracle::{LpEscrow, PriceOracle};
use accrue_store::{LedgerStore, StoreError};
use accrue_types::{AccountId, LedgerParams, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Bumped whenever the layout of a persisted record changes.
pub const SCHEMA_VERSION: u32 = 1;

const META_SCHEMA: &[u8] = b"schema_version";
const META_PARAMS: &[u8] = b"params";
const META_ACCESS: &[u8] = b"access";
const META_POOLS: &[u8] = b"pools";
const META_STAKERS: &[u8] = b"active_stakers";
const META_GLOBALS: &[u8] = b"globals";

#[derive(Serialize, Deserialize)]
struct Globals {
    supply: Supply,
    last_global_update: Option<Timestamp>,
    latest_claim: HashMap<AccountId, Timestamp>,
}

impl Ledger {
    /// Write the full ledger state to `store`.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        let state = &self.state;
        store.put_meta(META_SCHEMA, &SCHEMA_VERSION.to_be_bytes())?;
        store.put_meta(META_PARAMS, &bincode::serialize(&state.params)?)?;
        store.put_meta(META_ACCESS, &bincode::serialize(&state.access)?)?;
        store.put_meta(META_POOLS, &bincode::serialize(&state.pools)?)?;
        store.put_meta(META_STAKERS, &bincode::serialize(&state.stakers)?)?;
        let globals = Globals {
            supply: state.supply,
            last_global_update: state.last_global_update,
            latest_claim: state.latest_claim.clone(),
        };
        store.put_meta(META_GLOBALS, &bincode::serialize(&globals)?)?;

        for (account, balance) in &state.accounts {
            store.put_account(account, &bincode::serialize(balance)?)?;
        }

        for (pool, account, _) in store.iter_stakes()? {
            if self.stake_of(&account, pool).is_none() {
                store.delete_stake(pool, &account)?;
            }
        }
        for (account, held) in &state.stakes {
            for (pool, stake) in held {
                store.put_stake(*pool, account, &bincode::serialize(stake)?)?;
            }
        }

        tracing::debug!(
            accounts = state.accounts.len(),
            stakers = state.stakers.len(),
            pools = state.pools.len(),
            "ledger saved"
        );
        Ok(())
    }

    /// Restore a ledger from `store`. Fails if the store was never written.
    pub fn load_from_store(
        store: &dyn LedgerStore,
        oracle: Arc<dyn PriceOracle>,
        escrow: Arc<dyn LpEscrow>,
    ) -> Result<Self, LedgerError> {
        let version = match store.get_meta(META_SCHEMA)? {
            Some(bytes) => {
                let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption("schema version is not 4 bytes".into())
                })?;
                u32::from_be_bytes(raw)
            }
            None => return Err(StoreError::NotFound("ledger has not been saved".into()).into()),
        };
        if version != SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                found: version,
            }
            .into());
        }

        let params: LedgerParams = read_meta(store, META_PARAMS)?;
        validate_params(&params)?;
        let access: AccessPolicy = read_meta(store, META_ACCESS)?;
        let pools: PoolRegistry = read_meta(store, META_POOLS)?;
        let stakers: ActiveStakers = read_meta(store, META_STAKERS)?;
        let globals: Globals = read_meta(store, META_GLOBALS)?;

        let mut state = LedgerState::new(params, access.admin().clone());
        state.access = access;
        state.pools = pools;
        state.stakers = stakers;
        state.supply = globals.supply;
        state.last_global_update = globals.last_global_update;
        state.latest_claim = globals.latest_claim;

        for (account, bytes) in store.iter_accounts()? {
            let balance: AccountBalance = bincode::deserialize(&bytes)?;
            state.accounts.insert(account, balance);
        }
        for (pool, account, bytes) in store.iter_stakes()? {
            state.pools.get(pool)?;
            let stake: UserStake = bincode::deserialize(&bytes)?;
            state.stakes.entry(account).or_default().insert(pool, stake);
        }

        tracing::info!(
            accounts = state.accounts.len(),
            stakers = state.stakers.len(),
            pools = state.pools.len(),
            minted = state.supply.minted,
            "ledger restored"
        );
        Ok(Ledger::from_state(state, oracle, escrow))
    }
}

fn read_meta<T: serde::de::DeserializeOwned>(
    store: &dyn LedgerStore,
    key: &[u8],
) -> Result<T, LedgerError> {
    let bytes = store.get_meta(key)?.ok_or_else(|| {
        StoreError::Corruption(format!("missing {}", String::from_utf8_lossy(key)))
    })?;
    Ok(bincode::deserialize(&bytes)?)
}
