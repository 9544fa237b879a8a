//! Set of accounts holding a nonzero stake in at least one pool.

use accrue_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense member list plus an index map, so insert, membership and removal
/// are all O(1). Removal swaps the last member into the vacated slot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActiveStakers {
    members: Vec<AccountId>,
    index: HashMap<AccountId, usize>,
}

impl ActiveStakers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.index.contains_key(account)
    }

    /// Add `account`. Returns `false` if it was already a member.
    pub fn insert(&mut self, account: AccountId) -> bool {
        if self.index.contains_key(&account) {
            return false;
        }
        self.index.insert(account.clone(), self.members.len());
        self.members.push(account);
        true
    }

    /// Remove `account`. Returns `false` if it was not a member.
    pub fn remove(&mut self, account: &AccountId) -> bool {
        let Some(slot) = self.index.remove(account) else {
            return false;
        };
        self.members.swap_remove(slot);
        if let Some(moved) = self.members.get(slot) {
            self.index.insert(moved.clone(), slot);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.members.iter()
    }
}
