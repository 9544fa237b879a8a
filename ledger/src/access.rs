//! Who may call the privileged operations.

use crate::error::LedgerError;
use accrue_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One administrator plus a set of designated minters.
///
/// The administrator can always mint; minters can only mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    admin: AccountId,
    minters: BTreeSet<AccountId>,
}

impl AccessPolicy {
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            minters: BTreeSet::new(),
        }
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn is_admin(&self, account: &AccountId) -> bool {
        &self.admin == account
    }

    pub fn is_minter(&self, account: &AccountId) -> bool {
        self.is_admin(account) || self.minters.contains(account)
    }

    pub fn minters(&self) -> impl Iterator<Item = &AccountId> {
        self.minters.iter()
    }

    pub fn ensure_admin(&self, caller: &AccountId, action: &'static str) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                action,
            })
        }
    }

    pub fn ensure_minter(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_minter(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                action: "mint",
            })
        }
    }

    /// Returns `false` if `account` already was a minter.
    pub(crate) fn grant(&mut self, account: AccountId) -> bool {
        self.minters.insert(account)
    }

    /// Returns `false` if `account` was not a minter.
    pub(crate) fn revoke(&mut self, account: &AccountId) -> bool {
        self.minters.remove(account)
    }
}
