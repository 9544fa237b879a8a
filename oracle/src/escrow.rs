//! In-memory LP custody ledger.

use crate::error::EscrowError;
use crate::LpEscrow;
use accrue_types::{AccountId, LpTokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Book {
    wallets: HashMap<(LpTokenId, AccountId), u128>,
    escrowed: HashMap<LpTokenId, u128>,
}

/// Serializable copy of an [`EscrowBook`], sorted so equal books encode to
/// equal bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowSnapshot {
    pub wallets: Vec<(LpTokenId, AccountId, u128)>,
    pub escrowed: Vec<(LpTokenId, u128)>,
}

/// Tracks LP-token wallet balances and the amount held in escrow per token.
///
/// Stands in for the real LP token contracts when the ledger runs as a
/// standalone process: wallets are funded explicitly with [`EscrowBook::fund`].
#[derive(Debug, Default)]
pub struct EscrowBook {
    book: Mutex<Book>,
}

impl EscrowBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Book> {
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Credit `amount` of `lp_token` to `account`'s wallet.
    pub fn fund(
        &self,
        lp_token: &LpTokenId,
        account: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        let mut book = self.lock();
        let wallet = book
            .wallets
            .entry((lp_token.clone(), account.clone()))
            .or_insert(0);
        *wallet = wallet.checked_add(amount).ok_or(EscrowError::Overflow)?;
        Ok(())
    }

    /// LP tokens `account` holds outside escrow.
    pub fn wallet_balance(&self, lp_token: &LpTokenId, account: &AccountId) -> u128 {
        self.lock()
            .wallets
            .get(&(lp_token.clone(), account.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// LP tokens of `lp_token` currently held in escrow.
    pub fn escrowed(&self, lp_token: &LpTokenId) -> u128 {
        self.lock().escrowed.get(lp_token).copied().unwrap_or(0)
    }

    /// Add `amount` to the escrowed total of `lp_token` without debiting a
    /// wallet. Used to rebuild custody for stakes restored without a book.
    pub fn hold(&self, lp_token: &LpTokenId, amount: u128) -> Result<(), EscrowError> {
        let mut book = self.lock();
        let held = book.escrowed.entry(lp_token.clone()).or_insert(0);
        *held = held.checked_add(amount).ok_or(EscrowError::Overflow)?;
        Ok(())
    }

    pub fn snapshot(&self) -> EscrowSnapshot {
        let book = self.lock();
        let mut wallets: Vec<_> = book
            .wallets
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|((lp, account), amount)| (lp.clone(), account.clone(), *amount))
            .collect();
        wallets.sort();
        let mut escrowed: Vec<_> = book
            .escrowed
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(lp, amount)| (lp.clone(), *amount))
            .collect();
        escrowed.sort();
        EscrowSnapshot { wallets, escrowed }
    }

    /// Replace the whole book with `snapshot`.
    pub fn restore(&self, snapshot: EscrowSnapshot) {
        let mut book = self.lock();
        book.wallets = snapshot
            .wallets
            .into_iter()
            .map(|(lp, account, amount)| ((lp, account), amount))
            .collect();
        book.escrowed = snapshot.escrowed.into_iter().collect();
        tracing::debug!(
            wallets = book.wallets.len(),
            tokens = book.escrowed.len(),
            "escrow book restored"
        );
    }
}

impl LpEscrow for EscrowBook {
    fn transfer_from(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        let mut book = self.lock();
        let key = (lp_token.clone(), staker.clone());
        let available = book.wallets.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(EscrowError::InsufficientFunds {
                lp_token: lp_token.clone(),
                account: staker.clone(),
                needed: amount,
                available,
            });
        }
        let held = book.escrowed.get(lp_token).copied().unwrap_or(0);
        let held = held.checked_add(amount).ok_or(EscrowError::Overflow)?;
        book.wallets.insert(key, available - amount);
        book.escrowed.insert(lp_token.clone(), held);
        tracing::trace!(lp = %lp_token, staker = %staker, amount, "lp tokens escrowed");
        Ok(())
    }

    fn transfer(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        let mut book = self.lock();
        let held = book.escrowed.get(lp_token).copied().unwrap_or(0);
        if held < amount {
            return Err(EscrowError::InsufficientEscrow {
                lp_token: lp_token.clone(),
                needed: amount,
                available: held,
            });
        }
        let key = (lp_token.clone(), staker.clone());
        let wallet = book.wallets.get(&key).copied().unwrap_or(0);
        let wallet = wallet.checked_add(amount).ok_or(EscrowError::Overflow)?;
        book.escrowed.insert(lp_token.clone(), held - amount);
        book.wallets.insert(key, wallet);
        tracing::trace!(lp = %lp_token, staker = %staker, amount, "lp tokens released");
        Ok(())
    }
}
