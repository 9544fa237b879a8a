//! Nullable LP escrow: records transfers instead of moving tokens.

use accrue_oracle::{EscrowError, LpEscrow};
use accrue_types::{AccountId, LpTokenId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One call the ledger made into escrow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EscrowCall {
    Pull {
        lp_token: LpTokenId,
        staker: AccountId,
        amount: u128,
    },
    Release {
        lp_token: LpTokenId,
        staker: AccountId,
        amount: u128,
    },
}

/// An escrow that accepts every transfer and remembers it, unless told to
/// reject.
#[derive(Debug, Default)]
pub struct NullEscrow {
    calls: Mutex<Vec<EscrowCall>>,
    rejecting: AtomicBool,
}

impl NullEscrow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent transfer fail (or succeed again).
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Accepted calls, oldest first.
    pub fn calls(&self) -> Vec<EscrowCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Net LP tokens `staker` has in escrow for `lp_token`.
    pub fn held(&self, lp_token: &LpTokenId, staker: &AccountId) -> i128 {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| match call {
                EscrowCall::Pull { lp_token: l, staker: s, amount } if l == lp_token && s == staker => {
                    *amount as i128
                }
                EscrowCall::Release { lp_token: l, staker: s, amount } if l == lp_token && s == staker => {
                    -(*amount as i128)
                }
                _ => 0,
            })
            .sum()
    }

    fn record(&self, call: EscrowCall) -> Result<(), EscrowError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(EscrowError::Rejected("null escrow set to reject".into()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl LpEscrow for NullEscrow {
    fn transfer_from(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        self.record(EscrowCall::Pull {
            lp_token: lp_token.clone(),
            staker: staker.clone(),
            amount,
        })
    }

    fn transfer(
        &self,
        lp_token: &LpTokenId,
        staker: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        self.record(EscrowCall::Release {
            lp_token: lp_token.clone(),
            staker: staker.clone(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_net_holdings() {
        let escrow = NullEscrow::new();
        let lp = LpTokenId::new("lp");
        let alice = AccountId::new("acct_alice");
        escrow.transfer_from(&lp, &alice, 10).unwrap();
        escrow.transfer(&lp, &alice, 4).unwrap();
        assert_eq!(escrow.held(&lp, &alice), 6);
        assert_eq!(escrow.calls().len(), 2);
    }

    #[test]
    fn rejecting_escrow_records_nothing() {
        let escrow = NullEscrow::new();
        escrow.set_rejecting(true);
        let err = escrow
            .transfer_from(&LpTokenId::new("lp"), &AccountId::new("acct_alice"), 1)
            .unwrap_err();
        assert!(matches!(err, EscrowError::Rejected(_)));
        assert!(escrow.calls().is_empty());
    }
}
