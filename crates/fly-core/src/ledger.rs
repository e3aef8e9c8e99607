//! Remaining issuable supply.
//!
//! The ledger only ever shrinks. A debit that would take it below zero is
//! refused and leaves the balance untouched, so the caller can stop before
//! committing an over-distribution.

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyLedger {
    remaining: f64,
}

impl SupplyLedger {
    pub fn new(initial_supply: f64) -> Self {
        Self {
            remaining: initial_supply,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Debit `amount` and return the new remaining supply.
    ///
    /// `amount` must be finite and strictly positive. On
    /// [`LedgerError::Overdraft`] the balance is unchanged.
    pub fn debit(&mut self, amount: f64) -> Result<f64, LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let next = self.remaining - amount;
        if next < 0.0 {
            return Err(LedgerError::Overdraft {
                requested: amount,
                available: self.remaining,
            });
        }
        self.remaining = next;
        Ok(next)
    }
}
