use crate::ledger::{bounded, Amount, LedgerError};

/// A signed balance. Current accounts can go below zero, down to their
/// overdraft limit, so a negative balance is a perfectly valid state.
///
/// All arithmetic is checked: a balance never silently wraps or saturates, and
/// never leaves the range of the balance column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Balance(Amount);

impl Balance {
    pub fn amount(&self) -> Amount {
        self.0
    }

    pub fn add(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.0 = bounded(self.0.checked_add(amount).ok_or(LedgerError::Overflow)?)?;

        Ok(())
    }

    pub fn subtract(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.0 = bounded(self.0.checked_sub(amount).ok_or(LedgerError::Overflow)?)?;

        Ok(())
    }

    pub const fn new(amount: Amount) -> Self {
        Self(amount)
    }
}
