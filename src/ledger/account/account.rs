use crate::ledger::{
    bounded, round,
    transaction::{self, Transaction},
    AccountNumber, Amount, CustomerId, LedgerError,
};

use super::{balance::Balance, kind::Kind, status::Status};
use chrono::{DateTime, Utc};
use std::fmt;

/// Account is a small state machine: every balance change goes through one of
/// its operations, which validate the change, apply it, and hand back the
/// journal entry describing it.
///
/// A failed operation leaves the account untouched.
///
/// The account does not keep its own history: the store owns the journal, and
/// the ledger commits the returned entries together with the new balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub(super) number: AccountNumber,
    pub(super) holder_name: String,
    pub(super) customer_id: CustomerId,
    pub(super) kind: Kind,
    pub(super) balance: Balance,
    pub(super) status: Status,
    pub(super) created_at: DateTime<Utc>,
    pub(super) last_transaction_at: Option<DateTime<Utc>>,
}

impl Account {
    /// A freshly opened account is always active.
    pub fn open(
        number: AccountNumber,
        holder_name: &str,
        kind: Kind,
        initial_balance: Amount,
        customer_id: CustomerId,
    ) -> Self {
        Self {
            number,
            holder_name: holder_name.to_owned(),
            customer_id,
            kind,
            balance: Balance::new(round(initial_balance)),
            status: Status::Active,
            created_at: Utc::now(),
            last_transaction_at: None,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn balance(&self) -> Amount {
        self.balance.amount()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_transaction_at(&self) -> Option<DateTime<Utc>> {
        self.last_transaction_at
    }

    pub fn minimum_balance(&self) -> Amount {
        self.kind.minimum_balance()
    }

    /// Closing is terminal: a closed account can't be closed again, nor
    /// accept any more deposits or withdrawals.
    pub fn close(&mut self) -> Result<(), LedgerError> {
        if self.status == Status::Closed {
            return Err(LedgerError::AccountNotActive(self.number.clone()));
        }
        self.status = Status::Closed;

        Ok(())
    }

    pub(super) fn ensure_active(&self) -> Result<(), LedgerError> {
        if !self.is_active() {
            return Err(LedgerError::AccountNotActive(self.number.clone()));
        }

        Ok(())
    }

    // Amounts are rounded to cents before being checked, so that a deposit of
    // 0.001 is refused instead of turning into a deposit of 0.00.
    pub(super) fn validate_amount(amount: Amount) -> Result<Amount, LedgerError> {
        let rounded = round(amount);
        if rounded <= Amount::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        bounded(rounded)
    }

    /// Build the journal entry for a change that was just applied.
    pub(super) fn log(
        &mut self,
        tx_type: transaction::Type,
        amount: Amount,
        description: Option<&str>,
    ) -> Transaction {
        let tx = Transaction::new(
            &self.number,
            tx_type,
            amount,
            self.balance.amount(),
            description,
        );
        self.last_transaction_at = Some(tx.timestamp());

        tx
    }

    #[cfg(test)]
    pub(crate) fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Account: {} - {} ({:.2})",
            self.kind,
            self.number,
            self.holder_name,
            self.balance.amount()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::{
        account::{Account, Kind, Status},
        LedgerError,
    };

    use rust_decimal_macros::dec;

    #[test]
    fn test_open() {
        let acc = Account::open(
            "ACC0000000001".to_string(),
            "Alice",
            Kind::Savings,
            dec!(1000.004),
            7,
        );

        assert_eq!("ACC0000000001", acc.number());
        assert_eq!("Alice", acc.holder_name());
        assert_eq!(7, acc.customer_id());
        assert_eq!(dec!(1000.00), acc.balance());
        assert_eq!(Status::Active, acc.status());
        assert_eq!(None, acc.last_transaction_at());
    }

    #[test]
    fn test_close() {
        let mut acc = Account::open("ACC0000000001".to_string(), "Bob", Kind::Current, dec!(0), 1);

        acc.close().expect("should close an active account");
        assert_eq!(Status::Closed, acc.status());

        assert_eq!(
            Err(LedgerError::AccountNotActive("ACC0000000001".to_string())),
            acc.close()
        );
    }

    #[test]
    fn test_close_frozen_account() {
        let mut acc = Account::open("ACC0000000001".to_string(), "Bob", Kind::Current, dec!(0), 1)
            .with_status(Status::Frozen);

        acc.close().expect("should close a frozen account");
        assert_eq!(Status::Closed, acc.status());
    }

    #[test]
    fn test_display() {
        let acc = Account::open(
            "ACC0000000042".to_string(),
            "Carol",
            Kind::Savings,
            dec!(1500),
            3,
        );
        assert_eq!(
            "SAVINGS Account: ACC0000000042 - Carol (1500.00)",
            acc.to_string()
        );
    }
}
