use crate::ledger::{
    transaction::{self, Transaction},
    Amount, LedgerError,
};

use super::account::Account;

impl Account {
    pub fn deposit(
        &mut self,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        self.credit(transaction::Type::Deposit, amount, description)
    }

    /// Add money to an active account, logging it as `tx_type`.
    /// Deposits and the credit leg of transfers both go through here.
    pub(crate) fn credit(
        &mut self,
        tx_type: transaction::Type,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        self.ensure_active()?;

        self.balance.add(amount)?;

        Ok(self.log(tx_type, amount, description))
    }
}

#[cfg(test)]
mod deposit_tests {
    use crate::ledger::{
        account::{Account, Kind, Status},
        transaction, LedgerError,
    };

    use rust_decimal_macros::dec;

    fn savings(balance: rust_decimal::Decimal) -> Account {
        Account::open("ACC0000000001".to_string(), "Alice", Kind::Savings, balance, 1)
    }

    #[test]
    fn test_deposit_ok() {
        let mut acc = savings(dec!(1000));

        let tx = acc.deposit(dec!(500), None).expect("should deposit");
        assert_eq!(dec!(1500), acc.balance());
        assert_eq!(transaction::Type::Deposit, tx.tx_type());
        assert_eq!(dec!(500), tx.amount());
        assert_eq!(dec!(1500), tx.balance_after());
        assert_eq!("ACC0000000001", tx.account_number());
        assert_eq!(Some(tx.timestamp()), acc.last_transaction_at());
    }

    #[test]
    fn test_deposit_invalid_amount() {
        for amount in vec![dec!(0), dec!(-1), dec!(-0.01), dec!(0.001)] {
            let mut acc = savings(dec!(1000));

            let got = acc.deposit(amount, None);
            assert_eq!(Err(LedgerError::InvalidAmount(amount)), got);
            assert_eq!(dec!(1000), acc.balance());
            assert_eq!(None, acc.last_transaction_at());
        }
    }

    #[test]
    fn test_deposit_not_active() {
        for status in vec![Status::Inactive, Status::Closed, Status::Frozen] {
            let mut acc = savings(dec!(1000)).with_status(status);

            let got = acc.deposit(dec!(10), None);
            assert_eq!(
                Err(LedgerError::AccountNotActive("ACC0000000001".to_string())),
                got
            );
            assert_eq!(dec!(1000), acc.balance());
        }
    }

    #[test]
    // The amount is validated before the status.
    fn test_deposit_invalid_amount_on_closed_account() {
        let mut acc = savings(dec!(1000)).with_status(Status::Closed);

        let got = acc.deposit(dec!(0), None);
        assert_eq!(Err(LedgerError::InvalidAmount(dec!(0))), got);
    }

    #[test]
    fn test_credit_transfer_leg() {
        let mut acc = savings(dec!(1000));

        let tx = acc
            .credit(transaction::Type::TransferIn, dec!(200), Some("rent"))
            .expect("should credit");
        assert_eq!(transaction::Type::TransferIn, tx.tx_type());
        assert_eq!("rent", tx.description());
        assert_eq!(dec!(1200), tx.balance_after());
    }
}
