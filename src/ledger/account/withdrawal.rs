use crate::ledger::{
    transaction::{self, Transaction},
    Amount, LedgerError,
};

use super::account::Account;

impl Account {
    pub fn withdraw(
        &mut self,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        self.debit(transaction::Type::Withdrawal, amount, description)
    }

    /// Take money out of an active account, as long as the balance stays at or
    /// above the account's minimum. Withdrawals and the debit leg of
    /// transfers both go through here.
    pub(crate) fn debit(
        &mut self,
        tx_type: transaction::Type,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        self.ensure_active()?;

        let minimum = self.minimum_balance();
        let remaining = self
            .balance
            .amount()
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        if remaining < minimum {
            return Err(LedgerError::InsufficientFunds { minimum });
        }

        self.balance.subtract(amount)?;

        Ok(self.log(tx_type, amount, description))
    }
}

#[cfg(test)]
mod withdrawal_tests {
    use crate::ledger::{
        account::{Account, Kind, Status},
        transaction, LedgerError,
    };

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn account(kind: Kind, balance: Decimal) -> Account {
        Account::open("ACC0000000001".to_string(), "Alice", kind, balance, 1)
    }

    #[test]
    fn test_withdrawal_ok() {
        let mut acc = account(Kind::Savings, dec!(1500));

        let tx = acc.withdraw(dec!(400), None).expect("should withdraw");
        assert_eq!(dec!(1100), acc.balance());
        assert_eq!(transaction::Type::Withdrawal, tx.tx_type());
        assert_eq!(dec!(400), tx.amount());
        assert_eq!(dec!(1100), tx.balance_after());
    }

    #[test]
    // A withdrawal succeeds iff the remaining balance is at least the minimum.
    fn test_withdrawal_minimum_balance() {
        for (kind, balance, amount, ok) in vec![
            (Kind::Savings, dec!(1500), dec!(500), true),
            (Kind::Savings, dec!(1500), dec!(500.01), false),
            (Kind::Savings, dec!(1500), dec!(600), false),
            (Kind::Savings, dec!(1000), dec!(0.01), false),
            (Kind::Current, dec!(0), dec!(10000), true),
            (Kind::Current, dec!(0), dec!(10000.01), false),
            (Kind::Current, dec!(-9000), dec!(1000), true),
            (Kind::Current, dec!(-9000), dec!(1001), false),
            (Kind::Current, dec!(500), dec!(200), true),
        ] {
            let mut acc = account(kind, balance);
            let got = acc.withdraw(amount, None);

            if ok {
                assert!(got.is_ok(), "{} {} - {}", kind, balance, amount);
                assert_eq!(balance - amount, acc.balance());
            } else {
                assert_eq!(
                    Err(LedgerError::InsufficientFunds {
                        minimum: kind.minimum_balance()
                    }),
                    got
                );
                assert_eq!(balance, acc.balance());
                assert_eq!(None, acc.last_transaction_at());
            }
        }
    }

    #[test]
    fn test_withdrawal_invalid_amount() {
        for amount in vec![dec!(0), dec!(-100), dec!(0.004)] {
            let mut acc = account(Kind::Current, dec!(100));

            let got = acc.withdraw(amount, None);
            assert_eq!(Err(LedgerError::InvalidAmount(amount)), got);
            assert_eq!(dec!(100), acc.balance());
        }
    }

    #[test]
    fn test_withdrawal_not_active() {
        for status in vec![Status::Inactive, Status::Closed, Status::Frozen] {
            let mut acc = account(Kind::Current, dec!(100)).with_status(status);

            let got = acc.withdraw(dec!(10), None);
            assert_eq!(
                Err(LedgerError::AccountNotActive("ACC0000000001".to_string())),
                got
            );
            assert_eq!(dec!(100), acc.balance());
        }
    }

    #[test]
    fn test_debit_transfer_leg() {
        let mut acc = account(Kind::Current, dec!(0));

        let tx = acc
            .debit(transaction::Type::TransferOut, dec!(200), None)
            .expect("should debit within the overdraft");
        assert_eq!(transaction::Type::TransferOut, tx.tx_type());
        assert_eq!(dec!(-200), tx.balance_after());
        assert_eq!(dec!(-200), acc.balance());
    }
}
