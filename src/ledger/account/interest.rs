use crate::ledger::{
    transaction::{self, Transaction},
    Amount, LedgerError,
};

use super::account::Account;

impl Account {
    /// Interest earned this month, according to the account's policy.
    pub fn calculate_interest(&self) -> Amount {
        self.kind.monthly_interest(self.balance.amount())
    }

    /// Add this month's interest to the balance, if there is any.
    ///
    /// Unlike deposits, this doesn't look at the account status: picking which
    /// accounts earn interest is up to the caller.
    pub fn credit_interest(&mut self) -> Result<Option<Transaction>, LedgerError> {
        let interest = self.calculate_interest();
        if interest <= Amount::ZERO {
            return Ok(None);
        }

        self.balance.add(interest)?;

        Ok(Some(self.log(
            transaction::Type::InterestCredit,
            interest,
            Some("Monthly interest credit"),
        )))
    }
}

#[cfg(test)]
mod interest_tests {
    use crate::ledger::{
        account::{Account, Kind, Status},
        transaction,
    };

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn account(kind: Kind, balance: Decimal) -> Account {
        Account::open("ACC0000000001".to_string(), "Alice", kind, balance, 1)
    }

    #[test]
    fn test_calculate_interest() {
        assert_eq!(dec!(4.0), account(Kind::Savings, dec!(1200)).calculate_interest());
        assert_eq!(dec!(0), account(Kind::Current, dec!(-500)).calculate_interest());
        assert_eq!(dec!(2.5), account(Kind::Current, dec!(1500)).calculate_interest());
    }

    #[test]
    fn test_credit_interest() {
        let mut acc = account(Kind::Savings, dec!(1200));

        let tx = acc
            .credit_interest()
            .expect("should not overflow")
            .expect("should earn interest");
        assert_eq!(dec!(1204), acc.balance());
        assert_eq!(transaction::Type::InterestCredit, tx.tx_type());
        assert_eq!(dec!(4), tx.amount());
        assert_eq!(dec!(1204), tx.balance_after());
        assert_eq!("Monthly interest credit", tx.description());
    }

    #[test]
    fn test_credit_no_interest() {
        for balance in vec![dec!(0), dec!(-500), dec!(0.01)] {
            let mut acc = account(Kind::Current, balance);

            assert_eq!(Ok(None), acc.credit_interest());
            assert_eq!(balance, acc.balance());
            assert_eq!(None, acc.last_transaction_at());
        }
    }

    #[test]
    // Status filtering is the caller's job.
    fn test_credit_interest_ignores_status() {
        let mut acc = account(Kind::Savings, dec!(1200)).with_status(Status::Frozen);

        assert!(acc.credit_interest().expect("should not overflow").is_some());
        assert_eq!(dec!(1204), acc.balance());
    }
}
