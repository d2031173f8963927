pub mod account;
pub mod auth;
pub mod error;
pub mod events;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod locks;
pub mod process;
pub mod store;
pub mod transaction;
pub mod user;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the following, when creating the accounts table:
// (1) accounts: BTreeMap<String, Account>
// (2) accounts: BTreeMap<AccountNumber, Account>
// Implementation (1) would most likely need comments, and could be confusing.
// Implementation (2) is self-explanatory.
pub type AccountNumber = String;
pub type CustomerId = u32;
pub type UserId = u32;
pub type TransactionId = String;
pub type ReferenceNumber = String;

// I decided to use a decimal library instead of the built-in f64 type, to be
// safer when dealing with money, and making the decimal precision easier to
// deal with.
pub type Amount = rust_decimal::Decimal;

// Matches the DECIMAL(15,2) columns of the accounts and transactions tables.
const DECIMAL_PRECISION: u32 = 2;

// Largest absolute amount a DECIMAL(15,2) column holds.
pub const MAX_AMOUNT: Amount = rust_decimal_macros::dec!(9999999999999.99);

/// Refuse amounts that wouldn't fit the balance and amount columns.
pub fn bounded(amount: Amount) -> Result<Amount, LedgerError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(LedgerError::Overflow);
    }

    Ok(amount)
}

/// Add amounts without ever panicking or leaving the column range.
pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Result<Amount, LedgerError> {
    amounts.into_iter().try_fold(Amount::ZERO, |total, amount| {
        bounded(total.checked_add(amount).ok_or(LedgerError::Overflow)?)
    })
}

/// Round an amount to the precision balances are stored with.
pub fn round(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(
        DECIMAL_PRECISION,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}

pub use account::{Account, Kind, Status};
pub use error::LedgerError;
pub use ledger::{InterestRun, Ledger, Transfer};
pub use transaction::Transaction;

#[test]
// Amounts are kept at 2 decimal places, rounding half away from zero.
fn test_round() {
    use rust_decimal_macros::dec;

    for (raw_amount, want_amount) in vec![
        (dec!(1.0), dec!(1.0)),
        (dec!(0.999), dec!(1.0)),
        (dec!(3.33333), dec!(3.33)),
        (dec!(2.345), dec!(2.35)),
        (dec!(-2.345), dec!(-2.35)),
        (dec!(1.2349), dec!(1.23)),
    ] {
        assert_eq!(want_amount, round(raw_amount));
    }
}

#[test]
fn test_checked_sum() {
    use rust_decimal_macros::dec;

    assert_eq!(Ok(dec!(0)), checked_sum(vec![]));
    assert_eq!(Ok(dec!(3.5)), checked_sum(vec![dec!(1), dec!(2.5)]));
    assert_eq!(Ok(MAX_AMOUNT), checked_sum(vec![MAX_AMOUNT]));
    assert_eq!(Ok(MAX_AMOUNT), bounded(MAX_AMOUNT));
    assert_eq!(Err(LedgerError::Overflow), bounded(-MAX_AMOUNT - dec!(0.01)));
    assert_eq!(
        Err(LedgerError::Overflow),
        checked_sum(vec![MAX_AMOUNT, dec!(0.01)])
    );
    // Would overflow the decimal mantissa itself.
    assert_eq!(
        Err(LedgerError::Overflow),
        checked_sum(vec![Amount::MAX, Amount::MAX])
    );
}
