use super::store::StoreError;
use super::{AccountNumber, Amount};
use thiserror::Error;

/// Everything that can go wrong when operating on the ledger.
///
/// Errors are returned to the caller as-is: there is no translation layer, so
/// the messages are meant to be shown directly.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// Deposits, withdrawals and transfers only accept strictly positive amounts.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Amount),

    /// The account is closed, frozen or inactive.
    #[error("account {0} is not active")]
    AccountNotActive(AccountNumber),

    /// The operation would take the balance below the account minimum.
    #[error("insufficient funds: balance may not go below {minimum}")]
    InsufficientFunds { minimum: Amount },

    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),

    #[error("invalid credentials")]
    AuthenticationFailure,

    /// Registering a user whose username or email is already in use.
    #[error("user {0} already exists")]
    UserExists(String),

    #[error("cannot transfer from account {0} to itself")]
    SameAccountTransfer(AccountNumber),

    /// An amount or balance wouldn't fit the DECIMAL(15,2) columns.
    #[error("balance overflow")]
    Overflow,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
