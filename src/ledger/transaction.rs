use super::{round, AccountNumber, Amount, ReferenceNumber, TransactionId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Type {
    Deposit,        // Credit made by the account holder.
    Withdrawal,     // Debit made by the account holder.
    TransferIn,     // Credit leg of a transfer.
    TransferOut,    // Debit leg of a transfer.
    InterestCredit, // Monthly interest.
    InitialDeposit, // Opening balance of a new account.
}

impl Type {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Type::Deposit => "DEPOSIT",
            Type::Withdrawal => "WITHDRAWAL",
            Type::TransferIn => "TRANSFER_IN",
            Type::TransferOut => "TRANSFER_OUT",
            Type::InterestCredit => "INTEREST_CREDIT",
            Type::InitialDeposit => "INITIAL_DEPOSIT",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the journal. Transactions are created once, when the balance
/// changes, and never updated afterwards: there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "transaction_id")]
    id: TransactionId,
    account_number: AccountNumber,
    #[serde(rename = "transaction_type")]
    tx_type: Type,
    amount: Amount,
    balance_after: Amount,
    timestamp: DateTime<Utc>,
    description: String,
    reference_number: Option<ReferenceNumber>,
}

impl Transaction {
    // The new() function ensures we can only log amounts with a decimal precision of 2.
    pub(crate) fn new(
        account_number: &str,
        tx_type: Type,
        amount: Amount,
        balance_after: Amount,
        description: Option<&str>,
    ) -> Self {
        let timestamp = Utc::now();
        let amount = round(amount);
        let description = match description {
            Some(description) => description.to_owned(),
            None => format!("{} of {:.2}", tx_type, amount),
        };

        Self {
            id: transaction_id(timestamp),
            account_number: account_number.to_owned(),
            tx_type,
            amount,
            balance_after: round(balance_after),
            timestamp,
            description,
            reference_number: None,
        }
    }

    /// Link this transaction to the other leg of a transfer.
    pub(crate) fn with_reference(mut self, reference_number: &str) -> Self {
        self.reference_number = Some(reference_number.to_owned());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn tx_type(&self) -> Type {
        self.tx_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn balance_after(&self) -> Amount {
        self.balance_after
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reference_number(&self) -> Option<&str> {
        self.reference_number.as_deref()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {:.2} | Balance: {:.2} | {} | {}",
            self.id,
            self.tx_type,
            self.amount,
            self.balance_after,
            self.timestamp.format("%d-%m-%Y %H:%M:%S"),
            self.description
        )
    }
}

// Time based, plus a per-process counter so that ids generated within the
// same millisecond don't collide. The counter starts at a random point, which
// makes two processes sharing a store unlikely to walk the same sequence.
fn transaction_id(now: DateTime<Utc>) -> TransactionId {
    static SEQUENCE: OnceLock<AtomicU32> = OnceLock::new();

    let sequence = SEQUENCE
        .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..1_000_000)));
    let suffix = sequence.fetch_add(1, Ordering::Relaxed) % 1_000_000;
    format!("TXN{}{:06}", now.timestamp_millis(), suffix)
}

/// Generate the number shared by both legs of a transfer.
pub(crate) fn reference_number() -> ReferenceNumber {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("TRF{}{:04}", Utc::now().timestamp_millis(), suffix)
}
