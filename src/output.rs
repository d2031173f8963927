use crate::ledger::{Account, Amount, Transaction};

use serde::Serialize;
use std::sync::mpsc::Receiver;

#[derive(Serialize)]
struct AccountRecord<'a> {
    #[serde(rename = "account")]
    number: &'a str,

    holder: &'a str,

    #[serde(rename = "type")]
    kind: &'static str,

    balance: String,

    status: &'static str,
}

impl<'a> AccountRecord<'a> {
    fn new(acc: &'a Account) -> Self {
        Self {
            number: acc.number(),
            holder: acc.holder_name(),
            kind: acc.kind().as_str(),
            balance: format_amount(acc.balance()),
            status: acc.status().as_str(),
        }
    }
}

// Balances are shown with exactly two decimals, whatever the scale of the
// decimal they were computed with.
fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

// Writes the received accounts to the given stream.
pub fn write(
    output_stream: impl std::io::Write,
    accounts: Receiver<Account>,
) -> Result<(), std::io::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for account in accounts {
        writer.serialize(AccountRecord::new(&account))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the journal, oldest transaction first.
pub fn write_journal(
    output_stream: impl std::io::Write,
    transactions: &[Transaction],
) -> Result<(), std::io::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for tx in transactions {
        writer.serialize(tx)?;
    }
    writer.flush()?;

    Ok(())
}
