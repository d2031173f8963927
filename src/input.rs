use crate::ledger::{account::Kind, AccountNumber, Amount, CustomerId};

use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, PartialEq)]
pub enum Error {
    Csv(String),    // CSV is malformed
    Format(String), // Data format is incorrect
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<<CommandRecord as TryInto<Command>>::Error> for Error {
    fn from(err: <CommandRecord as TryInto<Command>>::Error) -> Self {
        Self::Format(err)
    }
}

/// One operation to apply to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open {
        holder: String,
        kind: Kind,
        customer: CustomerId,
        initial_balance: Amount,
    },
    Deposit {
        account: AccountNumber,
        amount: Amount,
        description: Option<String>,
    },
    Withdraw {
        account: AccountNumber,
        amount: Amount,
        description: Option<String>,
    },
    Transfer {
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
        description: String,
    },
    Interest,
    Close {
        account: AccountNumber,
    },
}

// A bad row is reported and skipped: the rows after it usually don't depend
// on it, and a command file is replayed as a whole.
pub fn parse(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<Command>, Receiver<Error>) {
    let (command_tx, command_rx): (Sender<Command>, Receiver<Command>) = mpsc::channel();
    let (error_tx, error_rx): (Sender<Error>, Receiver<Error>) = mpsc::channel();

    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    // Moving to a new thread so we can start processing the commands immediately.
    std::thread::spawn(move || {
        for record in reader.deserialize::<CommandRecord>() {
            // Sending only fails once the other side hung up, and then there
            // is nobody left to read what we parse.
            let sent = match convert(record) {
                Ok(command) => command_tx.send(command).is_ok(),
                Err(err) => error_tx.send(err).is_ok(),
            };
            if !sent {
                break;
            }
        }
    });

    (command_rx, error_rx)
}

// Convert from a csv deserialise result into a command result.
fn convert(record: Result<CommandRecord, csv::Error>) -> Result<Command, Error> {
    Ok(record?.try_into()?)
}

// The record is flat and mostly optional, because every command uses a
// different subset of the columns. Converting it checks that the right ones
// are there.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    command: CommandType,
    account: Option<AccountNumber>,
    to: Option<AccountNumber>,
    amount: Option<Amount>,
    kind: Option<String>,
    holder: Option<String>,
    customer: Option<CustomerId>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Interest,
    Close,
}

fn required<T>(field: Option<T>, name: &str, command: &str) -> Result<T, String> {
    field.ok_or_else(|| format!("missing {} for {}", name, command))
}

impl TryFrom<CommandRecord> for Command {
    type Error = String;
    fn try_from(record: CommandRecord) -> Result<Self, Self::Error> {
        let command = match record.command {
            CommandType::Open => Command::Open {
                holder: required(record.holder, "holder", "open")?,
                kind: required(record.kind, "kind", "open")?.parse()?,
                customer: required(record.customer, "customer", "open")?,
                initial_balance: required(record.amount, "amount", "open")?,
            },
            CommandType::Deposit => Command::Deposit {
                account: required(record.account, "account", "deposit")?,
                amount: required(record.amount, "amount", "deposit")?,
                description: record.description,
            },
            CommandType::Withdraw => Command::Withdraw {
                account: required(record.account, "account", "withdraw")?,
                amount: required(record.amount, "amount", "withdraw")?,
                description: record.description,
            },
            CommandType::Transfer => Command::Transfer {
                from: required(record.account, "account", "transfer")?,
                to: required(record.to, "to", "transfer")?,
                amount: required(record.amount, "amount", "transfer")?,
                description: record.description.unwrap_or_default(),
            },
            CommandType::Interest => Command::Interest,
            CommandType::Close => Command::Close {
                account: required(record.account, "account", "close")?,
            },
        };

        Ok(command)
    }
}
