use super::account::Account;
use super::{Ledger, LedgerError};
use crate::input::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

pub fn process(
    commands: Receiver<Command>,
    ledger: Arc<Ledger>,
    accounts_tx: Sender<Account>,
) -> Receiver<LedgerError> {
    let (tx, rx) = mpsc::channel();

    // We apply all commands in a new thread, to be able to stream errors as
    // we go.
    std::thread::spawn(move || {
        for command in commands {
            for err in apply(&ledger, command) {
                // Would only fail if nobody listens to errors anymore, which
                // doesn't stop us from applying the rest.
                tx.send(err).ok();
            }
        }

        match ledger.get_all_accounts() {
            Ok(accounts) => {
                for account in accounts {
                    if accounts_tx.send(account).is_err() {
                        break;
                    }
                }
            }
            Err(err) => {
                tx.send(err).ok();
            }
        }
    });

    rx
}

// An interest run goes through every account, so it may fail more than once.
fn apply(ledger: &Ledger, command: Command) -> Vec<LedgerError> {
    let result = match command {
        Command::Open {
            holder,
            kind,
            customer,
            initial_balance,
        } => ledger
            .create_account(&holder, kind, initial_balance, customer)
            .map(drop),
        Command::Deposit {
            account,
            amount,
            description,
        } => ledger
            .deposit(&account, amount, description.as_deref())
            .map(drop),
        Command::Withdraw {
            account,
            amount,
            description,
        } => ledger
            .withdraw(&account, amount, description.as_deref())
            .map(drop),
        Command::Transfer {
            from,
            to,
            amount,
            description,
        } => ledger.transfer(&from, &to, amount, &description).map(drop),
        Command::Interest => {
            return match ledger.credit_interest_to_all() {
                Ok(run) => run.failures.into_iter().map(|(_, err)| err).collect(),
                Err(err) => vec![err],
            }
        }
        Command::Close { account } => ledger.close_account(&account),
    };

    result.err().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::process;
    use crate::input::Command;
    use crate::ledger::{account::Kind, Ledger, LedgerError};

    use rust_decimal_macros::dec;
    use std::sync::{mpsc, Arc};

    #[test]
    fn test_process() {
        let (commands_tx, commands) = mpsc::channel();
        let (accounts_tx, accounts) = mpsc::channel();
        for command in vec![
            Command::Open {
                holder: "Alice".to_string(),
                kind: Kind::Savings,
                customer: 1,
                initial_balance: dec!(1000),
            },
            Command::Open {
                holder: "Bob".to_string(),
                kind: Kind::Current,
                customer: 2,
                initial_balance: dec!(0),
            },
            Command::Deposit {
                account: "ACC0000000001".to_string(),
                amount: dec!(500),
                description: None,
            },
            Command::Withdraw {
                account: "ACC0000000001".to_string(),
                amount: dec!(600),
                description: None,
            },
            Command::Transfer {
                from: "ACC0000000002".to_string(),
                to: "ACC0000000001".to_string(),
                amount: dec!(200),
                description: "rent".to_string(),
            },
            Command::Close {
                account: "ACC0000000003".to_string(),
            },
        ] {
            commands_tx.send(command).unwrap();
        }
        drop(commands_tx);

        let errors = process(commands, Arc::new(Ledger::in_memory()), accounts_tx);

        let balances: Vec<_> = accounts
            .iter()
            .map(|acc| (acc.number().to_string(), acc.balance()))
            .collect();
        assert_eq!(
            vec![
                ("ACC0000000001".to_string(), dec!(1700)),
                ("ACC0000000002".to_string(), dec!(-200)),
            ],
            balances
        );
        assert_eq!(
            vec![
                LedgerError::InsufficientFunds {
                    minimum: dec!(1000)
                },
                LedgerError::AccountNotFound("ACC0000000003".to_string()),
            ],
            errors.iter().collect::<Vec<_>>()
        );
    }
}
