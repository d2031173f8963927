use super::account::{Account, Kind};
use super::auth::Authenticator;
use super::events::{LedgerEvent, LedgerEvents, TracingEvents};
use super::locks::AccountLocks;
use super::store::{MemoryStore, Store, UnitOfWork};
use super::transaction::{self, Transaction};
use super::{
    bounded, checked_sum, round, AccountNumber, Amount, CustomerId, LedgerError, ReferenceNumber,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Both legs of a successful transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub reference_number: ReferenceNumber,
    pub debit: Transaction,
    pub credit: Transaction,
}

/// Outcome of crediting interest to every active account.
#[derive(Debug, Default, PartialEq)]
pub struct InterestRun {
    pub credited: Vec<Transaction>,
    /// Accounts that couldn't be credited. They don't stop the run.
    pub failures: Vec<(AccountNumber, LedgerError)>,
}

/// The ledger is the only way to change an account.
///
/// Every operation follows the same steps:
/// take the lock(s) of the account(s), read them from the store, apply the
/// change to the in-memory copy, and commit the new state together with the
/// journal entries as a single unit of work. When anything fails along the
/// way, the copy is dropped and the store is left untouched.
///
/// The ledger can be shared between threads.
pub struct Ledger {
    store: Arc<dyn Store>,
    locks: AccountLocks,
    events: Arc<dyn LedgerEvents>,
}

impl Ledger {
    pub fn new(store: Arc<dyn Store>, events: Arc<dyn LedgerEvents>) -> Self {
        Self {
            store,
            locks: AccountLocks::new(),
            events,
        }
    }

    /// A ledger backed by a fresh in-memory store, reporting through `tracing`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(TracingEvents))
    }

    /// Authentication against the same store, reporting to the same events.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.store.clone(), self.events.clone())
    }

    /// Open a new, active account and return its number.
    ///
    /// The initial balance has to satisfy the minimum balance of the account
    /// type. A positive initial balance is logged as an initial deposit.
    pub fn create_account(
        &self,
        holder_name: &str,
        kind: Kind,
        initial_balance: Amount,
        customer_id: CustomerId,
    ) -> Result<AccountNumber, LedgerError> {
        let result = self.open(holder_name, kind, round(initial_balance), customer_id);
        if let Ok(number) = &result {
            self.events.record(LedgerEvent::AccountOpened {
                account: number.clone(),
                kind,
                initial_balance: round(initial_balance),
            });
        }

        self.report("create account", result)
    }

    fn open(
        &self,
        holder_name: &str,
        kind: Kind,
        initial_balance: Amount,
        customer_id: CustomerId,
    ) -> Result<AccountNumber, LedgerError> {
        let initial_balance = bounded(initial_balance)?;
        let minimum = kind.minimum_balance();
        if initial_balance < minimum {
            return Err(LedgerError::InsufficientFunds { minimum });
        }

        let number = self.store.next_account_number()?;
        let account = Account::open(
            number.clone(),
            holder_name,
            kind,
            initial_balance,
            customer_id,
        );

        let mut unit = UnitOfWork::new();
        if initial_balance > Amount::ZERO {
            unit = unit.append(Transaction::new(
                &number,
                transaction::Type::InitialDeposit,
                initial_balance,
                initial_balance,
                Some("Account opening deposit"),
            ));
        }
        self.store.commit(unit.insert_account(account))?;

        Ok(number)
    }

    pub fn deposit(
        &self,
        number: &str,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let result = self.locks.with_account(number, || {
            let mut account = self.load(number)?;
            let tx = account.deposit(amount, description)?;
            self.store
                .commit(UnitOfWork::new().update_account(account).append(tx.clone()))?;

            Ok(tx)
        });
        if let Ok(tx) = &result {
            self.events.record(LedgerEvent::Deposited {
                account: number.to_owned(),
                amount: tx.amount(),
                balance: tx.balance_after(),
            });
        }

        self.report("deposit", result)
    }

    pub fn withdraw(
        &self,
        number: &str,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let result = self.locks.with_account(number, || {
            let mut account = self.load(number)?;
            let tx = account.withdraw(amount, description)?;
            self.store
                .commit(UnitOfWork::new().update_account(account).append(tx.clone()))?;

            Ok(tx)
        });
        if let Ok(tx) = &result {
            self.events.record(LedgerEvent::Withdrawn {
                account: number.to_owned(),
                amount: tx.amount(),
                balance: tx.balance_after(),
            });
        }

        self.report("withdraw", result)
    }

    /// Move money from one account to another.
    ///
    /// Either both balances change and both legs are logged under a shared
    /// reference number, or nothing changes at all.
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Amount,
        description: &str,
    ) -> Result<Transfer, LedgerError> {
        let result = if from == to {
            Err(LedgerError::SameAccountTransfer(from.to_owned()))
        } else {
            self.locks.with_pair(from, to, || {
                self.transfer_locked(from, to, amount, description)
            })
        };
        if let Ok(transfer) = &result {
            self.events.record(LedgerEvent::Transferred {
                from: from.to_owned(),
                to: to.to_owned(),
                amount: transfer.debit.amount(),
                reference: transfer.reference_number.clone(),
            });
        }

        self.report("transfer", result)
    }

    fn transfer_locked(
        &self,
        from: &str,
        to: &str,
        amount: Amount,
        description: &str,
    ) -> Result<Transfer, LedgerError> {
        let mut source = self.load(from)?;
        let mut destination = self.load(to)?;
        for account in [&source, &destination] {
            if !account.is_active() {
                return Err(LedgerError::AccountNotActive(account.number().to_owned()));
            }
        }

        let reference_number = transaction::reference_number();
        let debit = source
            .debit(
                transaction::Type::TransferOut,
                amount,
                Some(&format!("Transfer to {} - {}", to, description)),
            )?
            .with_reference(&reference_number);
        let credit = destination
            .credit(
                transaction::Type::TransferIn,
                amount,
                Some(&format!("Transfer from {} - {}", from, description)),
            )?
            .with_reference(&reference_number);

        self.store.commit(
            UnitOfWork::new()
                .update_account(source)
                .update_account(destination)
                .append(debit.clone())
                .append(credit.clone()),
        )?;

        Ok(Transfer {
            reference_number,
            debit,
            credit,
        })
    }

    pub fn get_account(&self, number: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self.store.account(number)?)
    }

    pub fn get_accounts_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.accounts_by_customer(customer_id)?)
    }

    pub fn get_all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.all_accounts()?)
    }

    /// Journal of one account, newest first.
    pub fn get_transaction_history(&self, number: &str) -> Result<Vec<Transaction>, LedgerError> {
        self.load(number)?;

        Ok(self.store.transactions_for(number)?)
    }

    /// Journal of all the accounts of a customer, newest first.
    pub fn get_customer_transactions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let numbers: HashSet<AccountNumber> = self
            .store
            .accounts_by_customer(customer_id)?
            .into_iter()
            .map(|account| account.number().to_owned())
            .collect();

        Ok(self
            .store
            .all_transactions()?
            .into_iter()
            .filter(|tx| numbers.contains(tx.account_number()))
            .collect())
    }

    pub fn get_all_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.store.all_transactions()?)
    }

    /// Transactions with an amount strictly above `threshold`, newest first.
    pub fn get_high_value_transactions(
        &self,
        threshold: Amount,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .store
            .all_transactions()?
            .into_iter()
            .filter(|tx| tx.amount() > threshold)
            .collect())
    }

    /// Transactions that happened between `start` and `end`, both included.
    pub fn get_transactions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .store
            .all_transactions()?
            .into_iter()
            .filter(|tx| start <= tx.timestamp() && tx.timestamp() <= end)
            .collect())
    }

    /// Sum of the amounts of one type of transaction on one account.
    pub fn total_transaction_amount(
        &self,
        number: &str,
        tx_type: transaction::Type,
    ) -> Result<Amount, LedgerError> {
        self.load(number)?;

        checked_sum(
            self.store
                .transactions_for(number)?
                .iter()
                .filter(|tx| tx.tx_type() == tx_type)
                .map(Transaction::amount),
        )
    }

    /// Credit a month of interest to every active account.
    ///
    /// An account that can't be credited is reported and skipped, so that
    /// one bad account doesn't block the whole run. Only failing to list the
    /// accounts fails the run itself.
    pub fn credit_interest_to_all(&self) -> Result<InterestRun, LedgerError> {
        let accounts = self.report("credit interest", self.get_all_accounts())?;
        let mut run = InterestRun::default();

        for account in accounts.iter().filter(|account| account.is_active()) {
            let number = account.number();
            match self.credit_interest(number) {
                Ok(Some(tx)) => {
                    self.events.record(LedgerEvent::InterestCredited {
                        account: number.to_owned(),
                        amount: tx.amount(),
                        balance: tx.balance_after(),
                    });
                    run.credited.push(tx);
                }
                Ok(None) => {}
                Err(error) => {
                    self.events.record(LedgerEvent::InterestSkipped {
                        account: number.to_owned(),
                        error: error.clone(),
                    });
                    run.failures.push((number.to_owned(), error));
                }
            }
        }

        Ok(run)
    }

    // The account is re-read under its lock: it may have been closed since
    // the run listed it, in which case it doesn't earn anything.
    fn credit_interest(&self, number: &str) -> Result<Option<Transaction>, LedgerError> {
        self.locks.with_account(number, || {
            let mut account = self.load(number)?;
            if !account.is_active() {
                return Ok(None);
            }

            let tx = match account.credit_interest()? {
                Some(tx) => tx,
                None => return Ok(None),
            };
            self.store
                .commit(UnitOfWork::new().update_account(account).append(tx.clone()))?;

            Ok(Some(tx))
        })
    }

    /// Close an account for good.
    pub fn close_account(&self, number: &str) -> Result<(), LedgerError> {
        let result = self.locks.with_account(number, || {
            let mut account = self.load(number)?;
            account.close()?;
            self.store.commit(UnitOfWork::new().update_account(account))?;

            Ok(())
        });
        if result.is_ok() {
            self.events.record(LedgerEvent::AccountClosed {
                account: number.to_owned(),
            });
        }

        self.report("close account", result)
    }

    fn load(&self, number: &str) -> Result<Account, LedgerError> {
        self.store
            .account(number)?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_owned()))
    }

    fn report<T>(
        &self,
        operation: &'static str,
        result: Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        if let Err(error) = &result {
            self.events.record(LedgerEvent::Rejected {
                operation,
                error: error.clone(),
            });
        }

        result
    }
}

/// Keep the transactions of one type.
pub fn filter_by_type(transactions: &[Transaction], tx_type: transaction::Type) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.tx_type() == tx_type)
        .cloned()
        .collect()
}

pub fn total_balance(accounts: &[Account]) -> Result<Amount, LedgerError> {
    checked_sum(accounts.iter().map(Account::balance))
}

pub fn active_accounts(accounts: &[Account]) -> Vec<Account> {
    accounts
        .iter()
        .filter(|account| account.is_active())
        .cloned()
        .collect()
}
