use super::{
    account::Account,
    transaction::Transaction,
    user::{NewUser, User},
    AccountNumber, CustomerId, TransactionId, UserId,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store can't be reached, or is in a state where it can't serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A primary key or unique constraint would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A row referenced by the statement doesn't exist.
    #[error("missing row: {0}")]
    MissingRow(String),
}

/// Everything a ledger operation writes, committed in one go.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    inserted: Vec<Account>,
    updated: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(mut self, account: Account) -> Self {
        self.inserted.push(account);
        self
    }

    pub fn update_account(mut self, account: Account) -> Self {
        self.updated.push(account);
        self
    }

    pub fn append(mut self, tx: Transaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Split the unit into (inserted accounts, updated accounts, transactions).
    pub fn into_parts(self) -> (Vec<Account>, Vec<Account>, Vec<Transaction>) {
        (self.inserted, self.updated, self.transactions)
    }
}

/// Account numbers are `ACC` followed by a 10 digit, zero-padded sequence.
pub fn account_number(sequence: u64) -> AccountNumber {
    format!("ACC{:010}", sequence)
}

/// Persistence collaborator.
///
/// From the ledger's point of view, the store is a set of tables keyed by
/// primary key: accounts by number, transactions by id, users by id. The only
/// write path for accounts and transactions is [`Store::commit`], which
/// applies a [`UnitOfWork`] atomically: a balance update and the journal entry
/// explaining it are never persisted one without the other.
pub trait Store: Send + Sync {
    /// Reserve a new account number. Two calls never return the same number.
    fn next_account_number(&self) -> Result<AccountNumber, StoreError>;

    fn account(&self, number: &str) -> Result<Option<Account>, StoreError>;

    fn accounts_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Account>, StoreError>;

    /// All accounts, ordered by account number.
    fn all_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Journal of one account, newest first.
    fn transactions_for(&self, number: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Whole journal, newest first.
    fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Apply all the writes of `unit`, or none of them.
    fn commit(&self, unit: UnitOfWork) -> Result<(), StoreError>;

    fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn update_user(&self, user: &User) -> Result<(), StoreError>;
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountNumber, Account>,
    // Insertion order, oldest first.
    transactions: Vec<Transaction>,
    transaction_ids: HashSet<TransactionId>,
    users: BTreeMap<UserId, User>,
}

impl Tables {
    // Check every constraint before touching anything, so that a failing unit
    // leaves the tables exactly as they were.
    fn check(&self, unit: &UnitOfWork) -> Result<(), StoreError> {
        let mut new_accounts = HashSet::new();
        for account in &unit.inserted {
            if self.accounts.contains_key(account.number())
                || !new_accounts.insert(account.number())
            {
                return Err(StoreError::Conflict(format!(
                    "account {} already exists",
                    account.number()
                )));
            }
        }

        for account in &unit.updated {
            if !self.accounts.contains_key(account.number())
                && !new_accounts.contains(account.number())
            {
                return Err(StoreError::MissingRow(format!(
                    "account {}",
                    account.number()
                )));
            }
        }

        let mut new_ids = HashSet::new();
        for tx in &unit.transactions {
            if self.transaction_ids.contains(tx.id()) || !new_ids.insert(tx.id()) {
                return Err(StoreError::Conflict(format!(
                    "transaction {} already exists",
                    tx.id()
                )));
            }
            if !self.accounts.contains_key(tx.account_number())
                && !new_accounts.contains(tx.account_number())
            {
                return Err(StoreError::MissingRow(format!(
                    "account {} referenced by transaction {}",
                    tx.account_number(),
                    tx.id()
                )));
            }
        }

        Ok(())
    }

    fn check_user_unique(&self, id: UserId, username: &str, email: &str) -> Result<(), StoreError> {
        for user in self.users.values().filter(|user| user.id != id) {
            if user.username == username {
                return Err(StoreError::Conflict(format!("username {}", username)));
            }
            if user.email == email {
                return Err(StoreError::Conflict(format!("email {}", email)));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of the store, laid out like the relational schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    account_sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("tables lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("tables lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn next_account_number(&self) -> Result<AccountNumber, StoreError> {
        let sequence = self.account_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(account_number(sequence))
    }

    fn account(&self, number: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(number).cloned())
    }

    fn accounts_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .read()?
            .accounts
            .values()
            .filter(|account| account.customer_id() == customer_id)
            .cloned()
            .collect())
    }

    fn all_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    fn transactions_for(&self, number: &str) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .iter()
            .rev()
            .filter(|tx| tx.account_number() == number)
            .cloned()
            .collect())
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.read()?.transactions.iter().rev().cloned().collect())
    }

    fn commit(&self, unit: UnitOfWork) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.check(&unit)?;

        let (inserted, updated, transactions) = unit.into_parts();
        for account in inserted.into_iter().chain(updated) {
            tables.accounts.insert(account.number().to_owned(), account);
        }
        for tx in transactions {
            tables.transaction_ids.insert(tx.id().to_owned());
            tables.transactions.push(tx);
        }

        Ok(())
    }

    fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        let id = tables.users.keys().next_back().map_or(1, |id| id + 1);
        tables.check_user_unique(id, &user.username, &user.email)?;

        let user = user.into_user(id);
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::MissingRow(format!("user {}", user.id)));
        }
        tables.check_user_unique(user.id, &user.username, &user.email)?;
        tables.users.insert(user.id, user.clone());

        Ok(())
    }
}
