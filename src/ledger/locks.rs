use super::AccountNumber;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per account number, shared by everything that goes through the
/// same ledger.
///
/// Locks are keyed by number rather than attached to account values: accounts
/// are re-read from the store on every operation, so two requests on the same
/// account would otherwise hold two different locks.
#[derive(Default)]
pub struct AccountLocks {
    locks: DashMap<AccountNumber, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, number: &str) -> Arc<Mutex<()>> {
        // The map entry guard is dropped at the end of this statement, before
        // anyone waits on the account mutex.
        self.locks
            .entry(number.to_owned())
            .or_default()
            .value()
            .clone()
    }

    /// Run `f` while holding the lock of one account.
    pub fn with_account<T>(&self, number: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(number);
        // The mutex guards no data, so a panic in another holder can't have
        // left anything inconsistent behind it.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        f()
    }

    /// Run `f` while holding the locks of two different accounts.
    ///
    /// Locks are always taken in ascending account number order, so two
    /// transfers going in opposite directions can't deadlock.
    pub fn with_pair<T>(&self, a: &str, b: &str, f: impl FnOnce() -> T) -> T {
        if a == b {
            return self.with_account(a, f);
        }

        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first = self.lock_for(first);
        let second = self.lock_for(second);
        let _first = first.lock().unwrap_or_else(PoisonError::into_inner);
        let _second = second.lock().unwrap_or_else(PoisonError::into_inner);

        f()
    }
}
