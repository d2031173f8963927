use super::{account::Kind, AccountNumber, Amount, LedgerError, ReferenceNumber, UserId};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    AccountOpened {
        account: AccountNumber,
        kind: Kind,
        initial_balance: Amount,
    },
    Deposited {
        account: AccountNumber,
        amount: Amount,
        balance: Amount,
    },
    Withdrawn {
        account: AccountNumber,
        amount: Amount,
        balance: Amount,
    },
    Transferred {
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
        reference: ReferenceNumber,
    },
    InterestCredited {
        account: AccountNumber,
        amount: Amount,
        balance: Amount,
    },
    /// One account failed during an interest run. The run goes on.
    InterestSkipped {
        account: AccountNumber,
        error: LedgerError,
    },
    AccountClosed {
        account: AccountNumber,
    },
    /// An operation was refused. The error is also returned to the caller.
    Rejected {
        operation: &'static str,
        error: LedgerError,
    },
    LoggedIn {
        username: String,
    },
    LoginFailed {
        username: String,
    },
    UserRegistered {
        username: String,
    },
    PasswordChanged {
        user_id: UserId,
    },
}

/// Where the ledger reports what happened.
///
/// The ledger doesn't log by itself: it records events on the `LedgerEvents`
/// it was built with. [`TracingEvents`] forwards everything to `tracing`,
/// tests keep the events to assert on them.
pub trait LedgerEvents: Send + Sync {
    fn record(&self, event: LedgerEvent);
}

/// Emit ledger events as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl LedgerEvents for TracingEvents {
    fn record(&self, event: LedgerEvent) {
        match event {
            LedgerEvent::AccountOpened {
                account,
                kind,
                initial_balance,
            } => info!(%account, %kind, %initial_balance, "account opened"),
            LedgerEvent::Deposited {
                account,
                amount,
                balance,
            } => info!(%account, %amount, %balance, "deposit"),
            LedgerEvent::Withdrawn {
                account,
                amount,
                balance,
            } => info!(%account, %amount, %balance, "withdrawal"),
            LedgerEvent::Transferred {
                from,
                to,
                amount,
                reference,
            } => info!(%from, %to, %amount, %reference, "transfer"),
            LedgerEvent::InterestCredited {
                account,
                amount,
                balance,
            } => info!(%account, %amount, %balance, "interest credited"),
            LedgerEvent::InterestSkipped { account, error } => {
                warn!(%account, %error, "failed to credit interest")
            }
            LedgerEvent::AccountClosed { account } => info!(%account, "account closed"),
            LedgerEvent::Rejected { operation, error } => {
                warn!(operation, %error, "operation rejected")
            }
            LedgerEvent::LoggedIn { username } => info!(%username, "user logged in"),
            LedgerEvent::LoginFailed { username } => warn!(%username, "login failed"),
            LedgerEvent::UserRegistered { username } => info!(%username, "customer registered"),
            LedgerEvent::PasswordChanged { user_id } => info!(user_id, "password changed"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{LedgerEvent, LedgerEvents};
    use std::sync::Mutex;

    /// Keeps every event, in order.
    #[derive(Default)]
    pub(crate) struct RecordingEvents {
        events: Mutex<Vec<LedgerEvent>>,
    }

    impl RecordingEvents {
        pub(crate) fn events(&self) -> Vec<LedgerEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl LedgerEvents for RecordingEvents {
        fn record(&self, event: LedgerEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
