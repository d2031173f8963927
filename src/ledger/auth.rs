use super::events::{LedgerEvent, LedgerEvents};
use super::store::{Store, StoreError};
use super::user::{NewUser, Role, User};
use super::{LedgerError, UserId};
use chrono::Utc;
use std::sync::Arc;

/// User registration and login.
pub struct Authenticator {
    store: Arc<dyn Store>,
    events: Arc<dyn LedgerEvents>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn Store>, events: Arc<dyn LedgerEvents>) -> Self {
        Self { store, events }
    }

    /// Log an active user in and record the time of the login.
    ///
    /// Unknown users, inactive users and wrong passwords all fail the same way.
    pub fn login(&self, username: &str, password: &str) -> Result<User, LedgerError> {
        let user = match self.store.user_by_username(username)? {
            Some(user) if user.active && user.password == password => user,
            _ => {
                self.events.record(LedgerEvent::LoginFailed {
                    username: username.to_owned(),
                });
                return Err(LedgerError::AuthenticationFailure);
            }
        };

        let user = User {
            last_login: Some(Utc::now()),
            ..user
        };
        self.store.update_user(&user)?;
        self.events.record(LedgerEvent::LoggedIn {
            username: user.username.clone(),
        });

        Ok(user)
    }

    pub fn register_customer(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        email: &str,
    ) -> Result<User, LedgerError> {
        if self.store.user_by_username(username)?.is_some() {
            return Err(LedgerError::UserExists(username.to_owned()));
        }

        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_owned(),
                password: password.to_owned(),
                full_name: full_name.to_owned(),
                email: email.to_owned(),
                role: Role::Customer,
            })
            .map_err(|err| match err {
                // The username was free a moment ago, so it's the email, or a
                // concurrent registration of the same username.
                StoreError::Conflict(what) => LedgerError::UserExists(what),
                err => err.into(),
            })?;
        self.events.record(LedgerEvent::UserRegistered {
            username: user.username.clone(),
        });

        Ok(user)
    }

    pub fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), LedgerError> {
        let user = match self.store.user(user_id)? {
            Some(user) if user.password == old_password => user,
            _ => return Err(LedgerError::AuthenticationFailure),
        };

        self.store.update_user(&User {
            password: new_password.to_owned(),
            ..user
        })?;
        self.events
            .record(LedgerEvent::PasswordChanged { user_id });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Authenticator;
    use crate::ledger::{
        events::{testing::RecordingEvents, LedgerEvent},
        store::{MemoryStore, Store},
        user::{NewUser, Permission, Role, User},
        LedgerError,
    };
    use std::sync::Arc;

    fn authenticator() -> (Authenticator, Arc<MemoryStore>, Arc<RecordingEvents>) {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(RecordingEvents::default());

        (
            Authenticator::new(store.clone(), events.clone()),
            store,
            events,
        )
    }

    #[test]
    fn test_register_and_login() {
        let (auth, store, events) = authenticator();

        let user = auth
            .register_customer("alice", "hunter2", "Alice Liddell", "alice@example.com")
            .expect("should register");
        assert_eq!(Role::Customer, user.role);
        assert!(user.active);
        assert_eq!(None, user.last_login);

        let logged_in = auth.login("alice", "hunter2").expect("should log in");
        assert_eq!(user.id, logged_in.id);
        assert!(logged_in.last_login.is_some());
        assert_eq!(
            logged_in.last_login,
            store.user(user.id).unwrap().unwrap().last_login
        );

        assert_eq!(
            vec![
                LedgerEvent::UserRegistered {
                    username: "alice".to_string()
                },
                LedgerEvent::LoggedIn {
                    username: "alice".to_string()
                },
            ],
            events.events()
        );
    }

    #[test]
    fn test_login_failures() {
        let (auth, store, events) = authenticator();
        let user = auth
            .register_customer("alice", "hunter2", "Alice Liddell", "alice@example.com")
            .unwrap();
        store
            .update_user(&User {
                active: false,
                ..auth
                    .register_customer("bob", "pw", "Bob", "bob@example.com")
                    .unwrap()
            })
            .unwrap();

        for (username, password) in vec![
            ("alice", "Hunter2"),
            ("alice", ""),
            ("nobody", "hunter2"),
            ("bob", "pw"),
        ] {
            assert_eq!(
                Err(LedgerError::AuthenticationFailure),
                auth.login(username, password)
            );
        }

        assert_eq!(None, store.user(user.id).unwrap().unwrap().last_login);
        assert_eq!(
            Some(&LedgerEvent::LoginFailed {
                username: "bob".to_string()
            }),
            events.events().last()
        );
    }

    #[test]
    fn test_register_duplicates() {
        let (auth, _, _) = authenticator();
        auth.register_customer("alice", "pw", "Alice", "alice@example.com")
            .unwrap();

        assert_eq!(
            Err(LedgerError::UserExists("alice".to_string())),
            auth.register_customer("alice", "pw", "Other Alice", "other@example.com")
        );
        assert!(matches!(
            auth.register_customer("alicia", "pw", "Alicia", "alice@example.com"),
            Err(LedgerError::UserExists(_))
        ));
    }

    #[test]
    fn test_change_password() {
        let (auth, _, _) = authenticator();
        let user = auth
            .register_customer("alice", "old", "Alice", "alice@example.com")
            .unwrap();

        assert_eq!(
            Err(LedgerError::AuthenticationFailure),
            auth.change_password(user.id, "wrong", "new")
        );
        assert_eq!(
            Err(LedgerError::AuthenticationFailure),
            auth.change_password(user.id + 1, "old", "new")
        );

        auth.change_password(user.id, "old", "new")
            .expect("should change password");
        assert_eq!(
            Err(LedgerError::AuthenticationFailure),
            auth.login("alice", "old")
        );
        assert!(auth.login("alice", "new").is_ok());
    }

    #[test]
    fn test_has_permission() {
        let (auth, store, _) = authenticator();
        let customer = auth
            .register_customer("alice", "pw", "Alice", "alice@example.com")
            .unwrap();
        let manager = store
            .insert_user(NewUser {
                username: "boss".to_string(),
                password: "pw".to_string(),
                full_name: "The Boss".to_string(),
                email: "boss@example.com".to_string(),
                role: Role::BankManager,
            })
            .unwrap();

        // Permissions follow the role of the stored user.
        assert!(customer.role.has_permission(Permission::Transfer));
        assert!(!customer.role.has_permission(Permission::CreditInterest));
        assert!(manager.role.has_permission(Permission::CreditInterest));
        assert!(manager.role.has_permission(Permission::ViewAllAccounts));
    }
}
