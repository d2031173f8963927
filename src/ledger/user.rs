use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    BankManager,
}

/// Actions a logged in user may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewOwnAccounts,
    ViewOwnTransactions,
    Deposit,
    Withdraw,
    Transfer,
    ChangePassword,
    ViewAllAccounts,
    ViewAllTransactions,
    CreateAccount,
    CloseAccount,
    CreditInterest,
}

impl Role {
    /// Managers may do everything, customers only operate on their own accounts.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            Role::BankManager => true,
            Role::Customer => matches!(
                permission,
                Permission::ViewOwnAccounts
                    | Permission::ViewOwnTransactions
                    | Permission::Deposit
                    | Permission::Withdraw
                    | Permission::Transfer
                    | Permission::ChangePassword
            ),
        }
    }
}

/// A user of the bank. Users own accounts through the account's customer id,
/// there is no in-memory link between the two.
///
/// Passwords are stored and compared in plaintext.
#[derive(Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
}

/// What it takes to register a user. The store assigns the id.
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            full_name: self.full_name,
            email: self.email,
            role: self.role,
            created_at: Utc::now(),
            active: true,
            last_login: None,
        }
    }
}

// Keep passwords out of the logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}
