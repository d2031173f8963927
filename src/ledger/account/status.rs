use serde::{Deserialize, Serialize};
use std::fmt;

/// Only active accounts accept deposits and withdrawals.
///
/// Closing is the only transition the ledger performs, and it is terminal.
/// Inactive and frozen are valid states of a stored account, but nothing in
/// the ledger moves an account into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Inactive,
    Closed,
    Frozen,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
            Status::Closed => "CLOSED",
            Status::Frozen => "FROZEN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
