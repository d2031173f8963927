use crate::ledger::{round, Amount};

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two account variants. They only differ by their [`Policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Savings,
    Current,
}

/// What makes an account variant what it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    /// Lowest balance a withdrawal may leave. Negative for an overdraft.
    pub minimum_balance: Amount,
    pub annual_interest_rate: Amount,
    /// Whether interest is computed on a balance that is zero or below.
    pub interest_on_non_positive: bool,
}

impl Kind {
    pub fn policy(&self) -> Policy {
        match self {
            Kind::Savings => Policy {
                minimum_balance: dec!(1000.00),
                annual_interest_rate: dec!(0.04),
                interest_on_non_positive: true,
            },
            Kind::Current => Policy {
                minimum_balance: dec!(-10000.00),
                annual_interest_rate: dec!(0.02),
                interest_on_non_positive: false,
            },
        }
    }

    pub fn minimum_balance(&self) -> Amount {
        self.policy().minimum_balance
    }

    /// Interest earned in one month by the given balance, rounded to cents.
    pub fn monthly_interest(&self, balance: Amount) -> Amount {
        let policy = self.policy();
        if balance <= Amount::ZERO && !policy.interest_on_non_positive {
            return Amount::ZERO;
        }

        round(balance * policy.annual_interest_rate / dec!(12))
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Savings => "SAVINGS",
            Kind::Current => "CURRENT",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAVINGS" => Ok(Kind::Savings),
            "CURRENT" => Ok(Kind::Current),
            _ => Err(format!("invalid account type: {}", s)),
        }
    }
}
