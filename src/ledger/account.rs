#[allow(clippy::module_inception)]
pub mod account;
pub mod balance;
pub mod deposit;
pub mod interest;
pub mod kind;
pub mod status;
pub mod withdrawal;

pub use account::Account;
pub use balance::Balance;
pub use kind::{Kind, Policy};
pub use status::Status;
