//! Ledger module containing account management, transaction processing,
//! and the budget guard

pub mod account;
pub mod budget;
pub mod core;
pub mod transaction;

pub use account::*;
pub use budget::*;
pub use self::core::*;
pub use transaction::*;
