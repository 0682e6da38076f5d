//! # Ledger Core
//!
//! A personal-finance ledger engine: users own accounts, accounts
//! accumulate signed transactions, and balances always equal the sum of
//! applied transactions.
//!
//! ## Features
//!
//! - **Atomic transaction application**: balance, counter, and the
//!   transaction record commit as one unit, with per-account serialization
//!   and no lost updates under concurrency
//! - **Budget guard**: a configurable per-account spending cap evaluated
//!   against recent debit history before any state change
//! - **Canonical labels**: transaction labels computed once at creation
//!   (`T<code>-<UPPERCASE NAME>`) and persisted
//! - **CSV snapshots**: durable point-in-time export of account state and
//!   verbatim read-back
//! - **Storage abstraction**: backend-agnostic design via the
//!   [`AccountStore`] trait, with an in-memory reference implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use ledger_core::{Ledger, MemoryStore, TransactionKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ledger_core::LedgerResult<()> {
//! let ledger = Ledger::new(MemoryStore::new());
//! let user = ledger.register_user("Valentin", "valentin@example.com").await?;
//! let account = ledger.create_account("Checking", BigDecimal::from(2000), user.id).await?;
//! let tx = ledger
//!     .create_transaction("rent", BigDecimal::from(800), TransactionKind::Debit, account.id)
//!     .await?;
//! assert_eq!(tx.label, "T0-RENT");
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod snapshot;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use snapshot::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_store::MemoryStore;
