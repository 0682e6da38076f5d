//! Core types and data structures for the ledger engine

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier for a registered user.
pub type UserId = i64;

/// Identifier for a balance-bearing account.
pub type AccountId = i64;

/// Identifier for an applied transaction. Assigned monotonically, so it
/// doubles as the ordering key for an account's history.
pub type TransactionId = i64;

/// The two kinds of ledger transaction.
///
/// The kind determines the sign of a transaction's effect on the account
/// balance; the stored amount is always a non-negative magnitude. Using an
/// enum instead of the raw wire code makes invalid kinds unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Decreases the account balance.
    Debit,
    /// Increases the account balance.
    Credit,
}

impl TransactionKind {
    /// Integer code used in transaction labels: `0` for debit, `1` for credit.
    pub fn code(&self) -> u8 {
        match self {
            TransactionKind::Debit => 0,
            TransactionKind::Credit => 1,
        }
    }

    /// The signed balance effect of a transaction of this kind.
    pub fn signed_delta(&self, magnitude: &BigDecimal) -> BigDecimal {
        match self {
            TransactionKind::Debit => -magnitude.clone(),
            TransactionKind::Credit => magnitude.clone(),
        }
    }
}

/// A registered user who owns accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// When the user was registered
    pub created_at: NaiveDateTime,
    /// Denormalized count of owned accounts. Advisory only: it may drift
    /// and the engine never relies on it for integrity.
    pub accounts: u64,
}

/// Per-account spending cap configuration for the budget guard.
///
/// A prospective debit is denied when it, together with the debits among
/// the account's most recent `lookback` transactions, would exceed `cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Maximum cumulative debit spend within the evaluation window
    pub cap: BigDecimal,
    /// Number of most recent transactions the cap is evaluated against
    pub lookback: usize,
}

/// A balance-bearing account owned by a user.
///
/// Invariants maintained by the engine:
/// `balance == opening_balance + sum(signed deltas of applied transactions)`
/// and `transaction_counter == count(applied transactions)`. Both fields
/// are mutated exclusively through the store's atomic apply primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: AccountId,
    /// Human-readable account name
    pub name: String,
    /// Current signed balance
    pub balance: BigDecimal,
    /// Balance the account was created with
    pub opening_balance: BigDecimal,
    /// Owning user
    pub owner_id: UserId,
    /// Count of transactions applied to this account
    pub transaction_counter: u64,
    /// Spending cap, if the budget guard is enabled for this account
    pub budget: Option<BudgetConfig>,
    /// When the account was created
    pub created_at: NaiveDateTime,
}

/// An immutable, signed-effect event applied to exactly one account.
///
/// Transactions are append-only: the engine never edits or deletes one.
/// Corrections are modeled as new offsetting transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned on creation
    pub id: TransactionId,
    /// Canonical label, computed once at creation and persisted
    pub label: String,
    /// Non-negative magnitude; the sign of the effect comes from `kind`
    pub amount: BigDecimal,
    /// Whether this transaction debits or credits the account
    pub kind: TransactionKind,
    /// The account the transaction applies to
    pub account_id: AccountId,
    /// When the transaction was created
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// The signed effect this transaction had on its account's balance.
    pub fn signed_amount(&self) -> BigDecimal {
        self.kind.signed_delta(&self.amount)
    }
}

/// The fields of a transaction that are known before the store assigns an
/// identifier and timestamp. Passed to the atomic apply step so the record
/// is persisted in the same critical section as the balance change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Canonical label, already formatted
    pub label: String,
    /// Non-negative magnitude
    pub amount: BigDecimal,
    /// Debit or credit
    pub kind: TransactionKind,
}

/// Errors that can occur in the ledger engine
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    #[error(
        "budget exceeded: debit of {requested} would push recent spending past the cap of {cap}"
    )]
    BudgetExceeded {
        requested: BigDecimal,
        cap: BigDecimal,
    },
    #[error("account {0} was modified concurrently")]
    Conflict(AccountId),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),
    #[error("snapshot read failed")]
    SnapshotRead(#[source] std::io::Error),
    #[error("snapshot write failed")]
    SnapshotWrite(#[source] std::io::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
