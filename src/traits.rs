//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// Storage abstraction for accounts, users, and transaction history.
///
/// This trait lets the ledger engine work with any storage backend
/// (a relational database, an embedded store, in-memory, etc.). Methods
/// take `&self`: implementations are expected to use interior mutability
/// so one handle can be shared across concurrent tasks.
///
/// # Atomicity contract
///
/// [`apply_delta`](AccountStore::apply_delta) is the only balance-mutating
/// primitive. Within one per-account critical section it must apply the
/// signed delta to the balance, increment the transaction counter, and
/// persist the transaction record — all observable together or not at all.
/// Two concurrent calls against the same account must serialize with no
/// lost updates; calls against different accounts need no mutual ordering.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Register a new user.
    async fn create_user(&self, name: &str, email: &str) -> LedgerResult<User>;

    /// Get a user by ID.
    async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>>;

    /// List all registered users.
    async fn list_users(&self) -> LedgerResult<Vec<User>>;

    /// Create an account with an initial balance, owned by an existing user.
    ///
    /// Bumps the owner's advisory account count.
    async fn create_account(
        &self,
        name: &str,
        initial_balance: BigDecimal,
        owner_id: UserId,
    ) -> LedgerResult<Account>;

    /// Get an account by ID.
    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>>;

    /// List all accounts.
    async fn list_accounts(&self) -> LedgerResult<Vec<Account>>;

    /// List the accounts owned by a user.
    async fn accounts_for_user(&self, owner_id: UserId) -> LedgerResult<Vec<Account>>;

    /// Enable, replace, or disable (with `None`) an account's budget cap.
    async fn set_budget(
        &self,
        account_id: AccountId,
        budget: Option<BudgetConfig>,
    ) -> LedgerResult<Account>;

    /// List an account's transactions in ascending creation order.
    async fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>>;

    /// The account's most recent transactions, newest first, bounded by
    /// `limit`. This is the budget guard's history read.
    async fn recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> LedgerResult<Vec<Transaction>>;

    /// Atomically apply a signed delta to an account and persist the
    /// transaction record, returning the updated account and the stored
    /// transaction.
    ///
    /// When `expected_counter` is given, the apply only proceeds if the
    /// account's transaction counter still has that value; otherwise it
    /// fails with [`LedgerError::Conflict`] and leaves no trace. Callers
    /// use this as an optimistic token to make a read-check-apply sequence
    /// behave as one critical section.
    async fn apply_delta(
        &self,
        account_id: AccountId,
        delta: &BigDecimal,
        draft: TransactionDraft,
        expected_counter: Option<u64>,
    ) -> LedgerResult<(Account, Transaction)>;
}

/// Decision gate consulted before a debit is applied to an account with a
/// configured budget.
///
/// Implementations must be pure read-then-decide: no mutation, so a denial
/// has zero side effects. `recent` is the account's most recent history,
/// newest first, at least as long as the configured lookback window (or the
/// full history if shorter).
pub trait BudgetPolicy: Send + Sync {
    /// Allow (`Ok`) or deny (`Err(BudgetExceeded)`) a prospective debit.
    fn check_debit(
        &self,
        account: &Account,
        recent: &[Transaction],
        magnitude: &BigDecimal,
    ) -> LedgerResult<()>;
}
