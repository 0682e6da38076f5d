//! Main ledger orchestrator that coordinates accounts and transactions

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ledger::{AccountManager, TransactionManager};
use crate::snapshot::SnapshotStore;
use crate::traits::*;
use crate::types::*;

/// Main ledger engine that orchestrates all operations.
///
/// Every mutation in the system goes through this type; the HTTP layer (or
/// any other caller) maps its operations onto these methods one-to-one.
/// Methods take `&self`, so one engine can be shared across tasks.
pub struct Ledger<S: AccountStore> {
    account_manager: AccountManager<S>,
    transaction_manager: TransactionManager<S>,
}

impl<S: AccountStore + Clone> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            account_manager: AccountManager::new(storage.clone()),
            transaction_manager: TransactionManager::new(storage),
        }
    }

    /// Create a new ledger with a custom budget policy
    pub fn with_policy(storage: S, budget_policy: Box<dyn BudgetPolicy>) -> Self {
        Self {
            account_manager: AccountManager::new(storage.clone()),
            transaction_manager: TransactionManager::with_policy(storage, budget_policy),
        }
    }

    // User operations
    /// Register a new user
    pub async fn register_user(&self, name: &str, email: &str) -> LedgerResult<User> {
        self.account_manager.register_user(name, email).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>> {
        self.account_manager.get_user(user_id).await
    }

    /// List all registered users
    pub async fn list_users(&self) -> LedgerResult<Vec<User>> {
        self.account_manager.list_users().await
    }

    // Account operations
    /// Create a new account with an initial balance
    pub async fn create_account(
        &self,
        name: &str,
        initial_balance: BigDecimal,
        owner_id: UserId,
    ) -> LedgerResult<Account> {
        self.account_manager
            .create_account(name, initial_balance, owner_id)
            .await
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        self.account_manager.get_account(account_id).await
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        self.account_manager.list_accounts().await
    }

    /// List the accounts owned by a user
    pub async fn accounts_for_user(&self, owner_id: UserId) -> LedgerResult<Vec<Account>> {
        self.account_manager.accounts_for_user(owner_id).await
    }

    /// Enable, replace, or disable (with `None`) an account's budget cap
    pub async fn configure_budget(
        &self,
        account_id: AccountId,
        budget: Option<BudgetConfig>,
    ) -> LedgerResult<Account> {
        self.account_manager.configure_budget(account_id, budget).await
    }

    // Transaction operations
    /// Create and atomically apply a transaction against an account
    pub async fn create_transaction(
        &self,
        name: &str,
        magnitude: BigDecimal,
        kind: TransactionKind,
        account_id: AccountId,
    ) -> LedgerResult<Transaction> {
        self.transaction_manager
            .create_transaction(name, magnitude, kind, account_id)
            .await
    }

    /// List an account's transactions in ascending creation order
    pub async fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>> {
        self.transaction_manager
            .transactions_for_account(account_id)
            .await
    }

    // Snapshot operations
    /// Export all accounts to the snapshot destination, replacing any prior
    /// export of the same name
    pub async fn export_snapshot(
        &self,
        snapshots: &SnapshotStore,
        name: &str,
    ) -> LedgerResult<PathBuf> {
        snapshots.export(&self.account_manager.storage, name).await
    }

    /// Read a previously exported snapshot back verbatim
    pub async fn read_snapshot(
        &self,
        snapshots: &SnapshotStore,
        name: &str,
    ) -> LedgerResult<String> {
        snapshots.import(name).await
    }

    /// Recompute an account's balance and counter invariants from its
    /// transaction history and report any discrepancy.
    pub async fn verify_integrity(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<AccountIntegrityReport> {
        let account = self.account_manager.get_account_required(account_id).await?;
        let transactions = self
            .transaction_manager
            .transactions_for_account(account_id)
            .await?;

        let replayed: BigDecimal = transactions.iter().map(|tx| tx.signed_amount()).sum();
        let expected_balance = &account.opening_balance + replayed;
        let expected_counter = transactions.len() as u64;

        let mut issues = Vec::new();
        if account.balance != expected_balance {
            issues.push(format!(
                "balance {} does not match replayed history {}",
                account.balance, expected_balance
            ));
        }
        if account.transaction_counter != expected_counter {
            issues.push(format!(
                "transaction counter {} does not match history length {}",
                account.transaction_counter, expected_counter
            ));
        }

        Ok(AccountIntegrityReport {
            account_id,
            is_valid: issues.is_empty(),
            issues,
            recorded_balance: account.balance,
            expected_balance,
            recorded_counter: account.transaction_counter,
            expected_counter,
        })
    }
}

/// Report on an account's balance/counter consistency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountIntegrityReport {
    pub account_id: AccountId,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recorded_balance: BigDecimal,
    pub expected_balance: BigDecimal,
    pub recorded_counter: u64,
    pub expected_counter: u64,
}
