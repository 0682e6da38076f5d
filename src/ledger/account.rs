//! Account and user management functionality

use bigdecimal::BigDecimal;

use crate::traits::AccountStore;
use crate::types::*;
use crate::utils::validation::validate_name;

/// Account manager for user registration and account lifecycle operations.
pub struct AccountManager<S: AccountStore> {
    pub(crate) storage: S,
}

impl<S: AccountStore> AccountManager<S> {
    /// Create a new account manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a new user
    pub async fn register_user(&self, name: &str, email: &str) -> LedgerResult<User> {
        validate_name(name, "user name")?;
        validate_name(email, "email")?;
        self.storage.create_user(name, email).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>> {
        self.storage.get_user(user_id).await
    }

    /// Get a user by ID, returning an error if not found
    pub async fn get_user_required(&self, user_id: UserId) -> LedgerResult<User> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))
    }

    /// List all registered users
    pub async fn list_users(&self) -> LedgerResult<Vec<User>> {
        self.storage.list_users().await
    }

    /// Create a new account with an initial balance, owned by `owner_id`
    pub async fn create_account(
        &self,
        name: &str,
        initial_balance: BigDecimal,
        owner_id: UserId,
    ) -> LedgerResult<Account> {
        validate_name(name, "account name")?;
        self.storage
            .create_account(name, initial_balance, owner_id)
            .await
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        self.storage.get_account(account_id).await
    }

    /// Get an account by ID, returning an error if not found
    pub async fn get_account_required(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.storage
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        self.storage.list_accounts().await
    }

    /// List the accounts owned by a user
    pub async fn accounts_for_user(&self, owner_id: UserId) -> LedgerResult<Vec<Account>> {
        self.get_user_required(owner_id).await?;
        self.storage.accounts_for_user(owner_id).await
    }

    /// Enable, replace, or disable an account's budget cap
    pub async fn configure_budget(
        &self,
        account_id: AccountId,
        budget: Option<BudgetConfig>,
    ) -> LedgerResult<Account> {
        if let Some(config) = &budget {
            if config.cap < BigDecimal::from(0) {
                return Err(LedgerError::InvalidArgument(
                    "budget cap cannot be negative".to_string(),
                ));
            }
            if config.lookback == 0 {
                return Err(LedgerError::InvalidArgument(
                    "budget lookback must be at least one transaction".to_string(),
                ));
            }
        }
        self.storage.set_budget(account_id, budget).await
    }
}
