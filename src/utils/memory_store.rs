//! In-memory account store for testing and development

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::traits::AccountStore;
use crate::types::*;

/// One account and its transaction history, guarded together so a balance
/// change and the record that caused it commit in a single critical section.
#[derive(Debug)]
struct AccountSlot {
    account: Account,
    /// Append-only, ascending creation order.
    transactions: Vec<Transaction>,
}

/// In-memory [`AccountStore`] implementation.
///
/// Accounts live in individually locked slots behind a registry lock, so
/// mutations on one account serialize while different accounts proceed in
/// parallel. The handle is cheap to clone; clones share the same data.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    accounts: Arc<RwLock<HashMap<AccountId, Arc<Mutex<AccountSlot>>>>>,
    next_user_id: Arc<AtomicI64>,
    next_account_id: Arc<AtomicI64>,
    next_transaction_id: Arc<AtomicI64>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            accounts: Arc::new(RwLock::new(HashMap::new())),
            next_user_id: Arc::new(AtomicI64::new(1)),
            next_account_id: Arc::new(AtomicI64::new(1)),
            next_transaction_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn slot(&self, account_id: AccountId) -> LedgerResult<Arc<Mutex<AccountSlot>>> {
        self.accounts
            .read()
            .map_err(|_| LedgerError::Storage("account registry lock poisoned".to_string()))?
            .get(&account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(account_id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_slot(slot: &Mutex<AccountSlot>) -> LedgerResult<std::sync::MutexGuard<'_, AccountSlot>> {
    slot.lock()
        .map_err(|_| LedgerError::Storage("account lock poisoned".to_string()))
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, name: &str, email: &str) -> LedgerResult<User> {
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            email: email.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
            accounts: 0,
        };
        self.users
            .write()
            .map_err(|_| LedgerError::Storage("user registry lock poisoned".to_string()))?
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>> {
        Ok(self
            .users
            .read()
            .map_err(|_| LedgerError::Storage("user registry lock poisoned".to_string()))?
            .get(&user_id)
            .cloned())
    }

    async fn list_users(&self) -> LedgerResult<Vec<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| LedgerError::Storage("user registry lock poisoned".to_string()))?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    async fn create_account(
        &self,
        name: &str,
        initial_balance: BigDecimal,
        owner_id: UserId,
    ) -> LedgerResult<Account> {
        {
            let mut users = self
                .users
                .write()
                .map_err(|_| LedgerError::Storage("user registry lock poisoned".to_string()))?;
            let owner = users
                .get_mut(&owner_id)
                .ok_or(LedgerError::UserNotFound(owner_id))?;
            // Advisory count only; nothing relies on it.
            owner.accounts += 1;
        }

        let account = Account {
            id: self.next_account_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            balance: initial_balance.clone(),
            opening_balance: initial_balance,
            owner_id,
            transaction_counter: 0,
            budget: None,
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.accounts
            .write()
            .map_err(|_| LedgerError::Storage("account registry lock poisoned".to_string()))?
            .insert(
                account.id,
                Arc::new(Mutex::new(AccountSlot {
                    account: account.clone(),
                    transactions: Vec::new(),
                })),
            );
        Ok(account)
    }

    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        match self.slot(account_id) {
            Ok(slot) => Ok(Some(lock_slot(&slot)?.account.clone())),
            Err(LedgerError::AccountNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        let slots: Vec<Arc<Mutex<AccountSlot>>> = self
            .accounts
            .read()
            .map_err(|_| LedgerError::Storage("account registry lock poisoned".to_string()))?
            .values()
            .cloned()
            .collect();

        let mut all = Vec::with_capacity(slots.len());
        for slot in slots {
            all.push(lock_slot(&slot)?.account.clone());
        }
        all.sort_by_key(|a| a.id);
        Ok(all)
    }

    async fn accounts_for_user(&self, owner_id: UserId) -> LedgerResult<Vec<Account>> {
        let all = self.list_accounts().await?;
        Ok(all.into_iter().filter(|a| a.owner_id == owner_id).collect())
    }

    async fn set_budget(
        &self,
        account_id: AccountId,
        budget: Option<BudgetConfig>,
    ) -> LedgerResult<Account> {
        let slot = self.slot(account_id)?;
        let mut slot = lock_slot(&slot)?;
        slot.account.budget = budget;
        Ok(slot.account.clone())
    }

    async fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>> {
        let slot = self.slot(account_id)?;
        let slot = lock_slot(&slot)?;
        Ok(slot.transactions.clone())
    }

    async fn recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> LedgerResult<Vec<Transaction>> {
        let slot = self.slot(account_id)?;
        let slot = lock_slot(&slot)?;
        Ok(slot.transactions.iter().rev().take(limit).cloned().collect())
    }

    async fn apply_delta(
        &self,
        account_id: AccountId,
        delta: &BigDecimal,
        draft: TransactionDraft,
        expected_counter: Option<u64>,
    ) -> LedgerResult<(Account, Transaction)> {
        let slot = self.slot(account_id)?;
        let mut slot = lock_slot(&slot)?;

        if let Some(expected) = expected_counter {
            if slot.account.transaction_counter != expected {
                return Err(LedgerError::Conflict(account_id));
            }
        }

        let transaction = Transaction {
            id: self.next_transaction_id.fetch_add(1, Ordering::SeqCst),
            label: draft.label,
            amount: draft.amount,
            kind: draft.kind,
            account_id,
            created_at: chrono::Utc::now().naive_utc(),
        };

        slot.account.balance += delta;
        slot.account.transaction_counter += 1;
        slot.transactions.push(transaction.clone());

        Ok((slot.account.clone(), transaction))
    }
}
