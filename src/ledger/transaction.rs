//! Transaction creation and history queries

use bigdecimal::BigDecimal;
use log::{debug, warn};

use crate::ledger::budget::RecentDebitCapPolicy;
use crate::traits::{AccountStore, BudgetPolicy};
use crate::types::*;
use crate::utils::validation::validate_positive_amount;

/// How many times a budget-guarded apply is retried when it loses the
/// optimistic race before the conflict is surfaced to the caller.
const MAX_APPLY_ATTEMPTS: usize = 16;

/// Produce the canonical transaction label: `"T" + kind code + "-" + uppercase(name)`.
///
/// Pure and deterministic. The label is computed once at creation and
/// persisted on the transaction so reads never recompute it.
///
/// ```
/// use ledger_core::{format_label, TransactionKind};
///
/// assert_eq!(format_label("alice", TransactionKind::Credit).unwrap(), "T1-ALICE");
/// assert_eq!(format_label("bob", TransactionKind::Debit).unwrap(), "T0-BOB");
/// ```
pub fn format_label(name: &str, kind: TransactionKind) -> LedgerResult<String> {
    if name.trim().is_empty() {
        return Err(LedgerError::InvalidArgument(
            "transaction name cannot be empty".to_string(),
        ));
    }
    Ok(format!("T{}-{}", kind.code(), name.to_uppercase()))
}

/// Transaction manager: validates input, consults the budget policy, and
/// drives the store's atomic apply step.
pub struct TransactionManager<S: AccountStore> {
    storage: S,
    budget_policy: Box<dyn BudgetPolicy>,
}

impl<S: AccountStore> TransactionManager<S> {
    /// Create a new transaction manager with the default budget policy.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            budget_policy: Box::new(RecentDebitCapPolicy),
        }
    }

    /// Create a new transaction manager with a custom budget policy.
    pub fn with_policy(storage: S, budget_policy: Box<dyn BudgetPolicy>) -> Self {
        Self {
            storage,
            budget_policy,
        }
    }

    /// Create and apply a transaction against an account.
    ///
    /// Validates the magnitude and name, runs the budget gate for debits on
    /// budget-configured accounts, then applies the signed delta and
    /// persists the record in one atomic step. On failure nothing is
    /// applied: no balance change, no counter change, no stored record.
    pub async fn create_transaction(
        &self,
        name: &str,
        magnitude: BigDecimal,
        kind: TransactionKind,
        account_id: AccountId,
    ) -> LedgerResult<Transaction> {
        validate_positive_amount(&magnitude)?;
        let label = format_label(name, kind)?;
        let delta = kind.signed_delta(&magnitude);

        for attempt in 1..=MAX_APPLY_ATTEMPTS {
            let account = self
                .storage
                .get_account(account_id)
                .await?
                .ok_or(LedgerError::AccountNotFound(account_id))?;

            let draft = TransactionDraft {
                label: label.clone(),
                amount: magnitude.clone(),
                kind,
            };

            // The guard only gates debits, and only when a budget is
            // configured. Unguarded applies need no optimistic token: the
            // store serializes them per account on its own.
            let guarded = kind == TransactionKind::Debit && account.budget.is_some();
            if !guarded {
                let (_, transaction) =
                    self.storage.apply_delta(account_id, &delta, draft, None).await?;
                return Ok(transaction);
            }

            let lookback = account.budget.as_ref().map(|b| b.lookback).unwrap_or(0);
            let recent = self.storage.recent_transactions(account_id, lookback).await?;
            self.budget_policy.check_debit(&account, &recent, &magnitude)?;

            // The counter observed alongside the history read is the
            // optimistic token: if another transaction lands in between,
            // the apply fails and the check is redone against fresh state.
            match self
                .storage
                .apply_delta(account_id, &delta, draft, Some(account.transaction_counter))
                .await
            {
                Ok((_, transaction)) => return Ok(transaction),
                Err(LedgerError::Conflict(_)) => {
                    debug!(
                        "apply on account {} lost the optimistic race (attempt {}), retrying",
                        account_id, attempt
                    );
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "giving up on account {} after {} conflicted attempts",
            account_id, MAX_APPLY_ATTEMPTS
        );
        Err(LedgerError::Conflict(account_id))
    }

    /// List an account's transactions in ascending creation order.
    pub async fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>> {
        // Surface NotFound for unknown accounts rather than an empty list.
        self.storage
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        self.storage.transactions_for_account(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;

    async fn store_with_account(initial: i64) -> (MemoryStore, AccountId) {
        let store = MemoryStore::new();
        let user = store.create_user("Valentin", "valentin@example.com").await.unwrap();
        let account = store
            .create_account("Checking", BigDecimal::from(initial), user.id)
            .await
            .unwrap();
        (store, account.id)
    }

    #[test]
    fn label_format() {
        assert_eq!(
            format_label("alice", TransactionKind::Credit).unwrap(),
            "T1-ALICE"
        );
        assert_eq!(format_label("bob", TransactionKind::Debit).unwrap(), "T0-BOB");
        assert!(matches!(
            format_label("", TransactionKind::Debit),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            format_label("   ", TransactionKind::Credit),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn create_transaction_applies_signed_delta() {
        let (store, account_id) = store_with_account(2000).await;
        let manager = TransactionManager::new(store.clone());

        let tx = manager
            .create_transaction("rent", BigDecimal::from(800), TransactionKind::Debit, account_id)
            .await
            .unwrap();
        assert_eq!(tx.label, "T0-RENT");
        assert_eq!(tx.amount, BigDecimal::from(800));

        manager
            .create_transaction("salary", BigDecimal::from(300), TransactionKind::Credit, account_id)
            .await
            .unwrap();

        let account = store.get_account(account_id).await.unwrap().unwrap();
        assert_eq!(account.balance, BigDecimal::from(1500));
        assert_eq!(account.transaction_counter, 2);
    }

    #[tokio::test]
    async fn rejects_non_positive_magnitudes_without_side_effects() {
        let (store, account_id) = store_with_account(100).await;
        let manager = TransactionManager::new(store.clone());

        for magnitude in [BigDecimal::from(0), BigDecimal::from(-5)] {
            let err = manager
                .create_transaction("junk", magnitude, TransactionKind::Credit, account_id)
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)));
        }

        let account = store.get_account(account_id).await.unwrap().unwrap();
        assert_eq!(account.balance, BigDecimal::from(100));
        assert_eq!(account.transaction_counter, 0);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let store = MemoryStore::new();
        let manager = TransactionManager::new(store);
        let err = manager
            .create_transaction("x", BigDecimal::from(1), TransactionKind::Credit, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(999)));
    }

    #[tokio::test]
    async fn budget_denial_leaves_no_trace() {
        let (store, account_id) = store_with_account(1000).await;
        store
            .set_budget(
                account_id,
                Some(BudgetConfig {
                    cap: BigDecimal::from(100),
                    lookback: 5,
                }),
            )
            .await
            .unwrap();
        let manager = TransactionManager::new(store.clone());

        let err = manager
            .create_transaction("splurge", BigDecimal::from(150), TransactionKind::Debit, account_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BudgetExceeded { .. }));

        let account = store.get_account(account_id).await.unwrap().unwrap();
        assert_eq!(account.balance, BigDecimal::from(1000));
        assert_eq!(account.transaction_counter, 0);
        assert!(store
            .transactions_for_account(account_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn budget_counts_recent_debits_only() {
        let (store, account_id) = store_with_account(1000).await;
        store
            .set_budget(
                account_id,
                Some(BudgetConfig {
                    cap: BigDecimal::from(100),
                    lookback: 5,
                }),
            )
            .await
            .unwrap();
        let manager = TransactionManager::new(store.clone());

        manager
            .create_transaction("coffee", BigDecimal::from(60), TransactionKind::Debit, account_id)
            .await
            .unwrap();
        // Credits are not spending and must not consume budget.
        manager
            .create_transaction("refund", BigDecimal::from(500), TransactionKind::Credit, account_id)
            .await
            .unwrap();

        let err = manager
            .create_transaction("dinner", BigDecimal::from(50), TransactionKind::Debit, account_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BudgetExceeded { .. }));

        manager
            .create_transaction("snack", BigDecimal::from(40), TransactionKind::Debit, account_id)
            .await
            .unwrap();

        let account = store.get_account(account_id).await.unwrap().unwrap();
        assert_eq!(account.balance, BigDecimal::from(1400));
        assert_eq!(account.transaction_counter, 3);
    }
}
