//! Budget guard: the read-then-decide gate applied to debits

use bigdecimal::BigDecimal;
use log::debug;

use crate::traits::BudgetPolicy;
use crate::types::*;

/// Default budget policy: the prospective debit plus the debits among the
/// account's most recent `lookback` transactions must not exceed the cap.
///
/// Accounts without a configured budget are always allowed.
pub struct RecentDebitCapPolicy;

impl BudgetPolicy for RecentDebitCapPolicy {
    fn check_debit(
        &self,
        account: &Account,
        recent: &[Transaction],
        magnitude: &BigDecimal,
    ) -> LedgerResult<()> {
        let Some(budget) = &account.budget else {
            return Ok(());
        };

        let spent: BigDecimal = recent
            .iter()
            .take(budget.lookback)
            .filter(|tx| tx.kind == TransactionKind::Debit)
            .map(|tx| &tx.amount)
            .sum();

        if spent + magnitude > budget.cap {
            debug!(
                "denying debit of {} on account {}: cap {}",
                magnitude, account.id, budget.cap
            );
            return Err(LedgerError::BudgetExceeded {
                requested: magnitude.clone(),
                cap: budget.cap.clone(),
            });
        }

        Ok(())
    }
}
