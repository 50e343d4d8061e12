//! Derives a user's available balance from the ledger and savings stores.

use rust_decimal::Decimal;

use crate::{
    Error,
    models::{TransactionKind, UserID},
    stores::{SavingsGoalStore, TransactionQuery, TransactionStore},
};

/// A snapshot of the totals that make up a user's available balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// Sum of the amounts of the user's income transactions.
    pub total_income: Decimal,
    /// Sum of the amounts of the user's expense transactions.
    pub total_expense: Decimal,
    /// Sum of the current amounts across the user's savings goals.
    pub total_saved: Decimal,
    /// The money neither spent nor set aside:
    /// `total_income - total_expense - total_saved`.
    pub available: Decimal,
}

/// Compute `user_id`'s balance from the current persisted state.
///
/// The totals are derived from scratch on every call rather than cached:
/// the available balance guards the savings goal add operation, and a stale
/// value would let the same money be set aside twice. Both stores are read
/// scoped to `user_id` only.
pub fn calculate_balance<T, G>(
    transactions: &T,
    savings_goals: &G,
    user_id: UserID,
) -> Result<Balance, Error>
where
    T: TransactionStore,
    G: SavingsGoalStore,
{
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    for transaction in transactions.get_query(TransactionQuery::for_user(user_id))? {
        match transaction.kind {
            TransactionKind::Income => total_income += transaction.amount,
            TransactionKind::Expense => total_expense += transaction.amount,
        }
    }

    let total_saved = savings_goals
        .get_by_user(user_id)?
        .iter()
        .map(|goal| goal.current_amount)
        .sum::<Decimal>();

    Ok(Balance {
        total_income,
        total_expense,
        total_saved,
        available: total_income - total_expense - total_saved,
    })
}
