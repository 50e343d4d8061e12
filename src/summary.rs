//! Monthly and yearly roll-ups of a user's transactions.
//!
//! Summaries are display reads: they take no lock and may trail an
//! in-flight write by a moment.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    auth::Claims,
    models::{Transaction, TransactionKind, UserID},
    state::AppState,
    stores::{TransactionQuery, TransactionStore, month_date_range},
};

/// The income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The 1-based calendar month the summary covers.
    pub month: u8,
    /// The year the summary covers.
    pub year: i32,
    /// Sum of the month's income transaction amounts.
    pub income: Decimal,
    /// Sum of the month's expense transaction amounts.
    pub expense: Decimal,
    /// `income - expense`. Negative in months where spending exceeded earnings.
    pub net: Decimal,
}

/// The per-month breakdown and totals for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    /// The year the summary covers.
    pub year: i32,
    /// Sum of the year's income transaction amounts.
    pub income: Decimal,
    /// Sum of the year's expense transaction amounts.
    pub expense: Decimal,
    /// `income - expense` over the whole year.
    pub net: Decimal,
    /// One entry per calendar month, January first.
    pub months: Vec<MonthlySummary>,
}

fn totals(transactions: &[Transaction]) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expense += transaction.amount,
        }
    }

    (income, expense)
}

/// Compute the income and expense totals for `user_id`'s transactions in
/// the given month.
///
/// # Errors
/// Returns an [Error::InvalidDate] if `month` is not in `1..=12`.
pub fn monthly_summary<T>(
    transactions: &T,
    user_id: UserID,
    year: i32,
    month: u8,
) -> Result<MonthlySummary, Error>
where
    T: TransactionStore,
{
    let transactions = transactions.get_query(TransactionQuery {
        date_range: Some(month_date_range(year, month)?),
        ..TransactionQuery::for_user(user_id)
    })?;

    let (income, expense) = totals(&transactions);

    Ok(MonthlySummary {
        month,
        year,
        income,
        expense,
        net: income - expense,
    })
}

/// Compute the per-month breakdown and totals for `user_id`'s transactions
/// in the given year.
///
/// The whole year is fetched with one query and bucketed by month.
pub fn yearly_summary<T>(transactions: &T, user_id: UserID, year: i32) -> Result<YearlySummary, Error>
where
    T: TransactionStore,
{
    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;

    let transactions = transactions.get_query(TransactionQuery {
        date_range: Some(start..=end),
        ..TransactionQuery::for_user(user_id)
    })?;

    let mut month_totals = [(Decimal::ZERO, Decimal::ZERO); 12];

    for transaction in &transactions {
        let index = u8::from(transaction.date.month()) as usize - 1;

        match transaction.kind {
            TransactionKind::Income => month_totals[index].0 += transaction.amount,
            TransactionKind::Expense => month_totals[index].1 += transaction.amount,
        }
    }

    let months = month_totals
        .iter()
        .enumerate()
        .map(|(index, (income, expense))| MonthlySummary {
            month: index as u8 + 1,
            year,
            income: *income,
            expense: *expense,
            net: income - expense,
        })
        .collect();

    let (income, expense) = totals(&transactions);

    Ok(YearlySummary {
        year,
        income,
        expense,
        net: income - expense,
        months,
    })
}

/// The month/year a summary is requested for.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// The 1-based calendar month to summarize.
    pub month: u8,
    /// The year to summarize.
    pub year: i32,
}

/// A route handler for the caller's monthly summary.
pub async fn get_monthly_summary(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<SummaryQuery>,
) -> Result<Response, Error> {
    let summary = monthly_summary(&state.transaction_store, claims.sub, query.year, query.month)?;

    Ok(Json(summary).into_response())
}

/// A route handler for the caller's yearly summary.
pub async fn get_yearly_summary(
    State(state): State<AppState>,
    claims: Claims,
    Path(year): Path<i32>,
) -> Result<Response, Error> {
    let summary = yearly_summary(&state.transaction_store, claims.sub, year)?;

    Ok(Json(summary).into_response())
}
