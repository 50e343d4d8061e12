//! Route handlers for creating, listing, updating, and deleting the
//! income/expense transactions that make up a user's ledger.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use time::Date;

use crate::{
    Error,
    auth::Claims,
    models::{DatabaseID, MAX_COMMENT_LENGTH, Transaction, TransactionKind},
    state::AppState,
    stores::{SortOrder, TransactionQuery, TransactionStore, month_date_range},
};

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// An optional note describing what the transaction was for.
    #[serde(default)]
    pub comment: Option<String>,
}

/// The request body for updating a transaction.
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionUpdate {
    /// A new date for the transaction.
    pub date: Option<Date>,
    /// A new amount for the transaction.
    pub amount: Option<Decimal>,
    /// A new kind for the transaction.
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// A new comment for the transaction.
    pub comment: Option<String>,
}

/// The optional month/year filter for listing transactions.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    /// The 1-based calendar month to filter by.
    pub month: Option<u8>,
    /// The year to filter by.
    pub year: Option<i32>,
}

/// A route handler for creating a new transaction.
pub async fn create_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<Response, Error> {
    let mut builder = Transaction::build(
        new_transaction.amount,
        new_transaction.date,
        new_transaction.kind,
        claims.sub,
    )?;

    if let Some(comment) = new_transaction.comment {
        builder = builder.comment(comment)?;
    }

    let transaction = state.transaction_store.create_from_builder(builder)?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

/// A route handler for listing the caller's transactions.
///
/// With both `month` and `year` query parameters, only that month's
/// transactions are returned in ascending date order (the order a calendar
/// renders them). Otherwise all transactions are returned newest first.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<TransactionListQuery>,
) -> Result<Response, Error> {
    let query = match (query.month, query.year) {
        (Some(month), Some(year)) => TransactionQuery {
            date_range: Some(month_date_range(year, month)?),
            sort_date: Some(SortOrder::Ascending),
            ..TransactionQuery::for_user(claims.sub)
        },
        _ => TransactionQuery {
            sort_date: Some(SortOrder::Descending),
            ..TransactionQuery::for_user(claims.sub)
        },
    };

    let transactions = state.transaction_store.get_query(query)?;

    Ok(Json(transactions).into_response())
}

/// A route handler for updating a transaction.
///
/// Responds with 404 if the transaction does not exist or belongs to
/// another user.
pub async fn update_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Response, Error> {
    let mut transaction = state.transaction_store.get(transaction_id, claims.sub)?;

    if let Some(date) = update.date {
        transaction.date = date;
    }

    if let Some(amount) = update.amount {
        if amount < Decimal::ZERO {
            return Err(Error::NegativeAmount);
        }

        transaction.amount = amount;
    }

    if let Some(kind) = update.kind {
        transaction.kind = kind;
    }

    if let Some(comment) = update.comment {
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(Error::CommentTooLong);
        }

        transaction.comment = comment;
    }

    state.transaction_store.update(&transaction)?;

    Ok(Json(transaction).into_response())
}

/// A route handler for deleting a transaction.
///
/// Responds with 404 if the transaction does not exist or belongs to
/// another user.
pub async fn delete_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Response, Error> {
    state.transaction_store.delete(transaction_id, claims.sub)?;

    Ok(Json(json!({ "message": "Transaction deleted" })).into_response())
}

#[cfg(test)]
mod transaction_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        build_router, endpoints,
        models::{Transaction, TransactionKind},
        state::AppState,
    };

    async fn create_app_with_user() -> (TestServer, String) {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "42",
        )
        .expect("Could not create app state.");

        let server = TestServer::new(build_router(state));

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": "test@test.com",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let token = response.json::<serde_json::Value>()["token"]
            .as_str()
            .unwrap()
            .to_owned();

        (server, token)
    }

    async fn insert_transaction(
        server: &TestServer,
        token: &str,
        date: &str,
        amount: f64,
        kind: &str,
    ) -> Transaction {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "date": date,
                "amount": amount,
                "type": kind,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<Transaction>()
    }

    #[tokio::test]
    async fn create_transaction_responds_with_201() {
        let (server, token) = create_app_with_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "date": "2026-01-15",
                "amount": 123.45,
                "type": "expense",
                "comment": "Groceries",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.date, date!(2026 - 01 - 15));
        assert_eq!(transaction.amount, dec!(123.45));
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.comment, "Groceries");
    }

    #[tokio::test]
    async fn create_transaction_rejects_negative_amount() {
        let (server, token) = create_app_with_user().await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "date": "2026-01-15",
                "amount": -1,
                "type": "expense",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_transaction_requires_authentication() {
        let (server, _) = create_app_with_user().await;

        server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .json(&json!({
                "date": "2026-01-15",
                "amount": 1,
                "type": "expense",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_returns_all_transactions_newest_first() {
        let (server, token) = create_app_with_user().await;

        insert_transaction(&server, &token, "2026-01-10", 1.0, "income").await;
        insert_transaction(&server, &token, "2026-03-10", 2.0, "income").await;
        insert_transaction(&server, &token, "2026-02-10", 3.0, "income").await;

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();

        let dates: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date!(2026 - 03 - 10),
                date!(2026 - 02 - 10),
                date!(2026 - 01 - 10)
            ]
        );
    }

    #[tokio::test]
    async fn list_filters_by_month_and_year() {
        let (server, token) = create_app_with_user().await;

        let want = insert_transaction(&server, &token, "2026-01-10", 1.0, "income").await;
        insert_transaction(&server, &token, "2026-02-10", 2.0, "income").await;
        insert_transaction(&server, &token, "2025-01-10", 3.0, "income").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .add_query_param("month", 1)
            .add_query_param("year", 2026)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![want]);
    }

    #[tokio::test]
    async fn list_rejects_invalid_month() {
        let (server, token) = create_app_with_user().await;

        server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .add_query_param("month", 13)
            .add_query_param("year", 2026)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_changes_only_the_provided_fields() {
        let (server, token) = create_app_with_user().await;

        let transaction = insert_transaction(&server, &token, "2026-01-10", 10.0, "expense").await;

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "amount": 20, "comment": "Corrected" }))
            .await;

        response.assert_status_ok();

        let updated = response.json::<Transaction>();
        assert_eq!(updated.amount, dec!(20));
        assert_eq!(updated.comment, "Corrected");
        assert_eq!(updated.date, transaction.date);
        assert_eq!(updated.kind, transaction.kind);
    }

    #[tokio::test]
    async fn delete_removes_the_transaction() {
        let (server, token) = create_app_with_user().await;

        let transaction = insert_transaction(&server, &token, "2026-01-10", 10.0, "expense").await;

        server
            .delete(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_fail_on_another_users_transaction() {
        let (server, token) = create_app_with_user().await;

        let transaction = insert_transaction(&server, &token, "2026-01-10", 10.0, "expense").await;

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Other",
                "email": "other@test.com",
                "password": "anothersafeandsecurepassword",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let other_token = response.json::<serde_json::Value>()["token"]
            .as_str()
            .unwrap()
            .to_owned();

        server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .authorization_bearer(&other_token)
            .content_type("application/json")
            .json(&json!({ "amount": 1 }))
            .await
            .assert_status_not_found();

        server
            .delete(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .authorization_bearer(&other_token)
            .await
            .assert_status_not_found();
    }
}
