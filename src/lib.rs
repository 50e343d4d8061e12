//! Épargneur is a personal finance tracker served as a JSON REST API.
//!
//! Users register and log in, record income and expense transactions, and
//! set money aside into savings goals. Moving money into a goal is checked
//! against the user's available balance (total income minus total expenses
//! minus everything already saved), and moving money out of a goal is
//! checked against that goal's saved amount.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::signal;

pub mod auth;
pub mod balance;
pub mod db;
pub mod endpoints;
pub mod models;
pub mod register_user;
pub mod routing;
pub mod savings;
pub mod state;
pub mod stores;
pub mod summary;
pub mod transaction;

pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty name was used to register a user.
    #[error("Please provide a name")]
    EmptyName,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register a user already belongs to another user.
    #[error("Email already registered")]
    DuplicateEmail,

    /// An empty string was used to create a savings goal name.
    #[error("Name and goal amount are required")]
    EmptyGoalName,

    /// The savings goal name exceeds the maximum length.
    #[error("Name cannot exceed 100 characters")]
    GoalNameTooLong,

    /// A negative amount was used where only zero or positive amounts make
    /// sense (transaction amounts, goal targets).
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// A zero or negative amount was used to move money into or out of a
    /// savings goal. Rejected up front rather than treated as a no-op.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// The transaction comment exceeds the maximum length.
    #[error("Comment cannot exceed 500 characters")]
    CommentTooLong,

    /// A month or year that does not name a real calendar month.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Adding this amount to a savings goal would exceed the user's
    /// available balance.
    ///
    /// Carries the available balance that was computed at the time of the
    /// check so the client can display it.
    #[error("Insufficient balance. Available: {available:.2} €")]
    InsufficientBalance {
        /// The user's available balance at the time of the failed add.
        available: Decimal,
    },

    /// Removing this amount from a savings goal would take the goal below
    /// zero.
    #[error("Cannot withdraw more than current savings amount")]
    InvalidWithdrawal,

    /// The requested resource was not found.
    ///
    /// This is also returned when the resource exists but belongs to another
    /// user, so that clients cannot probe for other users' data.
    #[error("The requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::HashingError(_) | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let message = match &self {
            // These errors are not intended to be shown to the client.
            Error::HashingError(_) | Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                "Server error".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
