//! Application router configuration.
//!
//! Route protection happens in the handlers themselves: every handler that
//! needs a signed-in user takes a [Claims](crate::auth::Claims) argument,
//! whose extraction rejects requests without a valid bearer token.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{
    AppState, auth, endpoints, register_user::register_user, savings, summary, transaction,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(auth::sign_in))
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::get_transactions).post(transaction::create_transaction),
        )
        .route(
            endpoints::TRANSACTION,
            put(transaction::update_transaction).delete(transaction::delete_transaction),
        )
        .route(
            endpoints::SAVINGS,
            get(savings::get_savings_goals).post(savings::create_savings_goal),
        )
        .route(endpoints::SAVINGS_ADD, put(savings::add_to_savings_goal))
        .route(
            endpoints::SAVINGS_REMOVE,
            put(savings::remove_from_savings_goal),
        )
        .route(endpoints::SAVINGS_GOAL, delete(savings::delete_savings_goal))
        .route(endpoints::SUMMARY, get(summary::get_monthly_summary))
        .route(endpoints::YEARLY_SUMMARY, get(summary::get_yearly_summary))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({ "message": "I'm a teapot" })),
    )
        .into_response()
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "The requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn create_app() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "42",
        )
        .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = create_app();

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_responds_with_404() {
        let server = create_app();

        server
            .get("/api/does/not/exist")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_requests() {
        let server = create_app();

        for route in [
            endpoints::TRANSACTIONS,
            endpoints::SAVINGS,
            endpoints::SUMMARY,
        ] {
            server
                .get(route)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }
}
