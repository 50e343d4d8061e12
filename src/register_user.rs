//! The route handler for registering a new user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::encode_jwt,
    models::{PasswordHash, UserProfile},
    state::AppState,
    stores::UserStore,
};

/// The request body for registering a new user.
#[derive(Deserialize)]
pub struct NewUser {
    /// The display name of the new user.
    pub name: String,
    /// The email address of the new user. Must not already be registered.
    pub email: EmailAddress,
    /// The plain text password of the new user. Checked for strength before
    /// hashing; it is never stored.
    pub password: String,
}

/// A route handler for registering a new user.
///
/// Responds with 201 and a signed token on success, so a freshly registered
/// user is also signed in.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The name is empty.
/// - The password is too weak.
/// - The email is already registered.
pub async fn register_user(
    State(mut state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<Response, Error> {
    let name = new_user.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let password_hash =
        PasswordHash::from_raw_password(&new_user.password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store.create(name, new_user.email, password_hash)?;

    let token = encode_jwt(user.id(), state.encoding_key());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserProfile::from(&user),
            "token": token,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod register_user_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{build_router, endpoints, state::AppState};

    fn create_app() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "42",
        )
        .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn register_responds_with_201_and_a_token() {
        let server = create_app();

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Asta",
                "email": "asta@example.com",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["user"]["name"], "Asta");
        assert_eq!(body["user"]["email"], "asta@example.com");
        assert!(body["token"].is_string());
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn register_rejects_empty_name() {
        let server = create_app();

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "   ",
                "email": "asta@example.com",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let server = create_app();

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Asta",
                "email": "asta@example.com",
                "password": "password123",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let server = create_app();

        let payload = json!({
            "name": "Asta",
            "email": "asta@example.com",
            "password": "averysafeandsecurepassword",
        });

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&payload)
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&payload)
            .await
            .assert_status(StatusCode::CONFLICT);
    }
}
