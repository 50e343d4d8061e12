//! JSON Web Token issuing and verification, and the sign-in route handler.
//!
//! Protected route handlers take a [Claims] argument; extraction reads the
//! bearer token from the `Authorization` header and rejects the request if
//! the token is missing, invalid, or expired.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID, models::UserProfile, state::AppState, stores::UserStore};

// Code in this module is adapted from https://github.com/ezesundayeze/axum--auth and https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// How long a token stays valid after it is issued.
const TOKEN_DURATION: Duration = Duration::days(7);

/// The contents of a JSON Web Token.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserID,
    /// The time the token was issued.
    pub iat: usize,
    /// The expiry time of the token.
    pub exp: usize,
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let app_state = AppState::from_ref(state);

        let token_data = decode_jwt(bearer.token(), app_state.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The email and password a user signs in with.
#[derive(Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: email_address::EmailAddress,
    /// Password entered during sign-in.
    pub password: String,
}

/// The errors that may occur while authenticating a request.
#[derive(Debug)]
pub enum AuthError {
    /// The email/password combination did not match a registered user.
    WrongCredentials,
    /// The request had no bearer token in the `Authorization` header.
    MissingToken,
    /// The bearer token could not be decoded or has a bad signature.
    InvalidToken,
    /// The bearer token was valid once but has expired.
    TokenExpired,
    /// Something unexpected went wrong while checking credentials.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "No token provided. Please login.",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token. Please login."),
            AuthError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Token expired. Please login again.",
            ),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Handler for sign-in requests.
///
/// # Errors
///
/// This function will return an error in a few situtations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AuthError> {
    let user = state
        .user_store
        .get_by_email(&credentials.email)
        .map_err(|e| match e {
            Error::NotFound => AuthError::WrongCredentials,
            e => {
                tracing::error!("Error matching user: {e:?}");
                AuthError::InternalError
            }
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|e| {
            tracing::error!("Error verifying password: {}", e);
            AuthError::InternalError
        })?;

    if !password_is_correct {
        return Err(AuthError::WrongCredentials);
    }

    let token = encode_jwt(user.id(), state.encoding_key());

    Ok(Json(json!({
        "message": "Logged in successfully",
        "user": UserProfile::from(&user),
        "token": token,
    }))
    .into_response())
}

/// Create a signed token for `user_id` that expires in [TOKEN_DURATION].
///
/// # Panics
///
/// Panics if the claims cannot be serialized, which cannot happen for this
/// claims type.
pub fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> String {
    let now = OffsetDateTime::now_utc();
    let exp = (now + TOKEN_DURATION).unix_timestamp() as usize;
    let iat = now.unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        iat,
        exp,
    };

    encode(&Header::default(), &claims, encoding_key).unwrap()
}

fn decode_jwt(jwt_token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(jwt_token, decoding_key, &Validation::default()).map_err(|error| {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    })
}
