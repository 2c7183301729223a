//! Bearer-token authentication: issuing tokens at log in and resolving them
//! to users on every protected request.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    database_id::UserId,
    user::{User, get_user_by_email, get_user_by_id},
};

/// How long a bearer token remains valid after it is issued.
const TOKEN_DURATION: Duration = Duration::minutes(30);

/// The contents of a bearer token.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserId,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

/// The authenticated user, resolved from the request's bearer token.
///
/// Handlers that take this extractor reject requests whose token is missing,
/// malformed, or expired (401), whose user no longer exists (404), or whose
/// user has been deactivated (400).
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let state = AppState::from_ref(state);
        let token_data = decode_token(bearer.token(), state.decoding_key())?;

        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        let user = get_user_by_id(token_data.claims.sub, &connection)?;

        if !user.is_active {
            tracing::warn!("Inactive user {} tried to access the API", user.id);
            return Err(Error::InactiveUser);
        }

        Ok(CurrentUser(user))
    }
}

/// The request body for [log_in].
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

/// The response body for a successful log in.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token to present on protected endpoints.
    pub access_token: String,
    /// The scheme clients should use with the token.
    pub token_type: String,
}

/// Handler for sign-in requests.
///
/// # Errors
///
/// This function will return an error if:
/// - the email does not belong to a registered user,
/// - the password is not correct,
/// - or an internal error occurred when verifying the password.
pub async fn log_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            // Do not reveal whether the email is registered.
            Error::NotFound => Error::WrongCredentials,
            error => error,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {}", error);
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        tracing::warn!("Login attempt failed for user: {}", credentials.email);
        return Err(Error::WrongCredentials);
    }

    let token = encode_token(user.id, state.encoding_key())?;
    tracing::info!("User {} logged in successfully", user.id);

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_owned(),
    }))
}

pub(crate) fn encode_token(user_id: UserId, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| Error::TokenCreation)
}

fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod auth_tests {
    use axum::{Json, Router, http::StatusCode, routing::{get, post}};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::{self, CurrentUser, TokenResponse},
        endpoints,
        test_utils::{TEST_PASSWORD, create_test_user, test_app_state},
    };

    #[test]
    fn token_round_trips_user_id() {
        let state = test_app_state();
        let user_id = 42;

        let token = auth::encode_token(user_id, state.encoding_key()).unwrap();
        let token_data = auth::decode_token(&token, state.decoding_key()).unwrap();

        assert_eq!(token_data.claims.sub, user_id);
    }

    #[test]
    fn decode_fails_with_wrong_secret() {
        let state = test_app_state();
        let other_state = test_app_state_with_secret("a different secret");

        let token = auth::encode_token(42, state.encoding_key()).unwrap();

        assert!(auth::decode_token(&token, other_state.decoding_key()).is_err());
    }

    fn test_app_state_with_secret(secret: &str) -> crate::AppState {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        crate::AppState::new(connection, secret).unwrap()
    }

    async fn handler_with_auth(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
        Json(json!({ "user_id": user.id }))
    }

    fn test_router(state: crate::AppState) -> Router {
        Router::new()
            .route(endpoints::LOG_IN, post(auth::log_in))
            .route("/protected", get(handler_with_auth))
            .with_state(state)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = test_app_state();
        let user = create_test_user(&state, "foo@bar.baz", "0211234567");
        let server = TestServer::new(test_router(state));

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": user.email.to_string(),
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        let token_response = response.json::<TokenResponse>();
        assert_eq!(token_response.token_type, "bearer");
        assert!(!token_response.access_token.is_empty());
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let state = test_app_state();
        let server = TestServer::new(test_router(state));

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "nobody@nowhere.com",
                "password": "doesnotmatter",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let state = test_app_state();
        let user = create_test_user(&state, "foo@bar.baz", "0211234567");
        let server = TestServer::new(test_router(state));

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": user.email.to_string(),
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_accepts_issued_token() {
        let state = test_app_state();
        let user = create_test_user(&state, "foo@bar.baz", "0211234567");
        let server = TestServer::new(test_router(state.clone()));

        let token = auth::encode_token(user.id, state.encoding_key()).unwrap();

        let response = server.get("/protected").authorization_bearer(token).await;

        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["user_id"], user.id);
    }

    #[tokio::test]
    async fn protected_route_rejects_missing_header() {
        let state = test_app_state();
        let server = TestServer::new(test_router(state));

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_rejects_garbage_token() {
        let state = test_app_state();
        let server = TestServer::new(test_router(state));

        server
            .get("/protected")
            .authorization_bearer("not-a-real-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_rejects_inactive_user() {
        let state = test_app_state();
        let user = create_test_user(&state, "foo@bar.baz", "0211234567");
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute("UPDATE user SET is_active = 0 WHERE id = ?1", [user.id])
                .unwrap();
        }
        let server = TestServer::new(test_router(state.clone()));

        let token = auth::encode_token(user.id, state.encoding_key()).unwrap();

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn protected_route_rejects_token_for_deleted_user() {
        let state = test_app_state();
        let user = create_test_user(&state, "foo@bar.baz", "0211234567");
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute("DELETE FROM user WHERE id = ?1", [user.id])
                .unwrap();
        }
        let server = TestServer::new(test_router(state.clone()));

        let token = auth::encode_token(user.id, state.encoding_key()).unwrap();

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
