#![allow(missing_docs)]
//! Helpers shared by the endpoint and database tests.

use std::str::FromStr;

use axum_test::{TestRequest, TestServer};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, auth::encode_token, build_router, password::PasswordHash, user::Phone, user::User,
    user::create_user,
};

/// The raw password every test user is created with.
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The minimum bcrypt cost keeps the hashing rounds cheap for tests.
const TEST_HASH_COST: u32 = 4;

/// Create an [AppState] backed by an in-memory database.
pub(crate) fn test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    AppState::new(connection, "notsosecretsecret").expect("Could not initialize database.")
}

/// Insert a user through the application state and return it.
pub(crate) fn create_test_user(state: &AppState, email: &str, phone: &str) -> User {
    let connection = state.db_connection.lock().unwrap();

    create_user(
        "Test User",
        EmailAddress::from_str(email).unwrap(),
        Phone::new_unchecked(phone),
        PasswordHash::from_raw_password(TEST_PASSWORD, TEST_HASH_COST).unwrap(),
        &connection,
    )
    .expect("Could not create test user")
}

/// Insert a user directly on a bare connection and return its row ID.
///
/// For database-level tests that do not hold an [AppState].
pub(crate) fn insert_user_row(connection: &Connection, email: &str, phone: &str) -> i64 {
    create_user(
        "Test User",
        EmailAddress::from_str(email).unwrap(),
        Phone::new_unchecked(phone),
        PasswordHash::new_unchecked("hunter2hash"),
        connection,
    )
    .expect("Could not create test user")
    .id
}

/// A running test server with one authenticated user.
pub(crate) struct TestContext {
    pub state: AppState,
    pub server: TestServer,
    pub user: User,
    pub token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let state = test_app_state();
        let server =
            TestServer::new(build_router(state.clone()));
        let user = create_test_user(&state, "test@example.com", "0210001111");
        let token = encode_token(user.id, state.encoding_key()).unwrap();

        Self {
            state,
            server,
            user,
            token,
        }
    }

    /// Register another user and return it along with a bearer token.
    pub fn create_second_user(&self, email: &str, phone: &str) -> (User, String) {
        let user = create_test_user(&self.state, email, phone);
        let token = encode_token(user.id, self.state.encoding_key()).unwrap();

        (user, token)
    }

    pub fn get_authed(&self, path: &str) -> TestRequest {
        self.server.get(path).authorization_bearer(&self.token)
    }

    pub fn post_authed<T: Serialize>(&self, path: &str, body: &T) -> TestRequest {
        self.server
            .post(path)
            .json(body)
            .authorization_bearer(&self.token)
    }

    pub fn put_authed<T: Serialize>(&self, path: &str, body: &T) -> TestRequest {
        self.server
            .put(path)
            .json(body)
            .authorization_bearer(&self.token)
    }

    pub fn delete_authed(&self, path: &str) -> TestRequest {
        self.server.delete(path).authorization_bearer(&self.token)
    }
}
