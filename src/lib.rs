//! Centime is a backend service for tracking personal finances.
//!
//! This library provides an authenticated JSON REST API for recording income
//! and outcome transactions, scheduling recurring payment reminders, and
//! resolving the notifications those reminders produce.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
mod dummy_data;
mod endpoints;
mod logging;
mod notification;
mod password;
mod reminder;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
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
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("incorrect email or password")]
    WrongCredentials,

    /// The bearer token is missing, malformed, or expired.
    #[error("could not validate credentials")]
    InvalidToken,

    /// The bearer token resolved to a user that has been deactivated.
    #[error("inactive user")]
    InactiveUser,

    /// The email used to create or update a user is already in use.
    #[error("email already registered")]
    DuplicateEmail,

    /// The phone number used to create or update a user is already in use.
    #[error("phone number already registered")]
    DuplicatePhone,

    /// The string used to create a phone number is not a valid phone number.
    ///
    /// Phone numbers must consist of 10 to 15 digits with an optional leading
    /// plus sign.
    #[error("invalid phone number format \"{0}\"")]
    InvalidPhone(String),

    /// The password used to create or update a user is too short.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// A reminder was created or updated with a frequency of zero or fewer
    /// days between occurrences.
    #[error("frequency must be at least one day")]
    InvalidFrequency,

    /// A notification was resolved whose owning reminder no longer exists.
    ///
    /// Orphaned notifications cannot be resolved since the reminder carries
    /// the amount and schedule the resolution needs.
    #[error("no reminder associated with this notification")]
    ReminderMissing,

    /// The requested resource was not found.
    ///
    /// This error is also returned when the resource exists but belongs to
    /// another user, so that the response does not leak its existence.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A bearer token could not be created at log in.
    #[error("could not create bearer token")]
    TokenCreation,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user.phone") =>
            {
                Error::DuplicatePhone
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
        let status = match self {
            Error::WrongCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::InactiveUser
            | Error::DuplicateEmail
            | Error::DuplicatePhone
            | Error::ReminderMissing => StatusCode::BAD_REQUEST,
            Error::InvalidPhone(_) | Error::PasswordTooShort(_) | Error::InvalidFrequency => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::TokenCreation
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Errors that are not meant for the client are replaced with a
        // generic message and logged server-side only.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
