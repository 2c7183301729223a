//! The route handler for registering a new user.

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    password::PasswordHash,
    user::{Phone, UserProfile, create_user},
};

/// The request body for [create_user_endpoint].
///
/// The email and phone fields are validated during deserialization, so a
/// malformed value is rejected before the handler runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// The user's display name.
    pub name: String,
    /// The email address to register. Must not be in use.
    pub email: EmailAddress,
    /// The phone number to register. Must not be in use.
    pub phone: Phone,
    /// The password to sign in with.
    pub password: String,
}

/// A route handler for creating a new user account.
pub async fn create_user_endpoint(
    State(state): State<AppState>,
    Json(new_user): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserProfile>), Error> {
    let password_hash =
        PasswordHash::from_raw_password(&new_user.password, PasswordHash::DEFAULT_COST)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(
        &new_user.name,
        new_user.email,
        new_user.phone,
        password_hash,
        &connection,
    )
    .inspect_err(|error| match error {
        Error::DuplicateEmail => {
            tracing::warn!("Attempt to create user with existing email")
        }
        Error::DuplicatePhone => {
            tracing::warn!("Attempt to create user with existing phone")
        }
        _ => {}
    })?;

    tracing::info!("New user created: {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}
