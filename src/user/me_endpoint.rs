//! Route handlers for the authenticated user's own account.

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::CurrentUser,
    password::PasswordHash,
    user::{Phone, UserProfile, update_user},
};

/// A route handler returning the authenticated user's own profile.
pub async fn get_user_me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// The request body for [update_user_me]. Every field is optional; absent
/// fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// A new display name.
    pub name: Option<String>,
    /// A new email address. Must not be in use by another user.
    pub email: Option<EmailAddress>,
    /// A new phone number. Must not be in use by another user.
    pub phone: Option<Phone>,
    /// A new password to sign in with.
    pub password: Option<String>,
}

/// A route handler for updating the authenticated user's own account.
pub async fn update_user_me(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(update): Json<UpdateUser>,
) -> Result<Json<UserProfile>, Error> {
    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(email) = update.email {
        user.email = email;
    }
    if let Some(phone) = update.phone {
        user.phone = phone;
    }
    if let Some(password) = update.password {
        user.password_hash = PasswordHash::from_raw_password(&password, PasswordHash::DEFAULT_COST)?;
    }

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_user(&user, &connection)?;

    tracing::info!("User {} updated their profile", user.id);

    Ok(Json(user.into()))
}
