//! Route handlers for listing and reading reminders.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::ReminderId,
    reminder::{Reminder, get_reminder, get_reminders},
};

/// Query parameters for paging through [list_reminders_endpoint].
#[derive(Debug, Deserialize)]
pub struct ListRemindersParams {
    /// How many reminders to skip from the start of the result.
    #[serde(default)]
    pub skip: u32,
    /// The maximum number of reminders to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

/// A route handler for listing the authenticated user's reminders.
pub async fn list_reminders_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListRemindersParams>,
) -> Result<Json<Vec<Reminder>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let reminders = get_reminders(user.id, params.skip, params.limit, &connection)?;

    Ok(Json(reminders))
}

/// A route handler for reading a single reminder owned by the authenticated
/// user.
pub async fn get_reminder_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(reminder_id): Path<ReminderId>,
) -> Result<Json<Reminder>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let reminder = get_reminder(reminder_id, user.id, &connection)?;

    Ok(Json(reminder))
}
