//! The route handler for deleting a reminder.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::ReminderId,
    reminder::{Reminder, delete_reminder},
};

/// A route handler for deleting a reminder owned by the authenticated user.
///
/// Responds with the deleted reminder.
pub async fn delete_reminder_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(reminder_id): Path<ReminderId>,
) -> Result<Json<Reminder>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let reminder = delete_reminder(reminder_id, user.id, &connection)?;

    tracing::info!("User {} deleted reminder {}", user.id, reminder_id);

    Ok(Json(reminder))
}
