//! The route handler for creating a notification.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::ReminderId,
    notification::{NewNotification, Notification, create_notification},
    reminder::get_reminder,
};

/// The request body for [create_notification_endpoint].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// A short label for the notification.
    pub name: String,
    /// The ID of the reminder the notification is surfaced from. Must refer
    /// to a reminder owned by the caller.
    pub reminder_id: ReminderId,
    /// When the notification should surface. Defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
}

/// A route handler for creating a notification for the authenticated user.
///
/// The referenced reminder must exist and belong to the caller, so every
/// notification references a live reminder at creation.
pub async fn create_notification_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(new_notification): Json<CreateNotification>,
) -> Result<(StatusCode, Json<Notification>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_reminder(new_notification.reminder_id, user.id, &connection)?;

    let notification = create_notification(
        NewNotification {
            reminder_id: new_notification.reminder_id,
            user_id: user.id,
            name: new_notification.name,
            date: new_notification
                .date
                .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(notification)))
}
