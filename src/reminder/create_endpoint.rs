//! The route handler for creating a reminder.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    reminder::{NewReminder, Reminder, create_reminder},
};

fn default_active() -> bool {
    true
}

/// The request body for [create_reminder_endpoint].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminder {
    /// A short label for the reminder.
    pub name: String,
    /// Whether the reminder is in use. Defaults to true.
    #[serde(default = "default_active")]
    pub active: bool,
    /// When the payment is next expected.
    pub next_date: Date,
    /// The category the expected payment belongs to.
    pub category: String,
    /// The expected signed amount.
    pub amount: i64,
    /// The number of days between occurrences.
    pub frequency: i64,
    /// An optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for creating a reminder for the authenticated user.
pub async fn create_reminder_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(new_reminder): Json<CreateReminder>,
) -> Result<(StatusCode, Json<Reminder>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let reminder = create_reminder(
        NewReminder {
            user_id: user.id,
            name: new_reminder.name,
            active: new_reminder.active,
            next_date: new_reminder.next_date,
            category: new_reminder.category,
            amount: new_reminder.amount,
            frequency: new_reminder.frequency,
            description: new_reminder.description,
        },
        &connection,
    )?;

    tracing::info!("User {} created reminder {}", user.id, reminder.id);

    Ok((StatusCode::CREATED, Json(reminder)))
}
