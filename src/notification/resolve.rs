//! The notification resolution workflow.
//!
//! Applies a user-submitted decision to a pending notification and keeps the
//! owning reminder's schedule consistent:
//!
//! - **accepted**: record a transaction for the reminder's amount, advance
//!   the reminder's next date by its frequency, delete the notification.
//! - **refused**: advance the reminder's next date, delete the notification.
//! - **extended**: push the notification's date out by one day and keep it.
//! - **pending**: stamp the notification's modification time and keep it.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::{NotificationId, UserId},
    notification::{
        Notification, NotificationStatus, delete_notification, extend_notification,
        get_notification, touch_notification,
    },
    reminder::{advance_next_date, get_reminder},
    transaction::{NewTransaction, TransactionType, create_transaction},
};

/// The category assigned to transactions recorded by accepting a notification.
const REMINDER_PAYMENT_CATEGORY: &str = "Reminder Payment";

/// The request body for [resolve_notification_endpoint].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveNotification {
    /// The decision to apply to the notification.
    pub status: NotificationStatus,
}

/// Apply `status` to the notification with `notification_id`.
///
/// The whole read-modify-write runs inside one SQL transaction so two
/// concurrent resolutions cannot interleave on the reminder's next date.
///
/// Returns the notification as it was immediately before deletion for
/// accept/refuse, or the mutated row for extend/pending.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `notification_id` does not refer to a notification
///   owned by `user_id`,
/// - [Error::ReminderMissing] if the owning reminder no longer exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn resolve_notification(
    notification_id: NotificationId,
    status: NotificationStatus,
    user_id: UserId,
    connection: &rusqlite::Connection,
) -> Result<Notification, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let notification = get_notification(notification_id, user_id, &sql_transaction)?;
    let reminder = get_reminder(notification.reminder_id, user_id, &sql_transaction).map_err(
        |error| match error {
            Error::NotFound => Error::ReminderMissing,
            error => error,
        },
    )?;

    let resolved = match status {
        NotificationStatus::Accepted => {
            // The reminder's amount is recorded as-is: it is already signed.
            create_transaction(
                NewTransaction {
                    user_id,
                    name: format!("Payment for {}", notification.name),
                    amount: reminder.amount,
                    kind: TransactionType::Outcome,
                    category: REMINDER_PAYMENT_CATEGORY.to_owned(),
                    date: OffsetDateTime::now_utc().date(),
                },
                &sql_transaction,
            )?;
            advance_next_date(&reminder, &sql_transaction)?;
            delete_notification(notification.id, &sql_transaction)?;

            notification
        }
        NotificationStatus::Refused => {
            advance_next_date(&reminder, &sql_transaction)?;
            delete_notification(notification.id, &sql_transaction)?;

            notification
        }
        NotificationStatus::Extended => extend_notification(&notification, &sql_transaction)?,
        NotificationStatus::Pending => touch_notification(&notification, &sql_transaction)?,
    };

    sql_transaction.commit()?;

    Ok(resolved)
}

/// A route handler for resolving a notification owned by the authenticated
/// user.
pub async fn resolve_notification_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<NotificationId>,
    Json(update): Json<ResolveNotification>,
) -> Result<Json<Notification>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let notification = resolve_notification(notification_id, update.status, user.id, &connection)?;

    Ok(Json(notification))
}
