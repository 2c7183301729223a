//! Defines the core data model and database queries for notifications.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    database_id::{NotificationId, ReminderId, UserId},
};

/// The decision states a notification can be put into.
///
/// Stored notifications are always [NotificationStatus::Pending]; the other
/// variants only appear in resolution requests. Accepting or refusing deletes
/// the row, so neither is ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Awaiting a decision.
    Pending,
    /// Pay the reminder: record a transaction and advance the schedule.
    Accepted,
    /// Skip this occurrence: advance the schedule without paying.
    Refused,
    /// Put the decision off until tomorrow.
    Extended,
}

/// A surfaced, pending instance of a reminder awaiting a user decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// The ID of the notification.
    pub id: NotificationId,
    /// The ID of the reminder the notification was surfaced from.
    pub reminder_id: ReminderId,
    /// The ID of the user the notification belongs to. Not included in
    /// responses.
    #[serde(skip)]
    pub user_id: UserId,
    /// A short label for the notification, e.g. "Reminder: Rent payment".
    pub name: String,
    /// When the notification should surface.
    pub date: Date,
    /// The notification's decision state. Always pending for stored rows.
    pub status: NotificationStatus,
    /// When the notification was created.
    pub created_at: OffsetDateTime,
    /// When the notification was last modified, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The data needed to create a new [Notification].
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// The ID of the reminder the notification is surfaced from.
    pub reminder_id: ReminderId,
    /// The ID of the user the notification belongs to.
    pub user_id: UserId,
    /// A short label for the notification.
    pub name: String,
    /// When the notification should surface.
    pub date: Date,
}

/// Create a notification in the database.
///
/// Callers must ensure `reminder_id` refers to a reminder owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_notification(
    new_notification: NewNotification,
    connection: &Connection,
) -> Result<Notification, Error> {
    let notification = connection
        .prepare(
            "INSERT INTO notification (reminder_id, user_id, name, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, reminder_id, user_id, name, date, created_at, updated_at",
        )?
        .query_row(
            (
                new_notification.reminder_id,
                new_notification.user_id,
                new_notification.name,
                new_notification.date,
                OffsetDateTime::now_utc(),
            ),
            map_notification_row,
        )?;

    Ok(notification)
}

/// Retrieve the notification with `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a notification owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_notification(
    id: NotificationId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Notification, Error> {
    let notification = connection
        .prepare(
            "SELECT id, reminder_id, user_id, name, date, created_at, updated_at
             FROM notification WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id)],
            map_notification_row,
        )?;

    Ok(notification)
}

/// Retrieve all of `user_id`'s notifications, most recently created first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_notifications(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Notification>, Error> {
    connection
        .prepare(
            "SELECT id, reminder_id, user_id, name, date, created_at, updated_at
             FROM notification WHERE user_id = ?1 ORDER BY created_at DESC",
        )?
        .query_map([user_id], map_notification_row)?
        .map(|maybe_notification| maybe_notification.map_err(Error::SqlError))
        .collect()
}

/// Delete the notification with `id`.
///
/// Callers must have already checked ownership.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a notification,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_notification(id: NotificationId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM notification WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Push `notification`'s date out by one day and stamp its modification time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn extend_notification(
    notification: &Notification,
    connection: &Connection,
) -> Result<Notification, Error> {
    let date = notification.date.saturating_add(Duration::days(1));
    let updated_at = OffsetDateTime::now_utc();

    connection.execute(
        "UPDATE notification SET date = ?1, updated_at = ?2 WHERE id = ?3",
        (date, updated_at, notification.id),
    )?;

    Ok(Notification {
        date,
        updated_at: Some(updated_at),
        ..notification.clone()
    })
}

/// Stamp `notification`'s modification time without changing anything else.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn touch_notification(
    notification: &Notification,
    connection: &Connection,
) -> Result<Notification, Error> {
    let updated_at = OffsetDateTime::now_utc();

    connection.execute(
        "UPDATE notification SET updated_at = ?1 WHERE id = ?2",
        (updated_at, notification.id),
    )?;

    Ok(Notification {
        updated_at: Some(updated_at),
        ..notification.clone()
    })
}

/// Create the notification table in the database.
///
/// `reminder_id` is deliberately not a foreign key: deleting a reminder may
/// leave orphaned notifications behind, and the resolution workflow reports
/// those to the client instead of failing the reminder delete.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_notification_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS notification (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reminder_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('notification', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_notification_user_id ON notification(user_id)",
        (),
    )?;

    Ok(())
}

fn map_notification_row(row: &Row) -> Result<Notification, rusqlite::Error> {
    Ok(Notification {
        id: row.get(0)?,
        reminder_id: row.get(1)?,
        user_id: row.get(2)?,
        name: row.get(3)?,
        date: row.get(4)?,
        status: NotificationStatus::Pending,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
