//! Defines the core data model and database queries for reminders.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    database_id::{ReminderId, UserId},
};

/// A template for a recurring expected payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// The ID of the reminder.
    pub id: ReminderId,
    /// The ID of the user the reminder belongs to. Not included in responses.
    #[serde(skip)]
    pub user_id: UserId,
    /// A short label for the reminder, e.g. "Rent payment".
    pub name: String,
    /// Whether the reminder is still in use.
    pub active: bool,
    /// When the payment is next expected.
    pub next_date: Date,
    /// The category the expected payment belongs to.
    pub category: String,
    /// The expected signed amount. Payments are negative by convention.
    pub amount: i64,
    /// The number of days between occurrences.
    pub frequency: i64,
    /// An optional free-text description.
    pub description: Option<String>,
    /// When the reminder was created.
    pub created_at: OffsetDateTime,
    /// When the reminder was last modified, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The data needed to create a new [Reminder].
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    /// The ID of the user the reminder belongs to.
    pub user_id: UserId,
    /// A short label for the reminder.
    pub name: String,
    /// Whether the reminder is in use.
    pub active: bool,
    /// When the payment is next expected.
    pub next_date: Date,
    /// The category the expected payment belongs to.
    pub category: String,
    /// The expected signed amount.
    pub amount: i64,
    /// The number of days between occurrences. Must be at least one.
    pub frequency: i64,
    /// An optional free-text description.
    pub description: Option<String>,
}

/// Create a reminder in the database.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidFrequency] if the frequency is less than one day,
/// - or [Error::SqlError] if there is an SQL error.
pub fn create_reminder(
    new_reminder: NewReminder,
    connection: &Connection,
) -> Result<Reminder, Error> {
    if new_reminder.frequency < 1 {
        return Err(Error::InvalidFrequency);
    }

    let reminder = connection
        .prepare(
            "INSERT INTO reminder
                 (user_id, name, active, next_date, category, amount, frequency, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, user_id, name, active, next_date, category, amount, frequency,
                 description, created_at, updated_at",
        )?
        .query_row(
            (
                new_reminder.user_id,
                new_reminder.name,
                new_reminder.active,
                new_reminder.next_date,
                new_reminder.category,
                new_reminder.amount,
                new_reminder.frequency,
                new_reminder.description,
                OffsetDateTime::now_utc(),
            ),
            map_reminder_row,
        )?;

    Ok(reminder)
}

/// Retrieve the reminder with `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a reminder owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_reminder(
    id: ReminderId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Reminder, Error> {
    let reminder = connection
        .prepare(
            "SELECT id, user_id, name, active, next_date, category, amount, frequency,
                 description, created_at, updated_at
             FROM reminder WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(&[(":id", &id), (":user_id", &user_id)], map_reminder_row)?;

    Ok(reminder)
}

/// Retrieve a page of `user_id`'s reminders.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_reminders(
    user_id: UserId,
    skip: u32,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Reminder>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, active, next_date, category, amount, frequency,
                 description, created_at, updated_at
             FROM reminder WHERE user_id = ?1 LIMIT ?2 OFFSET ?3",
        )?
        .query_map((user_id, limit, skip), map_reminder_row)?
        .map(|maybe_reminder| maybe_reminder.map_err(Error::SqlError))
        .collect()
}

/// Write `reminder`'s current field values back to the database and stamp its
/// modification time.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidFrequency] if the frequency is less than one day,
/// - [Error::NotFound] if `reminder`'s ID does not refer to a reminder owned
///   by its user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_reminder(reminder: &Reminder, connection: &Connection) -> Result<Reminder, Error> {
    if reminder.frequency < 1 {
        return Err(Error::InvalidFrequency);
    }

    let updated_at = OffsetDateTime::now_utc();

    let rows_affected = connection.execute(
        "UPDATE reminder
         SET name = ?1, active = ?2, next_date = ?3, amount = ?4, frequency = ?5,
             description = ?6, updated_at = ?7
         WHERE id = ?8 AND user_id = ?9",
        (
            &reminder.name,
            reminder.active,
            reminder.next_date,
            reminder.amount,
            reminder.frequency,
            &reminder.description,
            updated_at,
            reminder.id,
            reminder.user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Reminder {
        updated_at: Some(updated_at),
        ..reminder.clone()
    })
}

/// Delete the reminder with `id` belonging to `user_id` and return it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a reminder owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_reminder(
    id: ReminderId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Reminder, Error> {
    let reminder = get_reminder(id, user_id, connection)?;

    connection.execute("DELETE FROM reminder WHERE id = ?1", [id])?;

    Ok(reminder)
}

/// Move `reminder`'s next occurrence forward by its frequency in days.
///
/// This is the only code path that changes `next_date`, so the schedule can
/// never move backwards.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn advance_next_date(reminder: &Reminder, connection: &Connection) -> Result<Date, Error> {
    let next_date = reminder
        .next_date
        .saturating_add(Duration::days(reminder.frequency));

    connection.execute(
        "UPDATE reminder SET next_date = ?1, updated_at = ?2 WHERE id = ?3",
        (next_date, OffsetDateTime::now_utc(), reminder.id),
    )?;

    Ok(next_date)
}

/// Create the reminder table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_reminder_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS reminder (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                next_date TEXT NOT NULL,
                category TEXT NOT NULL,
                amount INTEGER NOT NULL,
                frequency INTEGER NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('reminder', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_reminder_user_id ON reminder(user_id)",
        (),
    )?;

    Ok(())
}

fn map_reminder_row(row: &Row) -> Result<Reminder, rusqlite::Error> {
    Ok(Reminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        active: row.get(3)?,
        next_date: row.get(4)?,
        category: row.get(5)?,
        amount: row.get(6)?,
        frequency: row.get(7)?,
        description: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
