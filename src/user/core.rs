//! Defines the core data model and database queries for users.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::UserId, password::PasswordHash};

/// A phone number: 10 to 15 digits with an optional leading plus sign.
///
/// Parsing is the only way to construct a `Phone` from client input, so any
/// value of this type holds a well-formed number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Create and validate a phone number from a string.
    ///
    /// # Errors
    /// Returns [Error::InvalidPhone] if `value` is not a well-formed phone
    /// number.
    pub fn new(value: &str) -> Result<Self, Error> {
        let digits = value.strip_prefix('+').unwrap_or(value);

        let is_valid =
            (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());

        if is_valid {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::InvalidPhone(value.to_string()))
        }
    }

    /// Create a new `Phone` without any validation.
    ///
    /// The caller should ensure that `value` is a well-formed phone number.
    pub fn new_unchecked(value: &str) -> Self {
        Self(value.to_string())
    }

    /// The phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Phone::new(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the database.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The email address associated with the user. Unique across users.
    pub email: EmailAddress,
    /// The phone number associated with the user. Unique across users.
    pub phone: Phone,
    /// The user's salted and hashed password.
    pub password_hash: PasswordHash,
    /// Whether the user may access the API. Deactivated users keep their data
    /// but every authenticated request is rejected.
    pub is_active: bool,
}

/// The fields of a [User] that are safe to return to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the database.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The email address associated with the user.
    pub email: EmailAddress,
    /// The phone number associated with the user.
    pub phone: Phone,
    /// Whether the user may access the API.
    pub is_active: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            is_active: user.is_active,
        }
    }
}

/// Create a user in the database.
///
/// New users are active until deactivated directly in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateEmail] if `email` is already in use,
/// - [Error::DuplicatePhone] if `phone` is already in use,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(
    name: &str,
    email: EmailAddress,
    phone: Phone,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, phone, password, is_active) VALUES (?1, ?2, ?3, ?4, 1)",
        (
            name,
            email.to_string(),
            phone.as_str(),
            password_hash.to_string(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(User {
        id,
        name: name.to_string(),
        email,
        phone,
        password_hash,
        is_active: true,
    })
}

/// Retrieve the user with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(id: UserId, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare("SELECT id, name, email, phone, password, is_active FROM user WHERE id = :id")?
        .query_row(&[(":id", &id)], map_user_row)?;

    Ok(user)
}

/// Retrieve the user with `email` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `email` does not belong to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare(
            "SELECT id, name, email, phone, password, is_active FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", &email)], map_user_row)?;

    Ok(user)
}

/// Write `user`'s current field values back to the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `user`'s ID does not refer to a valid user,
/// - [Error::DuplicateEmail] or [Error::DuplicatePhone] if the new contact
///   details collide with another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_user(user: &User, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, email = ?2, phone = ?3, password = ?4, is_active = ?5
         WHERE id = ?6",
        (
            &user.name,
            user.email.to_string(),
            user.phone.as_str(),
            user.password_hash.to_string(),
            user.is_active,
            user.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the user table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('user', 0)",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let raw_email: String = row.get(2)?;
    let raw_phone: String = row.get(3)?;
    let raw_password_hash: String = row.get(4)?;
    let is_active = row.get(5)?;

    Ok(User {
        id,
        name,
        email: EmailAddress::new_unchecked(raw_email),
        phone: Phone::new_unchecked(&raw_phone),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        is_active,
    })
}
