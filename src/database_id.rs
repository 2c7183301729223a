//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a row in the user table.
pub type UserId = DatabaseId;
/// The ID of a row in the transaction table.
pub type TransactionId = DatabaseId;
/// The ID of a row in the reminder table.
pub type ReminderId = DatabaseId;
/// The ID of a row in the notification table.
pub type NotificationId = DatabaseId;
