/*! Schema setup for the application's SQLite database. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, notification::create_notification_table, reminder::create_reminder_table,
    transaction::create_transaction_table, user::create_user_table,
};

/// Create the application tables in `connection`'s database.
///
/// Also turns on foreign key enforcement for the connection, which SQLite
/// leaves off by default.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_reminder_table(&transaction)?;
    create_notification_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
