//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{TransactionId, UserId},
};

/// Whether a transaction brought money in or paid money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned. Stored with a positive amount.
    Income,
    /// Money spent. Stored with a negative amount. Clients may also submit
    /// this variant as "expense".
    #[serde(alias = "expense")]
    Outcome,
}

impl TransactionType {
    /// The value stored in the database for this transaction type.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
///
/// Transactions are immutable once recorded. They can only be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user the transaction belongs to.
    pub user_id: UserId,
    /// A short label for the transaction, e.g. "Groceries expense".
    pub name: String,
    /// The amount of money earned or spent. Positive for income, negative for
    /// outcome.
    pub amount: i64,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The category the transaction belongs to, e.g. "Food".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
    /// When the transaction was last modified, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The data needed to record a new [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The ID of the user the transaction belongs to.
    pub user_id: UserId,
    /// A short label for the transaction.
    pub name: String,
    /// The amount of money earned or spent.
    pub amount: i64,
    /// Whether the transaction is an income or an outcome.
    pub kind: TransactionType,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

/// Force `amount`'s sign to match `kind`.
///
/// Outcomes are stored as negative amounts and incomes as positive amounts.
/// Applied once when a transaction is recorded, never on read.
pub fn normalize_amount(kind: TransactionType, amount: i64) -> i64 {
    match kind {
        TransactionType::Income => amount.abs(),
        TransactionType::Outcome => -amount.abs(),
    }
}

/// Record a new transaction in the database.
///
/// The amount is stored as given. Callers recording client input should pass
/// it through [normalize_amount] first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, name, amount, type, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, name, amount, type, category, date, created_at, updated_at",
        )?
        .query_row(
            (
                new_transaction.user_id,
                new_transaction.name,
                new_transaction.amount,
                new_transaction.kind,
                new_transaction.category,
                new_transaction.date,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, name, amount, type, category, date, created_at, updated_at
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id)],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a page of `user_id`'s transactions, most recent date first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    user_id: UserId,
    skip: u32,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, amount, type, category, date, created_at, updated_at
             FROM \"transaction\" WHERE user_id = ?1
             ORDER BY date DESC LIMIT ?2 OFFSET ?3",
        )?
        .query_map((user_id, limit, skip), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Retrieve all of `user_id`'s transactions.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, amount, type, category, date, created_at, updated_at
             FROM \"transaction\" WHERE user_id = ?1",
        )?
        .query_map([user_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Delete the transaction with `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Owner-scoped queries always filter on user_id.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id)",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod normalize_amount_tests {
    use super::{TransactionType, normalize_amount};

    #[test]
    fn positive_outcome_is_negated() {
        assert_eq!(normalize_amount(TransactionType::Outcome, 100), -100);
    }

    #[test]
    fn negative_outcome_is_unchanged() {
        assert_eq!(normalize_amount(TransactionType::Outcome, -100), -100);
    }

    #[test]
    fn negative_income_becomes_positive() {
        assert_eq!(normalize_amount(TransactionType::Income, -250), 250);
    }

    #[test]
    fn positive_income_is_unchanged() {
        assert_eq!(normalize_amount(TransactionType::Income, 250), 250);
    }

    #[test]
    fn zero_is_unchanged() {
        assert_eq!(normalize_amount(TransactionType::Outcome, 0), 0);
        assert_eq!(normalize_amount(TransactionType::Income, 0), 0);
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        test_utils::insert_user_row,
        transaction::{
            NewTransaction, TransactionType, create_transaction, delete_transaction,
            get_transaction, get_transactions,
        },
    };

    fn get_test_connection() -> (Connection, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user_id = insert_user_row(&connection, "foo@bar.baz", "0211234567");
        (connection, user_id)
    }

    fn new_transaction(user_id: i64, amount: i64) -> NewTransaction {
        NewTransaction {
            user_id,
            name: "Rust Pie".to_string(),
            amount,
            kind: if amount < 0 {
                TransactionType::Outcome
            } else {
                TransactionType::Income
            },
            category: "Food".to_string(),
            date: date!(2025 - 03 - 14),
        }
    }

    #[test]
    fn create_succeeds() {
        let (connection, user_id) = get_test_connection();

        let transaction = create_transaction(new_transaction(user_id, -315), &connection)
            .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, -315);
        assert_eq!(transaction.kind, TransactionType::Outcome);
        assert_eq!(transaction.date, date!(2025 - 03 - 14));
        assert_eq!(transaction.updated_at, None);
    }

    #[test]
    fn get_transaction_succeeds() {
        let (connection, user_id) = get_test_connection();
        let inserted = create_transaction(new_transaction(user_id, -315), &connection).unwrap();

        let selected = get_transaction(inserted.id, user_id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_transaction_fails_for_other_user() {
        let (connection, user_id) = get_test_connection();
        let other_user_id = insert_user_row(&connection, "bar@baz.qux", "0217654321");
        let inserted = create_transaction(new_transaction(user_id, -315), &connection).unwrap();

        let selected = get_transaction(inserted.id, other_user_id, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_orders_by_date_descending() {
        let (connection, user_id) = get_test_connection();
        let dates = [
            date!(2025 - 01 - 15),
            date!(2025 - 03 - 01),
            date!(2025 - 02 - 10),
        ];
        for date in dates {
            let mut transaction = new_transaction(user_id, -100);
            transaction.date = date;
            create_transaction(transaction, &connection).unwrap();
        }

        let got = get_transactions(user_id, 0, 100, &connection).unwrap();

        let got_dates: Vec<_> = got.iter().map(|t| t.date).collect();
        assert_eq!(
            got_dates,
            vec![
                date!(2025 - 03 - 01),
                date!(2025 - 02 - 10),
                date!(2025 - 01 - 15)
            ]
        );
    }

    #[test]
    fn get_transactions_applies_skip_and_limit() {
        let (connection, user_id) = get_test_connection();
        for _ in 0..10 {
            create_transaction(new_transaction(user_id, -100), &connection).unwrap();
        }

        let got = get_transactions(user_id, 4, 3, &connection).unwrap();

        assert_eq!(got.len(), 3);
    }

    #[test]
    fn delete_transaction_succeeds() {
        let (connection, user_id) = get_test_connection();
        let inserted = create_transaction(new_transaction(user_id, -315), &connection).unwrap();

        delete_transaction(inserted.id, user_id, &connection)
            .expect("Could not delete transaction");

        assert_eq!(
            get_transaction(inserted.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_transaction_fails_for_other_user() {
        let (connection, user_id) = get_test_connection();
        let other_user_id = insert_user_row(&connection, "bar@baz.qux", "0217654321");
        let inserted = create_transaction(new_transaction(user_id, -315), &connection).unwrap();

        let result = delete_transaction(inserted.id, other_user_id, &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert!(get_transaction(inserted.id, user_id, &connection).is_ok());
    }
}
