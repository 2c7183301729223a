//! Bulk randomized sample data for demos and manual testing.
//!
//! Fills the authenticated user's account with transactions spanning the
//! last year, a handful of reminders, and pending notifications for those
//! reminders. Pure fixture logic with no invariants of its own.

use axum::{Json, extract::State};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::UserId,
    notification::{NewNotification, create_notification},
    reminder::{NewReminder, create_reminder},
    transaction::{NewTransaction, TransactionType, create_transaction},
};

const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Freelance", "Gift", "Investment", "Bonus"];

const OUTCOME_CATEGORIES: [&str; 10] = [
    "Food",
    "Housing",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Utilities",
    "Education",
    "Travel",
    "Other",
];

/// The cadences sample reminders are drawn from: weekly, bi-weekly, monthly,
/// and quarterly.
const FREQUENCIES: [i64; 4] = [7, 14, 30, 90];

fn default_num_transactions() -> u32 {
    20
}

fn default_num_reminders() -> u32 {
    3
}

fn default_num_notifications_per_reminder() -> u32 {
    2
}

/// The request body for [generate_dummy_data_endpoint]. Every knob has a
/// default, so an empty JSON object is a valid request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateParams {
    /// How many transactions to create.
    #[serde(default = "default_num_transactions")]
    pub num_transactions: u32,
    /// How many reminders to create.
    #[serde(default = "default_num_reminders")]
    pub num_reminders: u32,
    /// How many pending notifications to create for each reminder.
    #[serde(default = "default_num_notifications_per_reminder")]
    pub num_notifications_per_reminder: u32,
    /// Whether to delete the caller's existing rows first.
    #[serde(default)]
    pub clear_existing: bool,
}

/// The response body for [generate_dummy_data_endpoint].
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateSummary {
    /// How many transactions were created.
    pub transactions_created: u32,
    /// How many reminders were created.
    pub reminders_created: u32,
    /// How many notifications were created.
    pub notifications_created: u32,
}

/// A route handler that fills the authenticated user's account with
/// randomized sample data.
pub async fn generate_dummy_data_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(params): Json<GenerateParams>,
) -> Result<Json<GenerateSummary>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    if params.clear_existing {
        tracing::info!("Clearing existing data before generating sample data");
        clear_existing_rows(user.id, &connection)?;
    }

    let summary = generate_rows(user.id, &params, &connection)?;

    tracing::info!(
        "Generated sample data for user {}: {} transactions, {} reminders, {} notifications",
        user.id,
        summary.transactions_created,
        summary.reminders_created,
        summary.notifications_created
    );

    Ok(Json(summary))
}

fn clear_existing_rows(user_id: UserId, connection: &rusqlite::Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM notification WHERE user_id = ?1", [user_id])?;
    connection.execute("DELETE FROM reminder WHERE user_id = ?1", [user_id])?;
    connection.execute("DELETE FROM \"transaction\" WHERE user_id = ?1", [user_id])?;

    Ok(())
}

fn generate_rows(
    user_id: UserId,
    params: &GenerateParams,
    connection: &rusqlite::Connection,
) -> Result<GenerateSummary, Error> {
    let mut rng = rand::thread_rng();
    let today = OffsetDateTime::now_utc().date();

    // Transactions spanning the last year, roughly 30% income.
    for _ in 0..params.num_transactions {
        let date = today.saturating_sub(Duration::days(rng.gen_range(0..=365)));

        let new_transaction = if rng.gen_bool(0.3) {
            let category = *INCOME_CATEGORIES.choose(&mut rng).unwrap();
            NewTransaction {
                user_id,
                name: format!("{category} payment"),
                amount: rng.gen_range(1000..=5000),
                kind: TransactionType::Income,
                category: category.to_string(),
                date,
            }
        } else {
            let category = *OUTCOME_CATEGORIES.choose(&mut rng).unwrap();
            NewTransaction {
                user_id,
                name: format!("{category} expense"),
                amount: -rng.gen_range(50..=1000),
                kind: TransactionType::Outcome,
                category: category.to_string(),
                date,
            }
        };

        create_transaction(new_transaction, connection)?;
    }

    // Reminders due within the next month.
    let mut reminders = Vec::with_capacity(params.num_reminders as usize);
    for _ in 0..params.num_reminders {
        let category = *OUTCOME_CATEGORIES.choose(&mut rng).unwrap();

        let reminder = create_reminder(
            NewReminder {
                user_id,
                name: format!("{category} payment"),
                active: true,
                next_date: today.saturating_add(Duration::days(rng.gen_range(1..=30))),
                category: category.to_string(),
                amount: -rng.gen_range(50..=500),
                frequency: *FREQUENCIES.choose(&mut rng).unwrap(),
                description: Some(format!("Reminder for {} payment", category.to_lowercase())),
            },
            connection,
        )?;

        reminders.push(reminder);
    }

    // Pending notifications surfacing shortly before each reminder is due.
    let mut notifications_created = 0;
    for reminder in &reminders {
        for _ in 0..params.num_notifications_per_reminder {
            let date = reminder
                .next_date
                .saturating_sub(Duration::days(rng.gen_range(0..=7)));

            create_notification(
                NewNotification {
                    reminder_id: reminder.id,
                    user_id,
                    name: format!("Reminder: {}", reminder.name),
                    date,
                },
                connection,
            )?;

            notifications_created += 1;
        }
    }

    Ok(GenerateSummary {
        transactions_created: params.num_transactions,
        reminders_created: reminders.len() as u32,
        notifications_created,
    })
}
