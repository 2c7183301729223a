//! The route handler for partially updating a reminder.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::ReminderId,
    reminder::{Reminder, get_reminder, update_reminder},
};

/// The request body for [update_reminder_endpoint]. Every field is optional;
/// absent fields keep their stored value.
///
/// The category of a reminder cannot be changed after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReminder {
    /// A new label for the reminder.
    pub name: Option<String>,
    /// Whether the reminder is in use.
    pub active: Option<bool>,
    /// When the payment is next expected.
    pub next_date: Option<Date>,
    /// The expected signed amount.
    pub amount: Option<i64>,
    /// The number of days between occurrences.
    pub frequency: Option<i64>,
    /// A free-text description.
    pub description: Option<String>,
}

/// A route handler for updating a reminder owned by the authenticated user.
pub async fn update_reminder_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(reminder_id): Path<ReminderId>,
    Json(update): Json<UpdateReminder>,
) -> Result<Json<Reminder>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut reminder = get_reminder(reminder_id, user.id, &connection)?;

    if let Some(name) = update.name {
        reminder.name = name;
    }
    if let Some(active) = update.active {
        reminder.active = active;
    }
    if let Some(next_date) = update.next_date {
        reminder.next_date = next_date;
    }
    if let Some(amount) = update.amount {
        reminder.amount = amount;
    }
    if let Some(frequency) = update.frequency {
        reminder.frequency = frequency;
    }
    if let Some(description) = update.description {
        reminder.description = Some(description);
    }

    let reminder = update_reminder(&reminder, &connection)?;

    Ok(Json(reminder))
}

#[cfg(test)]
mod update_reminder_endpoint_tests {
    use axum::http::StatusCode;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        reminder::{CreateReminder, Reminder, UpdateReminder},
        test_utils::TestContext,
    };

    async fn create_reminder(context: &TestContext) -> Reminder {
        context
            .post_authed(
                endpoints::REMINDERS,
                &CreateReminder {
                    name: "Rent payment".to_string(),
                    active: true,
                    next_date: date!(2024 - 01 - 01),
                    category: "Housing".to_string(),
                    amount: -100,
                    frequency: 30,
                    description: None,
                },
            )
            .await
            .json::<Reminder>()
    }

    #[tokio::test]
    async fn update_changes_only_submitted_fields() {
        let context = TestContext::new().await;
        let created = create_reminder(&context).await;

        let response = context
            .put_authed(
                &format_endpoint(endpoints::REMINDER, created.id),
                &UpdateReminder {
                    amount: Some(-250),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await;

        response.assert_status_ok();
        let updated = response.json::<Reminder>();
        assert_eq!(updated.amount, -250);
        assert!(!updated.active);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.next_date, created.next_date);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_returns_not_found_for_other_users_reminder() {
        let context = TestContext::new().await;
        let created = create_reminder(&context).await;
        let (_, other_token) = context.create_second_user("bar@baz.qux", "0217654321");

        context
            .server
            .put(&format_endpoint(endpoints::REMINDER, created.id))
            .authorization_bearer(other_token)
            .json(&UpdateReminder {
                amount: Some(-999),
                ..Default::default()
            })
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // The reminder must be untouched by the failed cross-user update.
        let unchanged = context
            .get_authed(&format_endpoint(endpoints::REMINDER, created.id))
            .await
            .json::<Reminder>();
        assert_eq!(unchanged.amount, created.amount);
    }

    #[tokio::test]
    async fn update_rejects_zero_frequency() {
        let context = TestContext::new().await;
        let created = create_reminder(&context).await;

        context
            .put_authed(
                &format_endpoint(endpoints::REMINDER, created.id),
                &UpdateReminder {
                    frequency: Some(0),
                    ..Default::default()
                },
            )
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
