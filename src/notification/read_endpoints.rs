//! The route handler for listing notifications.

use axum::{Json, extract::State};

use crate::{
    AppState, Error,
    auth::CurrentUser,
    notification::{Notification, get_notifications},
};

/// A route handler for listing the authenticated user's notifications, most
/// recently created first.
pub async fn list_notifications_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Notification>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let notifications = get_notifications(user.id, &connection)?;

    Ok(Json(notifications))
}

#[cfg(test)]
mod list_notifications_endpoint_tests {
    use axum::http::StatusCode;
    use time::macros::date;

    use crate::{
        endpoints,
        notification::{CreateNotification, Notification},
        reminder::{CreateReminder, Reminder},
        test_utils::TestContext,
    };

    #[tokio::test]
    async fn list_returns_own_notifications_only() {
        let context = TestContext::new().await;
        let reminder = context
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
            .json::<Reminder>();
        context
            .post_authed(
                endpoints::NOTIFICATIONS,
                &CreateNotification {
                    name: "Reminder: Rent payment".to_string(),
                    reminder_id: reminder.id,
                    date: None,
                },
            )
            .await
            .assert_status(StatusCode::CREATED);
        let (_, other_token) = context.create_second_user("bar@baz.qux", "0217654321");

        let own = context.get_authed(endpoints::NOTIFICATIONS).await;
        own.assert_status_ok();
        assert_eq!(own.json::<Vec<Notification>>().len(), 1);

        let other = context
            .server
            .get(endpoints::NOTIFICATIONS)
            .authorization_bearer(other_token)
            .await;
        other.assert_status_ok();
        assert_eq!(other.json::<Vec<Notification>>().len(), 0);
    }
}
