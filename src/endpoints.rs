//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/reminders/{reminder_id}',
//! use [format_endpoint].

/// The root route, which serves a welcome message.
pub const ROOT: &str = "/";
/// The liveness probe.
pub const HEALTH: &str = "/health";
/// The route for logging in a user and receiving a bearer token.
pub const LOG_IN: &str = "/api/auth/login";
/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route for the authenticated user to read and update their own account.
pub const USER_ME: &str = "/api/users/me";
/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the per-category spending breakdown.
pub const DASHBOARD_CATEGORIES: &str = "/api/transactions/dashboard/categories";
/// The route for the per-month spending totals.
pub const DASHBOARD_MONTHLY_SPENDING: &str = "/api/transactions/dashboard/monthly-spending";
/// The route to create and list reminders.
pub const REMINDERS: &str = "/api/reminders";
/// The route to access a single reminder.
pub const REMINDER: &str = "/api/reminders/{reminder_id}";
/// The route to create and list notifications.
pub const NOTIFICATIONS: &str = "/api/notifications";
/// The route to resolve a single notification.
pub const NOTIFICATION: &str = "/api/notifications/{notification_id}";
/// The route to fill the caller's account with randomized sample data.
pub const GENERATE_DUMMY_DATA: &str = "/api/dummy-data/generate";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/reminders/{reminder_id}',
/// '{reminder_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
