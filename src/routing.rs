//! Application router configuration.
//!
//! All routes except log in, user registration, and the liveness probes
//! require a bearer token; the [crate::auth::CurrentUser] extractor on each
//! protected handler enforces this.

use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::log_in,
    dashboard::{category_breakdown_endpoint, monthly_spending_endpoint},
    dummy_data::generate_dummy_data_endpoint,
    endpoints,
    logging::logging_middleware,
    notification::{
        create_notification_endpoint, list_notifications_endpoint, resolve_notification_endpoint,
    },
    reminder::{
        create_reminder_endpoint, delete_reminder_endpoint, get_reminder_endpoint,
        list_reminders_endpoint, update_reminder_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint,
    },
    user::{create_user_endpoint, get_user_me, update_user_me},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::USERS, post(create_user_endpoint))
        .route(endpoints::USER_ME, get(get_user_me).put(update_user_me))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::DASHBOARD_CATEGORIES,
            get(category_breakdown_endpoint),
        )
        .route(
            endpoints::DASHBOARD_MONTHLY_SPENDING,
            get(monthly_spending_endpoint),
        )
        .route(
            endpoints::REMINDERS,
            post(create_reminder_endpoint).get(list_reminders_endpoint),
        )
        .route(
            endpoints::REMINDER,
            get(get_reminder_endpoint)
                .put(update_reminder_endpoint)
                .delete(delete_reminder_endpoint),
        )
        .route(
            endpoints::NOTIFICATIONS,
            post(create_notification_endpoint).get(list_notifications_endpoint),
        )
        .route(endpoints::NOTIFICATION, put(resolve_notification_endpoint))
        .route(
            endpoints::GENERATE_DUMMY_DATA,
            post(generate_dummy_data_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path serves a short welcome message.
async fn get_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to Centime" }))
}

/// Liveness probe for deployment health checks.
async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
