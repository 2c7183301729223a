//! Notifications surfaced from reminders, awaiting a user decision.
//!
//! A stored notification is always pending. Accepting or refusing it deletes
//! the row and advances the owning reminder's schedule; extending it pushes
//! its date out by one day and keeps it pending.

mod core;
mod create_endpoint;
mod read_endpoints;
mod resolve;

pub use core::{
    NewNotification, Notification, NotificationStatus, create_notification,
    create_notification_table, delete_notification, extend_notification, get_notification,
    get_notifications, touch_notification,
};
pub use create_endpoint::{CreateNotification, create_notification_endpoint};
pub use read_endpoints::list_notifications_endpoint;
pub use resolve::{ResolveNotification, resolve_notification, resolve_notification_endpoint};
