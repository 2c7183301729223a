//! Recurring payment reminders: the data model and CRUD endpoints.
//!
//! A reminder is a template for an expected payment with a cadence in days.
//! Its `next_date` only ever moves forward, and only when a notification for
//! the reminder is accepted or refused.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod read_endpoints;
mod update_endpoint;

pub use core::{
    NewReminder, Reminder, advance_next_date, create_reminder, create_reminder_table,
    delete_reminder, get_reminder, get_reminders, update_reminder,
};
pub use create_endpoint::{CreateReminder, create_reminder_endpoint};
pub use delete_endpoint::delete_reminder_endpoint;
pub use read_endpoints::{get_reminder_endpoint, list_reminders_endpoint};
pub use update_endpoint::{UpdateReminder, update_reminder_endpoint};
