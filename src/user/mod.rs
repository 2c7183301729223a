//! User accounts: the data model, registration, and self-service profile
//! endpoints.

mod core;
mod create_endpoint;
mod me_endpoint;

pub use core::{
    Phone, User, UserProfile, create_user, create_user_table, get_user_by_email, get_user_by_id,
    update_user,
};
pub use create_endpoint::{CreateUser, create_user_endpoint};
pub use me_endpoint::{UpdateUser, get_user_me, update_user_me};
