//! Financial transactions: the data model, creation with amount sign
//! normalization, listing, and deletion.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod read_endpoints;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
    delete_transaction, get_all_transactions, get_transaction, get_transactions, normalize_amount,
};
pub use create_endpoint::{CreateTransaction, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use read_endpoints::{get_transaction_endpoint, list_transactions_endpoint};
