//! Spending aggregations over the authenticated user's transactions.

mod aggregation;
mod endpoints;

pub use endpoints::{
    MonthlySpendingParams, category_breakdown_endpoint, monthly_spending_endpoint,
};
