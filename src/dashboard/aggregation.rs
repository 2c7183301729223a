//! Transaction data aggregation for the dashboard endpoints.
//!
//! Provides functions to compute each category's share of total spending and
//! to sum spending by calendar month.

use std::collections::HashMap;

use time::Month;

use crate::transaction::{Transaction, TransactionType};

/// The calendar months in order, used to key the monthly spending report.
const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute each category's share of the total absolute outcome spending in
/// `transactions`, rounded to 2 decimals.
///
/// Income transactions are ignored. With no outcome transactions the result
/// is empty. When the outcome amounts sum to zero, each present category gets
/// an equal share rather than dividing by zero.
pub(super) fn category_shares(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals: HashMap<&str, i64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Outcome)
    {
        *totals.entry(transaction.category.as_str()).or_insert(0) += transaction.amount;
    }

    let total_spending: i64 = totals.values().map(|amount| amount.abs()).sum();
    let num_categories = totals.len();

    totals
        .into_iter()
        .map(|(category, amount)| {
            let share = if total_spending == 0 {
                1.0 / num_categories as f64
            } else {
                amount.abs() as f64 / total_spending as f64
            };

            (category.to_string(), round_to_cents(share))
        })
        .collect()
}

/// Sum the absolute outcome spending in `transactions` for each calendar
/// month of `year`.
///
/// The result always has exactly twelve entries, keyed by month name; months
/// without transactions report 0.0.
pub(super) fn monthly_spending(transactions: &[Transaction], year: i32) -> HashMap<String, f64> {
    let mut totals: HashMap<u8, i64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Outcome && t.date.year() == year)
    {
        *totals.entry(transaction.date.month() as u8).or_insert(0) += transaction.amount;
    }

    MONTHS
        .iter()
        .map(|&month| {
            let total = totals.get(&(month as u8)).copied().unwrap_or(0);

            (month.to_string(), total.abs() as f64)
        })
        .collect()
}
