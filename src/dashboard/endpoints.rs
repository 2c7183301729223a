//! Route handlers for the dashboard aggregations.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    dashboard::aggregation::{category_shares, monthly_spending},
    transaction::get_all_transactions,
};

/// A route handler reporting each category's share of the authenticated
/// user's total spending.
pub async fn category_breakdown_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<HashMap<String, f64>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(user.id, &connection)?;

    Ok(Json(category_shares(&transactions)))
}

/// Query parameters for [monthly_spending_endpoint].
#[derive(Debug, Deserialize)]
pub struct MonthlySpendingParams {
    /// The calendar year to report on. Defaults to the current year.
    pub year: Option<i32>,
}

/// A route handler reporting the authenticated user's spending summed by
/// calendar month.
pub async fn monthly_spending_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<MonthlySpendingParams>,
) -> Result<Json<HashMap<String, f64>>, Error> {
    let year = params
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(user.id, &connection)?;

    Ok(Json(monthly_spending(&transactions, year)))
}
