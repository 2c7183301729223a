//! Route handlers for listing and reading transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    database_id::TransactionId,
    transaction::{Transaction, get_transaction, get_transactions},
};

/// Query parameters for paging through [list_transactions_endpoint].
#[derive(Debug, Deserialize)]
pub struct ListTransactionsParams {
    /// How many transactions to skip from the start of the result.
    #[serde(default)]
    pub skip: u32,
    /// The maximum number of transactions to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// A route handler for listing the authenticated user's transactions, most
/// recent date first.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(user.id, params.skip, params.limit, &connection)?;

    Ok(Json(transactions))
}

/// A route handler for reading a single transaction owned by the
/// authenticated user.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user.id, &connection).inspect_err(|_| {
        tracing::warn!(
            "User {} tried to access non-existent or unauthorized transaction {}",
            user.id,
            transaction_id
        )
    })?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod read_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::TestContext,
        transaction::{CreateTransaction, Transaction, TransactionType},
    };

    fn sample_request() -> CreateTransaction {
        CreateTransaction {
            name: "Groceries expense".to_string(),
            amount: -315,
            kind: TransactionType::Outcome,
            category: "Food".to_string(),
            date: date!(2025 - 03 - 14),
        }
    }

    #[tokio::test]
    async fn list_returns_own_transactions_only() {
        let context = TestContext::new().await;
        context
            .post_authed(endpoints::TRANSACTIONS, &sample_request())
            .await
            .assert_status(StatusCode::CREATED);
        let (_, other_token) = context.create_second_user("bar@baz.qux", "0217654321");

        let own = context.get_authed(endpoints::TRANSACTIONS).await;
        own.assert_status_ok();
        assert_eq!(own.json::<Vec<Transaction>>().len(), 1);

        let other = context
            .server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(other_token)
            .await;
        other.assert_status_ok();
        assert_eq!(other.json::<Vec<Transaction>>().len(), 0);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let context = TestContext::new().await;
        for _ in 0..3 {
            context
                .post_authed(endpoints::TRANSACTIONS, &sample_request())
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = context
            .get_authed(&format!("{}?limit=2", endpoints::TRANSACTIONS))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>().len(), 2);
    }

    #[tokio::test]
    async fn get_returns_transaction_by_id() {
        let context = TestContext::new().await;
        let created = context
            .post_authed(endpoints::TRANSACTIONS, &sample_request())
            .await
            .json::<Transaction>();

        let response = context
            .get_authed(&format_endpoint(endpoints::TRANSACTION, created.id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>().id, created.id);
    }

    #[tokio::test]
    async fn get_returns_not_found_for_other_users_transaction() {
        let context = TestContext::new().await;
        let created = context
            .post_authed(endpoints::TRANSACTIONS, &sample_request())
            .await
            .json::<Transaction>();
        let (_, other_token) = context.create_second_user("bar@baz.qux", "0217654321");

        context
            .server
            .get(&format_endpoint(endpoints::TRANSACTION, created.id))
            .authorization_bearer(other_token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_returns_not_found_for_missing_transaction() {
        let context = TestContext::new().await;

        context
            .get_authed(&format_endpoint(endpoints::TRANSACTION, 12345))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
