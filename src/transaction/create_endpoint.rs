//! The route handler for recording a new transaction.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    transaction::{
        NewTransaction, Transaction, TransactionType, create_transaction, normalize_amount,
    },
};

/// The request body for [create_transaction_endpoint].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransaction {
    /// A short label for the transaction.
    pub name: String,
    /// The amount of money earned or spent. The sign is normalized to match
    /// `type` before the transaction is stored.
    pub amount: i64,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

/// A route handler for recording a new transaction for the authenticated user.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(new_transaction): Json<CreateTransaction>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(
        NewTransaction {
            user_id: user.id,
            name: new_transaction.name,
            amount: normalize_amount(new_transaction.kind, new_transaction.amount),
            kind: new_transaction.kind,
            category: new_transaction.category,
            date: new_transaction.date,
        },
        &connection,
    )?;

    tracing::info!("User {} created transaction {}", user.id, transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::TestContext,
        transaction::{CreateTransaction, Transaction, TransactionType},
    };

    fn sample_request(amount: i64, kind: TransactionType) -> CreateTransaction {
        CreateTransaction {
            name: "Groceries expense".to_string(),
            amount,
            kind,
            category: "Food".to_string(),
            date: date!(2025 - 03 - 14),
        }
    }

    #[tokio::test]
    async fn create_returns_created_transaction() {
        let context = TestContext::new().await;

        let response = context
            .post_authed(
                endpoints::TRANSACTIONS,
                &sample_request(-315, TransactionType::Outcome),
            )
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.amount, -315);
        assert_eq!(transaction.kind, TransactionType::Outcome);
        assert_eq!(transaction.category, "Food");
    }

    #[tokio::test]
    async fn outcome_with_positive_amount_is_stored_negative() {
        let context = TestContext::new().await;

        let response = context
            .post_authed(
                endpoints::TRANSACTIONS,
                &sample_request(315, TransactionType::Outcome),
            )
            .await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.json::<Transaction>().amount <= 0);
    }

    #[tokio::test]
    async fn income_with_negative_amount_is_stored_positive() {
        let context = TestContext::new().await;

        let response = context
            .post_authed(
                endpoints::TRANSACTIONS,
                &sample_request(-4200, TransactionType::Income),
            )
            .await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.json::<Transaction>().amount >= 0);
    }

    #[tokio::test]
    async fn expense_is_accepted_as_alias_for_outcome() {
        let context = TestContext::new().await;

        let response = context
            .post_authed(
                endpoints::TRANSACTIONS,
                &serde_json::json!({
                    "name": "Groceries expense",
                    "amount": 315,
                    "type": "expense",
                    "category": "Food",
                    "date": sample_request(0, TransactionType::Outcome).date,
                }),
            )
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.kind, TransactionType::Outcome);
        assert_eq!(transaction.amount, -315);
    }

    #[tokio::test]
    async fn create_requires_authentication() {
        let context = TestContext::new().await;

        context
            .server
            .post(endpoints::TRANSACTIONS)
            .json(&sample_request(-315, TransactionType::Outcome))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
