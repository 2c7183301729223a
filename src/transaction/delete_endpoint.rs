//! The route handler for deleting a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error, auth::CurrentUser, database_id::TransactionId,
    transaction::delete_transaction,
};

/// A route handler for deleting a transaction owned by the authenticated user.
///
/// Responds with no content on success.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user.id, &connection).inspect_err(|_| {
        tracing::warn!(
            "User {} tried to delete non-existent or unauthorized transaction {}",
            user.id,
            transaction_id
        )
    })?;

    tracing::info!("User {} deleted transaction {}", user.id, transaction_id);

    Ok(StatusCode::NO_CONTENT)
}
