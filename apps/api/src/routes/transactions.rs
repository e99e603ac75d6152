//! Transaction endpoints.
//!
//! ```text
//! GET    /api/transactions?q=food&type=expense   filtered list, newest first
//! POST   /api/transactions                       create
//! PUT    /api/transactions/{id}                  full replace
//! DELETE /api/transactions/{id}                  delete
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use finsense_core::aggregation::TransactionFilter;
use finsense_core::validation::validate_new_transaction;
use finsense_core::{NewTransaction, Transaction, TransactionType};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            put(replace_transaction).delete(delete_transaction),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let all = state.db.transactions().list(&user.user_id).await?;
    let filter = TransactionFilter {
        query: query.q,
        kind: query.kind,
    };

    let matching = filter.apply(&all).into_iter().cloned().collect();
    Ok(Json(matching))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    validate_new_transaction(&input)?;

    let txn = state.db.transactions().insert(&user.user_id, &input).await?;
    info!(
        user_id = %user.user_id,
        transaction_id = %txn.id,
        kind = %txn.kind,
        amount = txn.amount_cents,
        "Transaction recorded"
    );

    Ok((StatusCode::CREATED, Json(txn)))
}

async fn replace_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<NewTransaction>,
) -> ApiResult<Json<Transaction>> {
    validate_new_transaction(&input)?;

    let txn = state
        .db
        .transactions()
        .replace(&user.user_id, &id, &input)
        .await?;
    Ok(Json(txn))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.transactions().delete(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
