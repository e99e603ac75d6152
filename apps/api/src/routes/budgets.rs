//! Budget endpoints.
//!
//! ```text
//! GET    /api/budgets                     list, newest first
//! POST   /api/budgets                     create (409 on a duplicate category)
//! GET    /api/budgets/overview?date=      spending against every budget this month
//! PUT    /api/budgets/{id}                update limit / period / colour
//! DELETE /api/budgets/{id}                delete
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use finsense_core::aggregation::BudgetOverview;
use finsense_core::validation::{validate_budget_update, validate_new_budget};
use finsense_core::{Budget, BudgetUpdate, NewBudget};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::DateQuery;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/overview", get(budget_overview))
        .route("/budgets/{id}", put(update_budget).delete(delete_budget))
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = state.db.budgets().list(&user.user_id).await?;
    Ok(Json(budgets))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    // The unique index still catches a concurrent duplicate as a conflict
    let existing = state.db.budgets().list(&user.user_id).await?;
    validate_new_budget(&input, &existing)?;

    let budget = state.db.budgets().insert(&user.user_id, &input).await?;
    info!(
        user_id = %user.user_id,
        budget_id = %budget.id,
        category = %budget.category,
        limit = budget.limit_cents,
        "Budget created"
    );

    Ok((StatusCode::CREATED, Json(budget)))
}

async fn budget_overview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<BudgetOverview>> {
    let budgets = state.db.budgets().list(&user.user_id).await?;
    let transactions = state.db.transactions().list(&user.user_id).await?;

    Ok(Json(BudgetOverview::build(
        &budgets,
        &transactions,
        query.reference_date(),
    )))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    validate_budget_update(&changes)?;

    let budget = state
        .db
        .budgets()
        .update(&user.user_id, &id, &changes)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.budgets().delete(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
