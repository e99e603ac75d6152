//! Savings goal endpoints.
//!
//! ```text
//! GET    /api/goals                   list
//! POST   /api/goals                   create (always starts active)
//! GET    /api/goals/overview          active/completed counts and totals
//! PATCH  /api/goals/{id}/progress     set the saved amount, may complete the goal
//! PUT    /api/goals/{id}              update title / target / deadline / colour / status
//! DELETE /api/goals/{id}              delete
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use finsense_core::aggregation::GoalOverview;
use finsense_core::validation::{validate_goal_update, validate_new_goal, validate_progress_amount};
use finsense_core::{Goal, GoalUpdate, NewGoal};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/overview", get(goal_overview))
        .route("/goals/{id}/progress", patch(update_progress))
        .route("/goals/{id}", put(update_goal).delete(delete_goal))
}

/// Body of the progress update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_cents: i64,
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.db.goals().list(&user.user_id).await?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    validate_new_goal(&input)?;

    let goal = state.db.goals().insert(&user.user_id, &input).await?;
    info!(
        user_id = %user.user_id,
        goal_id = %goal.id,
        target = goal.target_cents,
        "Goal created"
    );

    Ok((StatusCode::CREATED, Json(goal)))
}

async fn goal_overview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<GoalOverview>> {
    let goals = state.db.goals().list(&user.user_id).await?;
    Ok(Json(GoalOverview::build(&goals)))
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ProgressUpdate>,
) -> ApiResult<Json<Goal>> {
    validate_progress_amount(body.current_cents)?;

    let goal = state
        .db
        .goals()
        .update_progress(&user.user_id, &id, body.current_cents)
        .await?;
    Ok(Json(goal))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    validate_goal_update(&changes)?;

    let goal = state.db.goals().update(&user.user_id, &id, &changes).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.goals().delete(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
