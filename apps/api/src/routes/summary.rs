//! Financial summary and dashboard endpoints.
//!
//! Both recompute from the stored rows on every call; nothing derived is
//! persisted.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use finsense_core::aggregation::{daily_series, top_expense_categories, CategoryAmount, DailyPoint};
use finsense_core::summary::ScoreBreakdown;
use finsense_core::{compute_summary_with_breakdown, FinancialSummary, HealthLabel, Transaction};
use serde::Serialize;
use tracing::debug;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::DateQuery;
use crate::state::AppState;

/// Days shown in the dashboard income/expense chart.
pub const CHART_DAYS: u32 = 7;

/// Categories shown in the dashboard spending breakdown.
pub const TOP_CATEGORIES: usize = 5;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/dashboard", get(get_dashboard))
}

/// Everything the dashboard page renders in one response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date: NaiveDate,
    pub summary: FinancialSummary,
    pub health_label: HealthLabel,
    pub score_breakdown: ScoreBreakdown,
    pub daily: Vec<DailyPoint>,
    pub top_categories: Vec<CategoryAmount>,
}

async fn load_summary(
    state: &AppState,
    user_id: &str,
    today: NaiveDate,
) -> ApiResult<(FinancialSummary, Vec<Transaction>, ScoreBreakdown)> {
    let transactions = state.db.transactions().list(user_id).await?;
    let budgets = state.db.budgets().list(user_id).await?;
    let goals = state.db.goals().list(user_id).await?;
    // Reading the summary never creates a profile row
    let profile = state.db.profiles().get(user_id).await?;

    let (summary, breakdown) =
        compute_summary_with_breakdown(&transactions, &budgets, &goals, profile.as_ref(), today);

    debug!(
        user_id = %user_id,
        %today,
        score = summary.health_score,
        month_transactions = summary.month_transactions.len(),
        "Summary computed"
    );

    Ok((summary, transactions, breakdown))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<FinancialSummary>> {
    let (summary, _, _) = load_summary(&state, &user.user_id, query.reference_date()).await?;
    Ok(Json(summary))
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Dashboard>> {
    let today = query.reference_date();
    let (summary, transactions, breakdown) = load_summary(&state, &user.user_id, today).await?;

    let daily = daily_series(&transactions, today, CHART_DAYS);
    let top_categories = top_expense_categories(&summary.month_transactions, TOP_CATEGORIES);

    Ok(Json(Dashboard {
        date: today,
        health_label: HealthLabel::from_score(summary.health_score),
        score_breakdown: breakdown,
        daily,
        top_categories,
        summary,
    }))
}
