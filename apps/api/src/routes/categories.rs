use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use finsense_core::categories::CategoryCatalog;

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/categories", get(list_categories))
}

/// Built-in category lists and the colour palette. Public.
async fn list_categories() -> Json<CategoryCatalog> {
    Json(CategoryCatalog::builtin())
}
