//! # finsense-api: HTTP API for FinSense
//!
//! JSON endpoints for the web frontend plus the AI coach proxy.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Browser ──► CORS ──► TraceLayer ──► /health                            │
//! │                                 └──► /api/* ──► AuthUser (JWT)          │
//! │                                                   │                     │
//! │                         ┌─────────────────────────┼──────────────┐     │
//! │                         ▼                         ▼              ▼     │
//! │                  finsense-db repos        finsense-core     AI gateway │
//! │                  (per-user CRUD)         (summary, score)   (SSE proxy)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `/api/categories` is the only `/api` route that does not require a token.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, JwtManager};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(routes::categories::router())
        .merge(routes::transactions::router())
        .merge(routes::budgets::router())
        .merge(routes::goals::router())
        .merge(routes::profile::router())
        .merge(routes::summary::router())
        .merge(routes::chat::router())
        .merge(routes::coach::router());

    // The frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
