//! # AI Coach Proxy
//!
//! Forwards a conversation to the model gateway and streams the reply back
//! unchanged.
//!
//! ## Flow
//! ```text
//! ┌──────────┐  POST /api/coach         ┌──────────────┐  POST (stream: true)  ┌─────────┐
//! │ Frontend │ ───────────────────────► │ coach proxy  │ ────────────────────► │ Gateway │
//! │          │  {messages, context?}    │              │  [system, ...msgs]    │         │
//! │          │ ◄─────────────────────── │              │ ◄──────────────────── │         │
//! └──────────┘  text/event-stream       └──────────────┘  SSE bytes            └─────────┘
//! ```
//!
//! Errors use the `{ "error": "..." }` body the coach client reads, not the
//! `{ code, message }` shape of the other routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use finsense_core::chat::system_prompt;
use finsense_core::{CoachRequest, WireMessage};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::auth::AuthUser;
use crate::config::GATEWAY_KEY_VAR;
use crate::state::AppState;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again in a moment.";
pub const QUOTA_MESSAGE: &str = "AI credits exhausted. Please add more credits.";
pub const SERVICE_ERROR_MESSAGE: &str = "AI service error";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/coach", post(coach))
}

/// Body sent to the chat completions gateway.
#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    stream: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "error": message }))).into_response()
}

async fn coach(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CoachRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        warn!(user_id = %user.user_id, error = %e, "Rejected coach request");
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let Some(api_key) = state.config.ai_gateway_api_key.as_deref() else {
        error!("{} is not configured", GATEWAY_KEY_VAR);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{} is not configured", GATEWAY_KEY_VAR),
        );
    };

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(WireMessage::system(system_prompt(
        request.financial_context.as_ref(),
    )));
    messages.extend(request.messages);

    info!(
        user_id = %user.user_id,
        messages = messages.len(),
        has_context = request.financial_context.is_some(),
        model = %state.config.ai_model,
        "Forwarding coach request"
    );

    let body = GatewayRequest {
        model: &state.config.ai_model,
        messages,
        stream: true,
    };

    let upstream = match state
        .http
        .post(&state.config.ai_gateway_url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "AI gateway unreachable");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        let detail = upstream.text().await.unwrap_or_default();
        return match status.as_u16() {
            429 => {
                warn!(user_id = %user.user_id, "AI gateway rate limited");
                error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE)
            }
            402 => {
                warn!(user_id = %user.user_id, "AI gateway credits exhausted");
                error_response(StatusCode::PAYMENT_REQUIRED, QUOTA_MESSAGE)
            }
            code => {
                error!(status = code, %detail, "AI gateway error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVICE_ERROR_MESSAGE)
            }
        };
    }

    // Passthrough: bytes reach the client as the gateway sends them
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response()
}
