use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use finsense_core::validation::{validate_chat_message, validate_reply};
use finsense_core::ChatMessage;
use serde::Deserialize;
use tracing::debug;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat/messages", get(list_messages).post(append_exchange))
}

/// A completed exchange to store: the user's message and the full reply.
#[derive(Debug, Deserialize)]
pub struct ExchangeBody {
    pub user: String,
    pub assistant: String,
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let messages = state.db.chat().list(&user.user_id).await?;
    Ok(Json(messages))
}

/// Stores both records of an exchange, or neither. The user message is
/// trimmed; the reply is stored exactly as streamed.
async fn append_exchange(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<ExchangeBody>,
) -> ApiResult<(StatusCode, Json<Vec<ChatMessage>>)> {
    let user_text = validate_chat_message(&body.user)?;
    validate_reply(&body.assistant)?;

    let (question, answer) = state
        .db
        .chat()
        .append_exchange(&user.user_id, &user_text, &body.assistant)
        .await?;
    debug!(user_id = %user.user_id, reply_len = answer.content.len(), "Exchange stored");

    Ok((StatusCode::CREATED, Json(vec![question, answer])))
}
