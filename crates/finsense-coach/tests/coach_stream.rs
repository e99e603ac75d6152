//! End-to-end tests of the coach client and session against a local mock
//! of the coach endpoint.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Mutex;

use finsense_coach::{CoachClient, CoachConfig, CoachError, CoachSession, ReplyEvent, TranscriptStore};
use finsense_core::{ChatMessage, ChatRole, CoachRequest, ExchangeState, FinancialContext, WireMessage};
use finsense_db::{Database, DbConfig, DbError, DbResult};

// =============================================================================
// Mock endpoint
// =============================================================================

fn sse(chunks: Vec<&'static str>) -> Response {
    let stream = futures_util::stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream))
        .unwrap()
}

async fn split_reply() -> Response {
    sse(vec![
        ": keep-alive\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Start \"}}]}\r\n",
        "data: {\"choices\":[{\"del",
        "ta\":{\"content\":\"an emergency fund.\"}}]}\n",
        "data: [DONE]\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" IGNORED\"}}]}\n",
    ])
}

async fn rate_limited() -> impl IntoResponse {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": "Rate limit exceeded. Please try again in a moment." })),
    )
}

async fn quota() -> impl IntoResponse {
    (
        StatusCode::PAYMENT_REQUIRED,
        Json(json!({ "error": "AI credits exhausted. Please add more credits." })),
    )
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream exploded")
}

async fn empty() -> Response {
    sse(vec![])
}

/// Replies with what it received so tests can check the request.
async fn echo(headers: HeaderMap, Json(request): Json<CoachRequest>) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    let score = request
        .financial_context
        .map(|c| c.health_score.to_string())
        .unwrap_or_else(|| "none".to_string());
    let content = format!("{} messages, score {}, auth {}", request.messages.len(), score, auth);
    let line = format!(
        "data: {}\n\ndata: [DONE]\n\n",
        json!({ "choices": [{ "delta": { "content": content } }] })
    );

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from(line))
        .unwrap()
}

async fn spawn_endpoint() -> String {
    let app = Router::new()
        .route("/split", post(split_reply))
        .route("/rate", post(rate_limited))
        .route("/quota", post(quota))
        .route("/broken", post(broken))
        .route("/empty", post(empty))
        .route("/echo", post(echo));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client_for(base: &str, path: &str) -> CoachClient {
    let config = CoachConfig::for_endpoint(format!("{}{}", base, path), "user-1");
    CoachClient::new(&config).unwrap()
}

fn ask(text: &str) -> CoachRequest {
    CoachRequest {
        messages: vec![WireMessage::user(text)],
        financial_context: None,
    }
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_stream_reply_assembles_split_chunks_and_stops_at_done() {
    let base = spawn_endpoint().await;
    let client = client_for(&base, "/split");

    let mut accepted = false;
    let mut snapshots = Vec::new();
    let reply = client
        .stream_reply(&ask("hi"), |event| match event {
            ReplyEvent::Accepted => accepted = true,
            ReplyEvent::Snapshot(text) => snapshots.push(text.to_string()),
        })
        .await
        .unwrap();

    assert!(accepted);
    assert_eq!(reply, "Start an emergency fund.");
    assert_eq!(snapshots, vec!["Start ", "Start an emergency fund."]);
}

#[tokio::test]
async fn test_status_codes_map_to_distinct_errors() {
    let base = spawn_endpoint().await;

    let err = client_for(&base, "/rate")
        .stream_reply(&ask("hi"), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::RateLimited(_)));
    assert_eq!(
        err.notification(),
        "Rate limit exceeded. Please try again in a moment."
    );

    let err = client_for(&base, "/quota")
        .stream_reply(&ask("hi"), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::QuotaExhausted(_)));

    let err = client_for(&base, "/broken")
        .stream_reply(&ask("hi"), |_| {})
        .await
        .unwrap_err();
    match err {
        CoachError::Service { status, ref message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Failed to get AI response");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let base = spawn_endpoint().await;
    let err = client_for(&base, "/empty")
        .stream_reply(&ask("hi"), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::EmptyBody));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}", addr), "/coach")
        .stream_reply(&ask("hi"), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::Transport(_)));
}

#[tokio::test]
async fn test_request_carries_token_and_context() {
    let base = spawn_endpoint().await;
    let mut config = CoachConfig::for_endpoint(format!("{}/echo", base), "user-1");
    config.endpoint.access_token = Some("secret".to_string());
    let client = CoachClient::new(&config).unwrap();

    let request = CoachRequest {
        messages: vec![WireMessage::user("a"), WireMessage::assistant("b"), WireMessage::user("c")],
        financial_context: Some(FinancialContext {
            health_score: 72,
            ..Default::default()
        }),
    };

    let reply = client.stream_reply(&request, |_| {}).await.unwrap();
    assert_eq!(reply, "3 messages, score 72, auth Bearer secret");
}

// =============================================================================
// Session
// =============================================================================

#[derive(Default)]
struct MemoryStore {
    messages: Mutex<Vec<ChatMessage>>,
    fail_appends: bool,
}

#[async_trait]
impl TranscriptStore for MemoryStore {
    async fn load(&self, user_id: &str) -> DbResult<Vec<ChatMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_exchange(&self, user_id: &str, user: &str, assistant: &str) -> DbResult<()> {
        if self.fail_appends {
            return Err(DbError::QueryFailed("disk full".to_string()));
        }
        let mut messages = self.messages.lock().unwrap();
        for (role, content) in [(ChatRole::User, user), (ChatRole::Assistant, assistant)] {
            let id = format!("m{}", messages.len());
            messages.push(ChatMessage {
                id,
                user_id: user_id.to_string(),
                role,
                content: content.to_string(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_session_completes_and_persists() {
    let base = spawn_endpoint().await;
    let mut session = CoachSession::open(client_for(&base, "/split"), MemoryStore::default(), "user-1")
        .await
        .unwrap();
    let updates = session.subscribe();

    let exchange = session.send("  How do I start?  ", None).await.unwrap();

    assert_eq!(exchange.user, "How do I start?");
    assert_eq!(exchange.assistant, "Start an emergency fund.");
    assert_eq!(session.state(), ExchangeState::Done);
    assert_eq!(
        *updates.borrow(),
        vec![
            WireMessage::user("How do I start?"),
            WireMessage::assistant("Start an emergency fund."),
        ]
    );
}

#[tokio::test]
async fn test_session_rolls_back_on_rate_limit() {
    let base = spawn_endpoint().await;
    let mut session = CoachSession::open(client_for(&base, "/rate"), MemoryStore::default(), "user-1")
        .await
        .unwrap();
    let updates = session.subscribe();

    let err = session.send("hello", None).await.unwrap_err();

    assert!(err.is_quota_error());
    assert_eq!(session.state(), ExchangeState::Failed);
    assert!(session.history().is_empty());
    assert!(updates.borrow().is_empty());
}

#[tokio::test]
async fn test_session_rolls_back_when_store_fails() {
    let base = spawn_endpoint().await;
    let store = MemoryStore {
        fail_appends: true,
        ..Default::default()
    };
    let mut session = CoachSession::open(client_for(&base, "/split"), store, "user-1")
        .await
        .unwrap();

    let err = session.send("hello", None).await.unwrap_err();

    assert!(matches!(err, CoachError::Store(_)));
    assert!(session.history().is_empty());
    assert_eq!(session.state(), ExchangeState::Failed);
}

#[tokio::test]
async fn test_blank_message_is_rejected_before_any_request() {
    let base = spawn_endpoint().await;
    let mut session = CoachSession::open(client_for(&base, "/split"), MemoryStore::default(), "user-1")
        .await
        .unwrap();

    let err = session.send("   ", None).await.unwrap_err();
    assert!(matches!(err, CoachError::Conversation(_)));
    assert_eq!(session.state(), ExchangeState::Idle);
}

#[tokio::test]
async fn test_session_with_sqlite_transcript_resumes_history() {
    let base = spawn_endpoint().await;
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let mut session = CoachSession::open(client_for(&base, "/split"), db.chat(), "user-1")
        .await
        .unwrap();
    session.send("first", None).await.unwrap();

    let stored = db.chat().list("user-1").await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].role, ChatRole::User);
    assert_eq!(stored[1].content, "Start an emergency fund.");

    let resumed = CoachSession::open(client_for(&base, "/echo"), db.chat(), "user-1")
        .await
        .unwrap();
    assert_eq!(resumed.history().len(), 2);
}
