//! # Coach Client
//!
//! Sends a conversation to the coach endpoint and reads the streamed reply.
//!
//! ## Read Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/coach { messages, financialContext }                        │
//! │       │                                                                 │
//! │       ├── 429 ──► CoachError::RateLimited(body.error)                  │
//! │       ├── 402 ──► CoachError::QuotaExhausted(body.error)               │
//! │       ├── 4xx/5xx ──► CoachError::Service { status, body.error }       │
//! │       │                                                                 │
//! │       ▼ 200 text/event-stream                                          │
//! │  on_event(Accepted)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────┐                          │
//! │  │ loop                                     │                          │
//! │  │   chunk = body.next()  (idle timeout)    │                          │
//! │  │   for snapshot in assembler.feed(chunk)  │                          │
//! │  │       on_event(Snapshot(snapshot))       │                          │
//! │  │   break on [DONE] or end of stream       │                          │
//! │  └──────────────────────────────────────────┘                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(full reply)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body stream lives inside `stream_reply` and is dropped on every exit:
//! completion, `[DONE]`, an error, or the caller dropping the future.

use futures_util::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use finsense_core::{CoachRequest, StreamAssembler};

use crate::config::CoachConfig;
use crate::error::{CoachError, CoachResult};

/// Progress of a single reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyEvent<'a> {
    /// The endpoint answered with a success status; content follows.
    Accepted,

    /// The full reply so far.
    Snapshot(&'a str),
}

/// `{ "error": "..." }` body of a failed coach request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the coach endpoint.
///
/// ## Usage
/// ```rust,ignore
/// let client = CoachClient::new(&config)?;
/// let reply = client
///     .stream_reply(&request, |event| {
///         if let ReplyEvent::Snapshot(text) = event {
///             render(text);
///         }
///     })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct CoachClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    idle_timeout: Duration,
}

impl CoachClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &CoachConfig) -> CoachResult<Self> {
        let endpoint = config.endpoint_url()?;

        // No overall request timeout: a long reply may legitimately stream
        // for minutes. Gaps between chunks are bounded in the read loop.
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| CoachError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(CoachClient {
            http,
            endpoint,
            access_token: config.endpoint.access_token.clone(),
            idle_timeout: config.timeout(),
        })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `request` and streams the reply through `on_event`.
    ///
    /// ## Returns
    /// The complete assistant text. Empty when the endpoint streamed no
    /// content before `[DONE]`.
    ///
    /// ## Errors
    /// - `RateLimited` / `QuotaExhausted` / `Service` for non-success statuses
    /// - `Transport` for connection failures, read errors and idle timeouts
    /// - `EmptyBody` if a success response carries no bytes at all
    pub async fn stream_reply<F>(&self, request: &CoachRequest, mut on_event: F) -> CoachResult<String>
    where
        F: FnMut(ReplyEvent<'_>),
    {
        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            has_context = request.financial_context.is_some(),
            "Sending coach request"
        );

        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Failed to get AI response".to_string());

            warn!(status = status.as_u16(), error = %message, "Coach request rejected");

            return Err(match status.as_u16() {
                429 => CoachError::RateLimited(message),
                402 => CoachError::QuotaExhausted(message),
                code => CoachError::Service {
                    status: code,
                    message,
                },
            });
        }

        on_event(ReplyEvent::Accepted);

        let mut body = response.bytes_stream();
        let mut assembler = StreamAssembler::new();
        let mut received_bytes = 0usize;

        loop {
            let next = tokio::time::timeout(self.idle_timeout, body.next())
                .await
                .map_err(|_| {
                    CoachError::Transport(format!(
                        "no data from coach for {} seconds",
                        self.idle_timeout.as_secs()
                    ))
                })?;

            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk?;
            received_bytes += chunk.len();

            for snapshot in assembler.feed(&chunk) {
                on_event(ReplyEvent::Snapshot(&snapshot));
            }

            if assembler.is_done() {
                break;
            }
        }

        if received_bytes == 0 {
            return Err(CoachError::EmptyBody);
        }

        let reply = assembler.finish();
        info!(bytes = received_bytes, reply_len = reply.len(), "Coach reply complete");
        Ok(reply)
    }
}
