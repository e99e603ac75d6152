//! # Coach Session
//!
//! Drives one user's conversation: state machine, live snapshots for the
//! UI, and transcript persistence.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  send("How do I save more?", context)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Conversation::begin ──► watch: [..history, user]                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoachClient::stream_reply                                             │
//! │       │ Accepted  ──► start_streaming ──► watch: [.., user, ""]        │
//! │       │ Snapshot  ──► apply_snapshot  ──► watch: [.., user, "Start"]   │
//! │       │ Snapshot  ──► apply_snapshot  ──► watch: [.., user, "Start by"]│
//! │       ▼                                                                 │
//! │  ok:    store.append_exchange ──► Conversation::complete               │
//! │  error: Conversation::fail ──► watch: [..history]   (rollback)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The watch channel has overwrite semantics: a slow renderer skips
//! intermediate snapshots and always sees the latest one.

use tokio::sync::watch;
use tracing::{info, warn};

use finsense_core::chat::CompletedExchange;
use finsense_core::{CoachRequest, Conversation, ExchangeState, FinancialContext, WireMessage};

use crate::client::{CoachClient, ReplyEvent};
use crate::error::CoachResult;
use crate::store::TranscriptStore;

/// A user's conversation with the coach.
pub struct CoachSession<S: TranscriptStore> {
    client: CoachClient,
    store: S,
    user_id: String,
    conversation: Conversation,
    snapshots: watch::Sender<Vec<WireMessage>>,
}

impl<S: TranscriptStore> CoachSession<S> {
    /// Opens a session, resuming from the stored transcript.
    pub async fn open(client: CoachClient, store: S, user_id: impl Into<String>) -> CoachResult<Self> {
        let user_id = user_id.into();
        let history: Vec<WireMessage> = store
            .load(&user_id)
            .await?
            .iter()
            .map(WireMessage::from)
            .collect();

        info!(user_id = %user_id, messages = history.len(), "Opened coach session");

        let (snapshots, _) = watch::channel(history.clone());
        Ok(CoachSession {
            client,
            store,
            user_id,
            conversation: Conversation::with_history(history),
            snapshots,
        })
    }

    /// Receiver of the visible message list, updated on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<WireMessage>> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> ExchangeState {
        self.conversation.state()
    }

    /// Committed messages.
    pub fn history(&self) -> &[WireMessage] {
        self.conversation.history()
    }

    /// Sends one message and waits for the full reply.
    ///
    /// On any failure the pending message and partial reply are rolled
    /// back. Nothing is persisted unless the exchange completes.
    pub async fn send(
        &mut self,
        text: &str,
        context: Option<FinancialContext>,
    ) -> CoachResult<CompletedExchange> {
        let messages = self.conversation.begin(text)?;
        self.publish();

        let user_text = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let request = CoachRequest {
            messages,
            financial_context: context,
        };

        let outcome = {
            let Self {
                client,
                conversation,
                snapshots,
                ..
            } = self;

            client
                .stream_reply(&request, |event| {
                    let applied = match event {
                        ReplyEvent::Accepted => conversation.start_streaming(),
                        ReplyEvent::Snapshot(text) => conversation.apply_snapshot(text),
                    };
                    if applied.is_ok() {
                        snapshots.send_replace(conversation.visible_messages());
                    }
                })
                .await
        };

        let reply = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                warn!(user_id = %self.user_id, error = %err, "Coach exchange failed");
                self.cancel();
                return Err(err);
            }
        };

        if let Err(err) = self
            .store
            .append_exchange(&self.user_id, &user_text, &reply)
            .await
        {
            warn!(user_id = %self.user_id, error = %err, "Failed to store chat exchange");
            self.cancel();
            return Err(err.into());
        }

        let exchange = self.conversation.complete()?;
        self.publish();
        Ok(exchange)
    }

    /// Rolls back an exchange that was abandoned mid-flight, e.g. after the
    /// `send` future was dropped. No-op when nothing is running.
    pub fn cancel(&mut self) {
        if self.conversation.fail().is_ok() {
            info!(user_id = %self.user_id, "Coach exchange rolled back");
            self.publish();
        }
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(self.conversation.visible_messages());
    }
}
