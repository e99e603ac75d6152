//! # Transcript Store
//!
//! The seam between a coach session and wherever the transcript is kept.
//! The SQLite [`ChatRepository`] is the production implementation.

use async_trait::async_trait;

use finsense_core::ChatMessage;
use finsense_db::{ChatRepository, DbResult};

/// Loads and appends the chat transcript of a user.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Stored messages, oldest first.
    async fn load(&self, user_id: &str) -> DbResult<Vec<ChatMessage>>;

    /// Appends one completed exchange (user line, then the full reply).
    async fn append_exchange(&self, user_id: &str, user: &str, assistant: &str) -> DbResult<()>;
}

#[async_trait]
impl TranscriptStore for ChatRepository {
    async fn load(&self, user_id: &str) -> DbResult<Vec<ChatMessage>> {
        self.list(user_id).await
    }

    async fn append_exchange(&self, user_id: &str, user: &str, assistant: &str) -> DbResult<()> {
        ChatRepository::append_exchange(self, user_id, user, assistant).await?;
        Ok(())
    }
}
