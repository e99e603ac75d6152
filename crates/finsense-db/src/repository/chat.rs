//! # Chat Transcript Repository
//!
//! Append-only storage for the coach conversation.
//!
//! ## One Exchange, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append_exchange(user, "How do I save more?", "Start by ...")          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    INSERT chat_messages (role = 'user',      created_at = t)           │
//! │    INSERT chat_messages (role = 'assistant', created_at = t)           │
//! │  COMMIT  ← both rows or neither                                        │
//! │                                                                         │
//! │  list(user): ORDER BY created_at, rowid                                │
//! │  rowid breaks the tie so the user line always precedes its reply.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlTransaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use finsense_core::{ChatMessage, ChatRole};

/// Repository for the chat transcript.
#[derive(Debug, Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Creates a new ChatRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ChatRepository { pool }
    }

    /// Lists the user's transcript, oldest first.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, user_id, role, content, created_at
            FROM chat_messages
            WHERE user_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Stores a completed exchange: the user's line and the full reply.
    ///
    /// ## Returns
    /// The two stored messages, user first.
    pub async fn append_exchange(
        &self,
        user_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> DbResult<(ChatMessage, ChatMessage)> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let user = insert_message(&mut tx, user_id, ChatRole::User, user_text, now).await?;
        let assistant =
            insert_message(&mut tx, user_id, ChatRole::Assistant, assistant_text, now).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(
            user_id = %user_id,
            reply_len = assistant.content.len(),
            "Stored chat exchange"
        );

        Ok((user, assistant))
    }

    /// Counts the user's stored messages.
    pub async fn count(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

async fn insert_message(
    tx: &mut SqlTransaction<'_, Sqlite>,
    user_id: &str,
    role: ChatRole,
    content: &str,
    created_at: DateTime<Utc>,
) -> DbResult<ChatMessage> {
    let message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        role,
        content: content.to_string(),
        created_at,
    };

    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, user_id, role, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&message.id)
    .bind(&message.user_id)
    .bind(message.role)
    .bind(&message.content)
    .bind(message.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(message)
}

// =============================================================================
// Unit Tests
// =============================================================================
