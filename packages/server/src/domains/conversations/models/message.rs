use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, MessageId, UserId};

/// Message - append-only, immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A message joined with its sender's visible name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageWithSender {
    #[sqlx(flatten)]
    pub message: Message,
    pub sender_name: String,
}

/// Cap on messages returned when opening a thread.
pub const THREAD_MESSAGE_LIMIT: i64 = 300;

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Message {
    /// Append a message to a channel.
    pub async fn create(
        conversation_id: ConversationId,
        sender_id: UserId,
        body: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, body)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(pool)
        .await?;
        Ok(message)
    }

    /// Thread contents, oldest first, with sender names resolved.
    pub async fn find_thread(
        conversation_id: ConversationId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<MessageWithSender>> {
        let messages = sqlx::query_as::<_, MessageWithSender>(
            r#"
            SELECT m.*, COALESCE(NULLIF(u.display_name, ''), u.username) AS sender_name
            FROM messages m
            INNER JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at, m.id
            LIMIT $2
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }

    /// The most recent message in a channel, if any.
    pub async fn last_in_conversation(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(pool)
        .await?;
        Ok(message)
    }
}
