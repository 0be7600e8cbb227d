use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, UserId};

/// ReadWatermark - per (channel, participant) "read up to" timestamp.
///
/// Created lazily on first touch; a missing row means the participant has
/// never read the channel, so every foreign message counts as unread.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReadWatermark {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub last_read_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ReadWatermark {
    /// Set or create the watermark at now. Only ever moves the acting
    /// participant's own marker.
    pub async fn touch(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        let watermark = sqlx::query_as::<_, ReadWatermark>(
            r#"
            INSERT INTO conversation_reads (conversation_id, user_id, last_read_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (conversation_id, user_id) DO UPDATE SET last_read_at = NOW()
            RETURNING conversation_id, user_id, last_read_at
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(watermark)
    }

    /// The stored watermark, if the participant has one.
    pub async fn get(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let watermark = sqlx::query_as::<_, ReadWatermark>(
            "SELECT conversation_id, user_id, last_read_at FROM conversation_reads \
             WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(watermark)
    }

    /// Messages newer than the watermark from other senders. A missing
    /// watermark counts everything from other senders.
    pub async fn unread_count(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages m
            WHERE m.conversation_id = $1
              AND m.sender_id <> $2
              AND m.created_at > COALESCE(
                  (SELECT r.last_read_at FROM conversation_reads r
                   WHERE r.conversation_id = $1 AND r.user_id = $2),
                  '-infinity'::timestamptz)
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
