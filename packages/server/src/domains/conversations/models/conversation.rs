use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::error::is_unique_violation;
use crate::common::{ConversationId, PostId, UserId};

/// Conversation - a DM or group messaging channel.
///
/// Direct (non-group) channels carry a `pair_key`: the sorted participant
/// pair plus the optional context post id. A partial unique index on that
/// key guarantees at most one direct channel per (pair, context); channels
/// are never deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub is_group: bool,
    pub post_id: Option<PostId>,
    pub pair_key: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Listing cap for a user's conversations.
pub const CONVERSATION_LIST_LIMIT: i64 = 50;

/// Identity key for a direct channel: sorted participant pair, optionally
/// scoped by a context post. Unscoped and scoped channels never collapse
/// into each other because the key differs.
pub fn direct_pair_key(a: UserId, b: UserId, context_post: Option<PostId>) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    match context_post {
        Some(post_id) => format!("{lo}:{hi}:{post_id}"),
        None => format!("{lo}:{hi}"),
    }
}

/// Display title for a channel: the stored title when present, otherwise
/// the other participants' names.
pub fn conversation_title(title: &str, is_group: bool, others: &[String]) -> String {
    if !title.is_empty() {
        return title.to_string();
    }
    if is_group {
        if others.is_empty() {
            "Group".to_string()
        } else {
            others.join(" / ")
        }
    } else {
        others.first().cloned().unwrap_or_else(|| "DM".to_string())
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Conversation {
    /// Find conversation by ID
    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> Result<Option<Self>> {
        let conversation =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(conversation)
    }

    /// Find the direct channel for exactly {a, b} in the given context.
    pub async fn find_direct(
        a: UserId,
        b: UserId,
        context_post: Option<PostId>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE is_group = FALSE AND pair_key = $1",
        )
        .bind(direct_pair_key(a, b, context_post))
        .fetch_optional(pool)
        .await?;
        Ok(conversation)
    }

    /// Find or create the direct channel for {a, b} in the given context.
    ///
    /// Returns the channel and whether this call created it. Two
    /// simultaneous resolutions race on the pair-key unique index; the
    /// loser retries as a lookup, so exactly one channel ever exists.
    pub async fn find_or_create_direct(
        a: UserId,
        b: UserId,
        context_post: Option<PostId>,
        pool: &PgPool,
    ) -> Result<(Self, bool)> {
        if let Some(existing) = Self::find_direct(a, b, context_post, pool).await? {
            return Ok((existing, false));
        }

        match Self::insert_direct(a, b, context_post, pool).await {
            Ok(created) => Ok((created, true)),
            Err(e) if is_unique_violation(&e) => {
                let existing = sqlx::query_as::<_, Conversation>(
                    "SELECT * FROM conversations WHERE is_group = FALSE AND pair_key = $1",
                )
                .bind(direct_pair_key(a, b, context_post))
                .fetch_one(pool)
                .await?;
                Ok((existing, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a direct channel and its two participant rows atomically.
    async fn insert_direct(
        a: UserId,
        b: UserId,
        context_post: Option<PostId>,
        pool: &PgPool,
    ) -> std::result::Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (is_group, post_id, pair_key)
            VALUES (FALSE, $1, $2)
            RETURNING *
            "#,
        )
        .bind(context_post)
        .bind(direct_pair_key(a, b, context_post))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO conversation_participants (conversation_id, user_id) VALUES ($1, $2), ($1, $3)",
        )
        .bind(conversation.id)
        .bind(a)
        .bind(b)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(conversation)
    }

    /// Whether the user belongs to the channel.
    pub async fn is_participant(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM conversation_participants \
             WHERE conversation_id = $1 AND user_id = $2)",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// All participant ids for a channel.
    pub async fn participant_ids(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM conversation_participants WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }

    /// Visible names of the other participants (for title fallback).
    pub async fn other_participant_names(
        conversation_id: ConversationId,
        me: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT COALESCE(NULLIF(u.display_name, ''), u.username)
            FROM conversation_participants cp
            INNER JOIN users u ON u.id = cp.user_id
            WHERE cp.conversation_id = $1 AND cp.user_id <> $2
            ORDER BY u.username
            LIMIT $3
            "#,
        )
        .bind(conversation_id)
        .bind(me)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(names)
    }

    /// Bump the channel's activity timestamp.
    pub async fn touch_updated_at(id: ConversationId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// A user's channels, most recently active first.
    pub async fn find_for_user(user_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.*
            FROM conversations c
            INNER JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.user_id = $1
            ORDER BY c.updated_at DESC, c.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(conversations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(direct_pair_key(a, b, None), direct_pair_key(b, a, None));
    }

    #[test]
    fn pair_key_distinguishes_contexts() {
        let a = UserId::new();
        let b = UserId::new();
        let post = PostId::new();
        let unscoped = direct_pair_key(a, b, None);
        let scoped = direct_pair_key(a, b, Some(post));
        assert_ne!(unscoped, scoped);
        assert!(scoped.starts_with(&unscoped));
    }

    #[test]
    fn pair_key_distinguishes_pairs() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        assert_ne!(direct_pair_key(a, b, None), direct_pair_key(a, c, None));
    }

    #[test]
    fn title_fallback_prefers_stored_title() {
        assert_eq!(
            conversation_title("Tennis circle", false, &["Hana".to_string()]),
            "Tennis circle"
        );
    }

    #[test]
    fn direct_title_falls_back_to_other_name() {
        assert_eq!(
            conversation_title("", false, &["Hana".to_string()]),
            "Hana"
        );
        assert_eq!(conversation_title("", false, &[]), "DM");
    }

    #[test]
    fn group_title_joins_names() {
        let others = vec!["Hana".to_string(), "Ken".to_string()];
        assert_eq!(conversation_title("", true, &others), "Hana / Ken");
        assert_eq!(conversation_title("", true, &[]), "Group");
    }
}
