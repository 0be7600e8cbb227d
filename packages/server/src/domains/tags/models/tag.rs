use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{PostId, TagId};

/// Tag - a free-form label attached to posts, unique by name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Helper struct for batch-loading tags with their associated post ID.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagWithPostId {
    pub post_id: PostId,
    #[sqlx(flatten)]
    pub tag: Tag,
}

// =============================================================================
// Tag Queries
// =============================================================================

impl Tag {
    /// Get or create a tag by name.
    ///
    /// Concurrent creates for the same name collapse onto the unique
    /// constraint; the DO UPDATE arm makes the winning row come back either
    /// way.
    pub async fn get_or_create(name: &str, pool: &PgPool) -> Result<Self> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(tag)
    }

    /// Attach a tag to a post. Idempotent.
    pub async fn attach_to_post(tag_id: TagId, post_id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove every tag from a post (used when an edit replaces the set).
    pub async fn detach_all_from_post(post_id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Batch-load tags for multiple posts (one query per feed page).
    pub async fn find_for_post_ids(post_ids: &[PostId], pool: &PgPool) -> Result<Vec<TagWithPostId>> {
        let tags = sqlx::query_as::<_, TagWithPostId>(
            r#"
            SELECT pt.post_id, t.*
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(post_ids)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// Tag names for a single post, alphabetical.
    pub async fn names_for_post(post_id: PostId, pool: &PgPool) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(names)
    }
}
