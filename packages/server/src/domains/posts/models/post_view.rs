use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{PostId, PostViewId, UserId};

/// PostView - one counted sighting of a post. Appended at most once per
/// (post, session); the session-side dedup lives in `SessionViews`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostView {
    pub id: PostViewId,
    pub post_id: PostId,
    pub user_id: Option<UserId>,
    pub viewed_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl PostView {
    /// Append a view record.
    pub async fn create(post_id: PostId, user_id: Option<UserId>, pool: &PgPool) -> Result<Self> {
        let view = sqlx::query_as::<_, PostView>(
            r#"
            INSERT INTO post_views (post_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(view)
    }

    /// Live view count for a post.
    pub async fn count_for_post(post_id: PostId, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_views WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
