use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{FavoriteId, PostId, UserId};

/// Favorite - a (viewer, post) edge, unique per pair.
///
/// The unique constraint is what makes toggling symmetric: absent → create,
/// present → delete. A create that loses a race degrades to "already exists".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Favorite {
    /// Insert the edge if absent. Returns true when this call created it.
    pub async fn insert_if_absent(user_id: UserId, post_id: PostId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Remove the edge. Returns true when a row was deleted.
    pub async fn remove(user_id: UserId, post_id: PostId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Whether the edge exists.
    pub async fn exists(user_id: UserId, post_id: PostId, pool: &PgPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Live favorite count for a post.
    pub async fn count_for_post(post_id: PostId, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM favorites WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
