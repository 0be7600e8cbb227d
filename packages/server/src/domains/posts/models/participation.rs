use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ParticipationId, PostId, UserId};

/// Participation - a (post, user) join request, unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participation {
    pub id: ParticipationId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub status: String, // 'pending', 'approved', 'rejected', 'canceled'
    pub created_at: DateTime<Utc>,
}

/// Participation status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Pending,
    Approved,
    Rejected,
    Canceled,
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipationStatus::Pending => write!(f, "pending"),
            ParticipationStatus::Approved => write!(f, "approved"),
            ParticipationStatus::Rejected => write!(f, "rejected"),
            ParticipationStatus::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for ParticipationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ParticipationStatus::Pending),
            "approved" => Ok(ParticipationStatus::Approved),
            "rejected" => Ok(ParticipationStatus::Rejected),
            "canceled" => Ok(ParticipationStatus::Canceled),
            _ => Err(anyhow::anyhow!("Invalid participation status: {}", s)),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Participation {
    /// Get or create the (post, user) request. Returns the row and whether
    /// this call created it. A raced duplicate create lands on the unique
    /// constraint and comes back as the existing row.
    pub async fn get_or_create(
        post_id: PostId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<(Self, bool)> {
        let inserted = sqlx::query_as::<_, Participation>(
            r#"
            INSERT INTO participations (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(participation) = inserted {
            return Ok((participation, true));
        }

        let existing = sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE post_id = $1 AND user_id = $2",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok((existing, false))
    }

    /// Requests for a post, oldest first.
    pub async fn find_by_post(post_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let participations = sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(participations)
    }
}
