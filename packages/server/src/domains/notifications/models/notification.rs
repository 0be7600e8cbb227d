use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{NotificationId, UserId};

/// Notification - append-only per-recipient event record.
///
/// Repeated triggers produce repeated rows; there is no coalescing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: String, // 'favorite', 'participation', 'message'
    pub text: String,
    pub url: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Favorite,
    Participation,
    Message,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Favorite => write!(f, "favorite"),
            NotificationKind::Participation => write!(f, "participation"),
            NotificationKind::Message => write!(f, "message"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "favorite" => Ok(NotificationKind::Favorite),
            "participation" => Ok(NotificationKind::Participation),
            "message" => Ok(NotificationKind::Message),
            _ => Err(anyhow::anyhow!("Invalid notification kind: {}", s)),
        }
    }
}

/// Listing cap for the notification feed.
pub const NOTIFICATION_LIST_LIMIT: i64 = 100;

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Notification {
    /// Append one notification row.
    pub async fn create(
        user_id: UserId,
        kind: NotificationKind,
        text: &str,
        url: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, text, url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(text)
        .bind(url)
        .fetch_one(pool)
        .await?;
        Ok(notification)
    }

    /// Recent notifications for a user, newest first.
    pub async fn find_recent(user_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(notifications)
    }

    /// Live unread count; never cached.
    pub async fn unread_count(user_id: UserId, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Flip every unread notification for the user. Returns rows flipped.
    pub async fn mark_all_read(user_id: UserId, pool: &PgPool) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        for k in ["favorite", "participation", "message"] {
            assert_eq!(k.parse::<NotificationKind>().unwrap().to_string(), k);
        }
        assert!("poke".parse::<NotificationKind>().is_err());
    }
}
