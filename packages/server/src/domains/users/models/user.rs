use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// User - an account with its profile/circle fields flattened in.
///
/// Account creation and authentication live outside the core; this row
/// exists so messages carry sender names and posts a default circle name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub circle_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The name shown next to messages: display name, falling back to
    /// the username.
    pub fn visible_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Find user by ID
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Create a new user
    pub async fn create(
        username: &str,
        display_name: &str,
        circle_name: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, display_name, circle_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(display_name)
        .bind(circle_name)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: &str) -> User {
        User {
            id: UserId::new(),
            username: "taro".to_string(),
            display_name: display_name.to_string(),
            circle_name: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn visible_name_prefers_display_name() {
        assert_eq!(user("Taro Y.").visible_name(), "Taro Y.");
    }

    #[test]
    fn visible_name_falls_back_to_username() {
        assert_eq!(user("").visible_name(), "taro");
    }
}
