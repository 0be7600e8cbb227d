use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::common::{PostId, UserId};

/// Post - a circle recruitment/event post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub circle_name: String,
    pub place: String,
    pub detail: String,
    pub event_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub status: String, // 'open', 'closed' (stored value only)
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Stored post status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Open,
    Closed,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Open => write!(f, "open"),
            PostStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(PostStatus::Open),
            "closed" => Ok(PostStatus::Closed),
            _ => Err(anyhow::anyhow!("Invalid post status: {}", s)),
        }
    }
}

/// Post category enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostCategory {
    Sports,
    Music,
    Culture,
    Volunteer,
    It,
    Study,
    Other,
}

impl std::fmt::Display for PostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostCategory::Sports => write!(f, "sports"),
            PostCategory::Music => write!(f, "music"),
            PostCategory::Culture => write!(f, "culture"),
            PostCategory::Volunteer => write!(f, "volunteer"),
            PostCategory::It => write!(f, "it"),
            PostCategory::Study => write!(f, "study"),
            PostCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for PostCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sports" => Ok(PostCategory::Sports),
            "music" => Ok(PostCategory::Music),
            "culture" => Ok(PostCategory::Culture),
            "volunteer" => Ok(PostCategory::Volunteer),
            "it" => Ok(PostCategory::It),
            "study" => Ok(PostCategory::Study),
            "other" => Ok(PostCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid post category: {}", s)),
        }
    }
}

impl Post {
    /// Derived open/closed state: a past event time forces closed no matter
    /// what the stored status says.
    pub fn effective_status(&self, now: DateTime<Utc>) -> PostStatus {
        effective_status(&self.status, self.event_at, now)
    }

    /// True when the post still accepts participation requests.
    pub fn is_effectively_open(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == PostStatus::Open
    }
}

/// Effective status from a stored status string and the event time.
pub fn effective_status(stored: &str, event_at: DateTime<Utc>, now: DateTime<Utc>) -> PostStatus {
    if event_at < now || stored == "closed" {
        PostStatus::Closed
    } else {
        PostStatus::Open
    }
}

// =============================================================================
// Feed query
// =============================================================================

/// Independently toggleable, AND-composed feed filters.
#[derive(Debug, Clone, Default)]
pub struct FeedFilters {
    /// Case-insensitive substring match over title, circle name and place.
    pub text: Option<String>,
    pub category: Option<PostCategory>,
    /// Exact tag-name membership.
    pub tag: Option<String>,
    /// Exclude posts whose event time has passed or whose stored status
    /// is closed.
    pub open_only: bool,
}

/// Feed sort keys. Every ordering ends in `created_at DESC, id DESC` so
/// repeated identical queries return identical orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSort {
    #[default]
    Recent,
    Popular,
    Favorited,
}

impl std::str::FromStr for FeedSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "recent" => Ok(FeedSort::Recent),
            "popular" => Ok(FeedSort::Popular),
            "favorited" => Ok(FeedSort::Favorited),
            _ => Err(anyhow::anyhow!("Invalid feed sort: {}", s)),
        }
    }
}

/// Hard cap on feed page size.
pub const FEED_MAX_LIMIT: i64 = 200;

/// Default feed page size.
pub const FEED_DEFAULT_LIMIT: i64 = 100;

/// A post row annotated with its live favorite/view counts.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedRow {
    #[sqlx(flatten)]
    pub post: Post,
    pub favs_count: i64,
    pub views_count: i64,
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Post {
    /// Find post by ID
    pub async fn find_by_id(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    /// Create a new post
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        author_id: UserId,
        title: &str,
        circle_name: &str,
        place: &str,
        detail: &str,
        event_at: DateTime<Utc>,
        image_url: Option<&str>,
        status: PostStatus,
        category: PostCategory,
        pool: &PgPool,
    ) -> Result<Self> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                author_id, title, circle_name, place, detail,
                event_at, image_url, status, category
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(author_id)
        .bind(title)
        .bind(circle_name)
        .bind(place)
        .bind(detail)
        .bind(event_at)
        .bind(image_url)
        .bind(status.to_string())
        .bind(category.to_string())
        .fetch_one(pool)
        .await?;
        Ok(post)
    }

    /// Update post fields (author check happens in the activity)
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        id: PostId,
        title: &str,
        circle_name: &str,
        place: &str,
        detail: &str,
        event_at: DateTime<Utc>,
        status: PostStatus,
        category: PostCategory,
        pool: &PgPool,
    ) -> Result<Self> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, circle_name = $3, place = $4, detail = $5,
                event_at = $6, status = $7, category = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(circle_name)
        .bind(place)
        .bind(detail)
        .bind(event_at)
        .bind(status.to_string())
        .bind(category.to_string())
        .fetch_one(pool)
        .await?;
        Ok(post)
    }

    /// Delete a post
    pub async fn delete(id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Posts by an author, newest first.
    pub async fn find_by_author(author_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// The feed query: AND-composed filters, one of three sort keys, counts
    /// evaluated as distinct-relation counts in the same statement.
    pub async fn feed(
        filters: &FeedFilters,
        sort: FeedSort,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<FeedRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT p.*, \
             (SELECT COUNT(*) FROM favorites f WHERE f.post_id = p.id) AS favs_count, \
             (SELECT COUNT(*) FROM post_views v WHERE v.post_id = p.id) AS views_count \
             FROM posts p WHERE TRUE",
        );

        if let Some(text) = filters.text.as_deref().filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", escape_like(text.trim()));
            qb.push(" AND (p.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.circle_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.place ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = filters.category {
            qb.push(" AND p.category = ");
            qb.push_bind(category.to_string());
        }

        if let Some(tag) = filters.tag.as_deref().filter(|t| !t.is_empty()) {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt \
                 INNER JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name = ",
            );
            qb.push_bind(tag.to_string());
            qb.push(")");
        }

        if filters.open_only {
            qb.push(" AND p.status = 'open' AND p.event_at >= NOW()");
        }

        qb.push(match sort {
            FeedSort::Recent => " ORDER BY p.event_at DESC, p.created_at DESC, p.id DESC",
            FeedSort::Popular => " ORDER BY views_count DESC, p.created_at DESC, p.id DESC",
            FeedSort::Favorited => " ORDER BY favs_count DESC, p.created_at DESC, p.id DESC",
        });

        qb.push(" LIMIT ");
        qb.push_bind(limit.clamp(1, FEED_MAX_LIMIT));

        let rows = qb.build_query_as::<FeedRow>().fetch_all(pool).await?;
        Ok(rows)
    }
}
