//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::{Duration, Utc};
use circles_core::common::{PostId, UserId};
use circles_core::domains::posts::models::{Post, PostCategory, PostStatus};
use circles_core::domains::users::models::User;
use sqlx::PgPool;

/// Create a test user with a unique username.
pub async fn create_test_user(pool: &PgPool, name: &str) -> Result<UserId> {
    let username = format!("{}_{}", name, uuid::Uuid::new_v4().simple());
    let user = User::create(&username, name, "Test Circle", pool).await?;
    Ok(user.id)
}

/// Create an open post with an event a week out.
pub async fn create_test_post(pool: &PgPool, author: UserId, title: &str) -> Result<PostId> {
    let post = Post::create(
        author,
        title,
        "Test Circle",
        "Campus Hall B",
        "Weekly session, beginners welcome.",
        Utc::now() + Duration::days(7),
        None,
        PostStatus::Open,
        PostCategory::Other,
        pool,
    )
    .await?;
    Ok(post.id)
}

/// Create a post whose event time has already passed.
pub async fn create_past_event_post(pool: &PgPool, author: UserId, title: &str) -> Result<PostId> {
    let post = Post::create(
        author,
        title,
        "Test Circle",
        "Campus Hall B",
        "Already happened.",
        Utc::now() - Duration::days(1),
        None,
        PostStatus::Open,
        PostCategory::Other,
        pool,
    )
    .await?;
    Ok(post.id)
}
