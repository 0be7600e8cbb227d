//! Integration tests for direct-channel resolution.
//!
//! The interesting property is that resolution is race-safe: any number of
//! concurrent attempts between the same pair lands on exactly one channel.

mod common;

use crate::common::{create_test_post, create_test_user, TestHarness};
use circles_core::common::CoreError;
use circles_core::domains::conversations::activities::resolve_conversation;
use circles_core::domains::conversations::models::ReadWatermark;
use circles_core::domains::notifications::models::Notification;
use circles_core::domains::posts::activities::request_participation;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_resolution_reuses_the_channel(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();

    let (first, created_first) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();
    assert!(created_first);

    // Same pair in the other direction resolves to the same channel.
    let (second, created_second) = resolve_conversation(b, a, None, None, &ctx.deps)
        .await
        .unwrap();
    assert!(!created_second);
    assert_eq!(first.id, second.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_resolution_creates_exactly_one_channel(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();

    let attempts = (0..8).map(|i| {
        let deps = ctx.deps.clone();
        // Alternate direction to exercise the pair-key normalization too.
        let (x, y) = if i % 2 == 0 { (a, b) } else { (b, a) };
        async move { resolve_conversation(x, y, None, None, &deps).await }
    });
    let results = futures::future::join_all(attempts).await;

    let mut ids = Vec::new();
    let mut created_count = 0;
    for result in results {
        let (conversation, created) = result.unwrap();
        ids.push(conversation.id);
        if created {
            created_count += 1;
        }
    }

    assert_eq!(created_count, 1, "exactly one attempt should create");
    assert!(ids.iter().all(|id| *id == ids[0]));

    let row_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversations")
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(row_count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn context_scoped_channel_is_distinct_from_unscoped(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let post_id = create_test_post(&ctx.db_pool, a, "Tennis meetup").await.unwrap();

    let (unscoped, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();
    let (scoped, created) = resolve_conversation(a, b, Some(post_id), None, &ctx.deps)
        .await
        .unwrap();
    assert!(created);
    assert_ne!(unscoped.id, scoped.id);

    // Same context resolves back to the scoped channel.
    let (again, created_again) = resolve_conversation(b, a, Some(post_id), None, &ctx.deps)
        .await
        .unwrap();
    assert!(!created_again);
    assert_eq!(scoped.id, again.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn self_conversation_is_rejected(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();

    let result = resolve_conversation(a, a, None, None, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_user_or_post_is_not_found(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let ghost = circles_core::common::UserId::new();

    let result = resolve_conversation(a, ghost, None, None, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::NotFound("user"))));

    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let ghost_post = circles_core::common::PostId::new();
    let result = resolve_conversation(a, b, Some(ghost_post), None, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::NotFound("post"))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn participation_opens_channel_with_greeting_and_notifies_author(ctx: &TestHarness) {
    let author = create_test_user(&ctx.db_pool, "author").await.unwrap();
    let applicant = create_test_user(&ctx.db_pool, "applicant").await.unwrap();
    let post_id = create_test_post(&ctx.db_pool, author, "Band practice")
        .await
        .unwrap();

    let (participation, created) = request_participation(applicant, post_id, &ctx.deps)
        .await
        .unwrap();
    assert!(created);
    assert_eq!(participation.status, "pending");

    // One channel, holding the seeded greeting.
    let (conversation, created_again) =
        resolve_conversation(applicant, author, None, None, &ctx.deps)
            .await
            .unwrap();
    assert!(!created_again);
    let message_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
            .bind(conversation.id)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(message_count, 1);

    // The greeting is unread for the author only.
    assert_eq!(
        ReadWatermark::unread_count(conversation.id, author, &ctx.db_pool)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        ReadWatermark::unread_count(conversation.id, applicant, &ctx.db_pool)
            .await
            .unwrap(),
        0
    );

    // Exactly one participation notification for the author.
    let notifications = Notification::find_recent(author, 100, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "participation");

    // A second request is a no-op: no new channel, message or notification.
    let (_, created_repeat) = request_participation(applicant, post_id, &ctx.deps)
        .await
        .unwrap();
    assert!(!created_repeat);
    let notifications = Notification::find_recent(author, 100, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
}
