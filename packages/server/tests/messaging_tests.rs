//! Integration tests for messaging: watermarks, unread counts, fan-out,
//! and participant checks.

mod common;

use crate::common::{create_test_user, TestHarness};
use circles_core::common::{ConversationId, CoreError, UserId};
use circles_core::domains::conversations::activities::{
    list_conversations, open_thread, resolve_conversation, send_message,
};
use circles_core::domains::conversations::models::ReadWatermark;
use circles_core::domains::notifications::models::Notification;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn unread_counts_track_the_watermark(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let (conversation, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();

    // Nothing sent yet: both sides read.
    assert_eq!(unread(conversation.id, a, ctx).await, 0);
    assert_eq!(unread(conversation.id, b, ctx).await, 0);

    send_message(a, conversation.id, "first", &ctx.deps)
        .await
        .unwrap();
    send_message(a, conversation.id, "second", &ctx.deps)
        .await
        .unwrap();

    // The sender's own messages never count as unread for them.
    assert_eq!(unread(conversation.id, a, ctx).await, 0);
    assert_eq!(unread(conversation.id, b, ctx).await, 2);

    // Opening the thread moves the watermark.
    let thread = open_thread(b, conversation.id, &ctx.deps).await.unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(unread(conversation.id, b, ctx).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn group_send_notifies_every_other_participant(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let c = create_test_user(&ctx.db_pool, "carol").await.unwrap();
    let conversation_id = create_group(&[a, b, c], ctx).await;

    send_message(a, conversation_id, "hello all", &ctx.deps)
        .await
        .unwrap();

    // Two recipients, one row each, none for the sender.
    for (user, expected) in [(a, 0), (b, 1), (c, 1)] {
        let notifications = Notification::find_recent(user, 100, &ctx.db_pool)
            .await
            .unwrap();
        assert_eq!(notifications.len(), expected);
    }
    let received = Notification::find_recent(b, 100, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(received[0].kind, "message");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn non_participants_are_shut_out(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let outsider = create_test_user(&ctx.db_pool, "mallory").await.unwrap();
    let (conversation, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();

    let result = open_thread(outsider, conversation.id, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Forbidden(_))));

    let result = send_message(outsider, conversation.id, "let me in", &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Forbidden(_))));

    // No message row leaked through.
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
            .bind(conversation.id)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_message_bodies_are_rejected(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let (conversation, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();

    for body in ["", "   ", "\n\t"] {
        let result = send_message(a, conversation.id, body, &ctx.deps).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn sending_bumps_the_channel_in_the_listing(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let c = create_test_user(&ctx.db_pool, "carol").await.unwrap();

    let (with_b, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();
    let (with_c, _) = resolve_conversation(a, c, None, None, &ctx.deps)
        .await
        .unwrap();

    // Activity in the older channel moves it back to the top.
    send_message(b, with_b.id, "ping", &ctx.deps).await.unwrap();

    let summaries = list_conversations(a, &ctx.deps).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, with_b.id.to_string());
    assert_eq!(summaries[0].last_message, "ping");
    assert_eq!(summaries[0].unread_count, 1);
    assert_eq!(summaries[1].id, with_c.id.to_string());
    assert_eq!(summaries[1].unread_count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn thread_titles_fall_back_to_the_other_side(ctx: &TestHarness) {
    let a = create_test_user(&ctx.db_pool, "alice").await.unwrap();
    let b = create_test_user(&ctx.db_pool, "bob").await.unwrap();
    let (conversation, _) = resolve_conversation(a, b, None, None, &ctx.deps)
        .await
        .unwrap();

    let thread = open_thread(a, conversation.id, &ctx.deps).await.unwrap();
    assert_eq!(thread.title, "bob");
}

async fn unread(conversation_id: ConversationId, user: UserId, ctx: &TestHarness) -> i64 {
    ReadWatermark::unread_count(conversation_id, user, &ctx.db_pool)
        .await
        .unwrap()
}

/// Insert a group channel directly; resolution only builds direct ones.
async fn create_group(members: &[UserId], ctx: &TestHarness) -> ConversationId {
    let conversation_id: ConversationId = sqlx::query_scalar(
        "INSERT INTO conversations (title, is_group) VALUES ('Study group', TRUE) RETURNING id",
    )
    .fetch_one(&ctx.db_pool)
    .await
    .unwrap();
    for member in members {
        sqlx::query("INSERT INTO conversation_participants (conversation_id, user_id) VALUES ($1, $2)")
            .bind(conversation_id)
            .bind(*member)
            .execute(&ctx.db_pool)
            .await
            .unwrap();
    }
    conversation_id
}
