//! Thread activities: listing, opening (which marks read), sending.

use tracing::debug;

use crate::common::{ConversationId, CoreError, CoreResult, UserId};
use crate::domains::conversations::data::{ConversationSummaryData, MessageEntryData, ThreadData};
use crate::domains::conversations::models::{
    conversation_title, Conversation, Message, ReadWatermark, CONVERSATION_LIST_LIMIT,
    THREAD_MESSAGE_LIMIT,
};
use crate::domains::notifications::activities as notifications;
use crate::domains::notifications::models::NotificationKind;
use crate::kernel::ServerDeps;

/// A user's conversations, most recently active first, with live unread
/// counts. Listing does not move any watermark.
pub async fn list_conversations(
    user_id: UserId,
    deps: &ServerDeps,
) -> CoreResult<Vec<ConversationSummaryData>> {
    let conversations =
        Conversation::find_for_user(user_id, CONVERSATION_LIST_LIMIT, &deps.db_pool).await?;

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let others =
            Conversation::other_participant_names(conversation.id, user_id, 3, &deps.db_pool)
                .await?;
        let last_message = Message::last_in_conversation(conversation.id, &deps.db_pool)
            .await?
            .map(|m| m.body)
            .unwrap_or_default();
        let unread_count =
            ReadWatermark::unread_count(conversation.id, user_id, &deps.db_pool).await?;

        summaries.push(ConversationSummaryData {
            id: conversation.id.to_string(),
            title: conversation_title(&conversation.title, conversation.is_group, &others),
            last_message,
            unread_count,
        });
    }
    Ok(summaries)
}

/// Open a thread: touches the caller's watermark, then returns the
/// messages oldest first.
pub async fn open_thread(
    actor: UserId,
    conversation_id: ConversationId,
    deps: &ServerDeps,
) -> CoreResult<ThreadData> {
    let conversation = Conversation::find_by_id(conversation_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("conversation"))?;

    if !Conversation::is_participant(conversation_id, actor, &deps.db_pool).await? {
        return Err(CoreError::Forbidden("not a channel participant"));
    }

    ReadWatermark::touch(conversation_id, actor, &deps.db_pool).await?;

    let messages = Message::find_thread(conversation_id, THREAD_MESSAGE_LIMIT, &deps.db_pool)
        .await?
        .iter()
        .map(|m| MessageEntryData::from_message(m, actor))
        .collect();

    let others =
        Conversation::other_participant_names(conversation_id, actor, 3, &deps.db_pool).await?;

    Ok(ThreadData {
        id: conversation.id.to_string(),
        title: conversation_title(&conversation.title, conversation.is_group, &others),
        messages,
    })
}

/// Send a message into a channel.
///
/// The sender's watermark moves (sending implies caught up), the channel's
/// activity timestamp bumps, and every other participant gets a
/// notification.
pub async fn send_message(
    actor: UserId,
    conversation_id: ConversationId,
    body: &str,
    deps: &ServerDeps,
) -> CoreResult<MessageEntryData> {
    let body = body.trim();
    if body.is_empty() {
        return Err(CoreError::validation("message body must not be empty"));
    }

    Conversation::find_by_id(conversation_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("conversation"))?;

    if !Conversation::is_participant(conversation_id, actor, &deps.db_pool).await? {
        return Err(CoreError::Forbidden("not a channel participant"));
    }

    let message = Message::create(conversation_id, actor, body, &deps.db_pool).await?;
    ReadWatermark::touch(conversation_id, actor, &deps.db_pool).await?;
    Conversation::touch_updated_at(conversation_id, &deps.db_pool).await?;

    let participants = Conversation::participant_ids(conversation_id, &deps.db_pool).await?;
    notifications::emit(
        &participants,
        actor,
        NotificationKind::Message,
        "New message received",
        "/?tab=messages",
        deps,
    )
    .await?;

    debug!(%conversation_id, message_id = %message.id, "message sent");

    let sender_name = crate::domains::users::models::User::find_by_id(actor, &deps.db_pool)
        .await?
        .map(|u| u.visible_name().to_string())
        .unwrap_or_default();

    Ok(MessageEntryData {
        id: message.id.to_string(),
        body: message.body,
        created_at: message.created_at.to_rfc3339(),
        sender_name,
        is_me: true,
    })
}
