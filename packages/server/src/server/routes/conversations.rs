//! Conversation routes: resolution, listing, thread open, send.

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{ConversationId, PostId, UserId};
use crate::domains::conversations::activities;
use crate::domains::conversations::data::{ConversationSummaryData, MessageEntryData, ThreadData};
use crate::server::app::AxumAppState;
use crate::server::routes::{actor_from_headers, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub other_user_id: UserId,
    pub post_id: Option<PostId>,
    pub greeting: Option<String>,
}

pub async fn resolve_conversation_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    Json(body): Json<ResolveBody>,
) -> ApiResult<Json<Value>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let (conversation, created) = activities::resolve_conversation(
        actor,
        body.other_user_id,
        body.post_id,
        body.greeting.as_deref(),
        &state.server_deps,
    )
    .await?;
    Ok(Json(json!({
        "id": conversation.id.to_string(),
        "created": created,
    })))
}

pub async fn list_conversations_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ConversationSummaryData>>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let summaries = activities::list_conversations(actor, &state.server_deps).await?;
    Ok(Json(summaries))
}

pub async fn open_thread_handler(
    Extension(state): Extension<AxumAppState>,
    Path(conversation_id): Path<ConversationId>,
    headers: HeaderMap,
) -> ApiResult<Json<ThreadData>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let thread = activities::open_thread(actor, conversation_id, &state.server_deps).await?;
    Ok(Json(thread))
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub body: String,
}

pub async fn send_message_handler(
    Extension(state): Extension<AxumAppState>,
    Path(conversation_id): Path<ConversationId>,
    headers: HeaderMap,
    Json(body): Json<SendBody>,
) -> ApiResult<Json<MessageEntryData>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let entry =
        activities::send_message(actor, conversation_id, &body.body, &state.server_deps).await?;
    Ok(Json(entry))
}
