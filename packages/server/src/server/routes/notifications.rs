//! Notification routes: listing and read-state.

use axum::{extract::Extension, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::domains::notifications::activities;
use crate::domains::notifications::data::NotificationFeedData;
use crate::server::app::AxumAppState;
use crate::server::routes::{actor_from_headers, ApiResult};

pub async fn list_notifications_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
) -> ApiResult<Json<NotificationFeedData>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let feed = activities::list_notifications(actor, &state.server_deps).await?;
    Ok(Json(feed))
}

pub async fn mark_read_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let flipped = activities::mark_all_read(actor, &state.server_deps).await?;
    Ok(Json(json!({ "marked": flipped })))
}
