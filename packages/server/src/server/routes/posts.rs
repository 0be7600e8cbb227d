//! Post routes: feed, authoring, favorites, participation, view counting.

use axum::{
    extract::{Extension, Path, Query},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{CoreError, PostId};
use crate::domains::posts::activities;
use crate::domains::posts::data::{FavoriteStateData, FeedEntryData, PostDetailData};
use crate::domains::posts::models::{FeedFilters, FeedSort, PostCategory, PostStatus};
use crate::server::app::AxumAppState;
use crate::server::routes::{actor_from_headers, session_from_headers, ApiResult};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub open: bool,
    pub sort: Option<String>,
    pub limit: Option<i64>,
}

pub async fn feed_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<FeedEntryData>>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| {
            c.parse::<PostCategory>()
                .map_err(|_| CoreError::validation(format!("unknown category: {c}")))
        })
        .transpose()?;

    let sort = query
        .sort
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<FeedSort>()
                .map_err(|_| CoreError::validation(format!("unknown sort: {s}")))
        })
        .transpose()?
        .unwrap_or_default();

    let filters = FeedFilters {
        text: query.q,
        category,
        tag: query.tag,
        open_only: query.open,
    };

    let entries = activities::feed(&filters, sort, query.limit, &state.server_deps).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: String,
    #[serde(default)]
    pub circle_name: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub detail: String,
    pub event_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostBody {
    fn into_draft(self) -> ApiResult<activities::PostDraft> {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse::<PostStatus>()
                .map_err(|_| CoreError::validation(format!("unknown status: {s}")))?,
            None => PostStatus::Open,
        };
        let category = match self.category.as_deref().filter(|c| !c.is_empty()) {
            Some(c) => c
                .parse::<PostCategory>()
                .map_err(|_| CoreError::validation(format!("unknown category: {c}")))?,
            None => PostCategory::Other,
        };
        Ok(activities::PostDraft {
            title: self.title,
            circle_name: self.circle_name,
            place: self.place,
            detail: self.detail,
            event_at: self.event_at,
            image_url: self.image_url,
            status,
            category,
            tags: self.tags,
        })
    }
}

pub async fn create_post_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    Json(body): Json<PostBody>,
) -> ApiResult<Json<PostDetailData>> {
    let author = actor_from_headers(&headers)?.require_user()?;
    let detail = activities::create_post(author, body.into_draft()?, &state.server_deps).await?;
    Ok(Json(detail))
}

pub async fn update_post_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    headers: HeaderMap,
    Json(body): Json<PostBody>,
) -> ApiResult<Json<PostDetailData>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let detail =
        activities::update_post(actor, post_id, body.into_draft()?, &state.server_deps).await?;
    Ok(Json(detail))
}

pub async fn delete_post_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    activities::delete_post(actor, post_id, &state.server_deps).await?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn favorite_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    headers: HeaderMap,
) -> ApiResult<Json<FavoriteStateData>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let outcome = activities::toggle_favorite(actor, post_id, &state.server_deps).await?;
    Ok(Json(outcome))
}

pub async fn apply_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let actor = actor_from_headers(&headers)?.require_user()?;
    let (participation, created) =
        activities::request_participation(actor, post_id, &state.server_deps).await?;
    Ok(Json(json!({
        "id": participation.id.to_string(),
        "status": participation.status,
        "created": created,
    })))
}

pub async fn view_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let viewer = actor_from_headers(&headers)?.user_id;
    let session_key = session_from_headers(&headers)?;

    // One session records a view at most once per post; the lock scopes the
    // check-then-insert so concurrent requests from the same session cannot
    // both count.
    let mut sessions = state.sessions.lock().await;
    let session = sessions.entry(session_key).or_default();
    let counted = activities::record_view(session, viewer, post_id, &state.server_deps).await?;
    Ok(Json(json!({ "counted": counted })))
}
