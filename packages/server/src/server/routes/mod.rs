//! JSON route handlers.
//!
//! The request layer stays thin: it extracts the actor and session identity
//! from headers, parses inputs, and delegates to domain activities. The
//! identity headers stand in for the real authentication service, which runs
//! in front of this server.

pub mod conversations;
pub mod health;
pub mod notifications;
pub mod posts;

pub use conversations::{
    list_conversations_handler, open_thread_handler, resolve_conversation_handler,
    send_message_handler,
};
pub use health::health_handler;
pub use notifications::{list_notifications_handler, mark_read_handler};
pub use posts::{
    apply_handler, create_post_handler, delete_post_handler, favorite_handler, feed_handler,
    update_post_handler, view_handler,
};

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::common::{Actor, CoreError};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the opaque session id used for view dedup.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// A core error carried out to HTTP.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::Database(_) | CoreError::Internal(_) => {
                tracing::error!("request failed: {:#}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Store/internal details stay out of the response body.
        let message = match &self.0 {
            CoreError::Database(_) | CoreError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The actor for this request, from the identity header. Absent header
/// means anonymous; a malformed id is rejected.
pub fn actor_from_headers(headers: &HeaderMap) -> ApiResult<Actor> {
    match headers.get(USER_ID_HEADER) {
        None => Ok(Actor::anonymous()),
        Some(value) => {
            let id = value
                .to_str()
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CoreError::validation("malformed user id header"))?;
            Ok(Actor::user(id))
        }
    }
}

/// The caller's session key, required for view counting.
pub fn session_from_headers(headers: &HeaderMap) -> ApiResult<String> {
    let session = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::validation("missing session id header"))?;
    Ok(session.to_string())
}
