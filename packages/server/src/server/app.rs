//! Application setup and server configuration.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::posts::activities::SessionViews;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    apply_handler, create_post_handler, delete_post_handler, favorite_handler, feed_handler,
    health_handler, list_conversations_handler, list_notifications_handler, mark_read_handler,
    open_thread_handler, resolve_conversation_handler, send_message_handler, update_post_handler,
    view_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
    /// Per-session view-dedup state, keyed by the caller's session id.
    pub sessions: Arc<Mutex<HashMap<String, SessionViews>>>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(ServerDeps::new(pool)),
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/posts", post(create_post_handler))
        .route(
            "/api/posts/:id",
            put(update_post_handler).delete(delete_post_handler),
        )
        .route("/api/posts/:id/favorite", post(favorite_handler))
        .route("/api/posts/:id/apply", post(apply_handler))
        .route("/api/posts/:id/view", post(view_handler))
        .route(
            "/api/conversations",
            get(list_conversations_handler).post(resolve_conversation_handler),
        )
        .route(
            "/api/conversations/:id/messages",
            get(open_thread_handler).post(send_message_handler),
        )
        .route("/api/notifications", get(list_notifications_handler))
        .route("/api/notifications/read_all", post(mark_read_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
