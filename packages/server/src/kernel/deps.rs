//! Server dependencies passed to domain activities.
//!
//! All core operations are local-store bound, so the container is just the
//! database pool. External collaborators (auth, blob storage) never enter
//! the core; they hand in plain values (actor ids, URLs).

use sqlx::PgPool;

/// Dependencies accessible to domain activities.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}
