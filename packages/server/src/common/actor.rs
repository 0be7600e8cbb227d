//! Request-scoped actor identity.
//!
//! Authentication itself is an external collaborator; the request layer hands
//! the core an already-authenticated identity per call.

use super::entity_ids::UserId;
use super::error::CoreError;

/// The acting identity for a single operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Actor {
    /// The authenticated user's ID, if any.
    pub user_id: Option<UserId>,
}

impl Actor {
    /// Create an actor for an authenticated user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Create an actor for an unauthenticated/anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Check if the actor is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Require an authenticated user, returning their ID.
    pub fn require_user(&self) -> Result<UserId, CoreError> {
        self.user_id
            .ok_or(CoreError::Forbidden("authentication required"))
    }
}
