//! Typed ID definitions for all domain entities.
//!
//! Type aliases for each domain entity, providing compile-time type safety
//! for ID usage throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Post entities (circle event/recruitment posts).
pub struct Post;

/// Marker type for Tag entities.
pub struct Tag;

/// Marker type for Favorite edges ((user, post) pairs).
pub struct Favorite;

/// Marker type for Participation requests.
pub struct Participation;

/// Marker type for Conversation entities (DM/group channels).
pub struct Conversation;

/// Marker type for Message entities.
pub struct Message;

/// Marker type for Notification entities.
pub struct Notification;

/// Marker type for PostView records.
pub struct PostView;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Post entities.
pub type PostId = Id<Post>;

/// Typed ID for Tag entities.
pub type TagId = Id<Tag>;

/// Typed ID for Favorite edges.
pub type FavoriteId = Id<Favorite>;

/// Typed ID for Participation requests.
pub type ParticipationId = Id<Participation>;

/// Typed ID for Conversation entities.
pub type ConversationId = Id<Conversation>;

/// Typed ID for Message entities.
pub type MessageId = Id<Message>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;

/// Typed ID for PostView records.
pub type PostViewId = Id<PostView>;
