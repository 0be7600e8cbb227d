// Common types and utilities shared across the application

pub mod actor;
pub mod entity_ids;
pub mod error;
pub mod id;

pub use actor::Actor;
pub use entity_ids::*;
pub use error::{CoreError, CoreResult};
pub use id::{Id, V4, V7};
