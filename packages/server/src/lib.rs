// Campus Circle Board - API Core
//
// This crate maintains the derived relationships over shared social data:
// direct-message channel resolution, read watermarks and unread counts,
// notification fan-out, the ranked/filterable feed, and per-session view
// dedup. Authentication, media storage, and page rendering live elsewhere.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::Config;
