//! Error taxonomy for core operations.
//!
//! Duplicate-create races against uniqueness constraints are not represented
//! here: they are resolved internally by falling back to the existing row and
//! never reach the caller.

use thiserror::Error;

/// Errors surfaced by core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced post/channel/user is absent. No side effect occurred.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The actor is not allowed to perform the operation. Refused before
    /// any write.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Input rejected before any write (empty body, missing fields, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for validation failures.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// True when the error is a store uniqueness-constraint violation.
///
/// Find-or-create paths use this to detect a lost race and retry as a lookup.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
