//! Error types for taskboard.
//!
//! Validation and lookup failures are typed so callers can decide whether to
//! report them (CLI) or swallow them (TUI, where an empty title simply keeps
//! the form open and a missing id is a no-op).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user '{0}' has a read-only role")]
    ReadOnlyUser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
