//! Store error types.

use thiserror::Error;

/// Artifact store and authorization errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidName(#[from] depot_core::Error),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("access list unreadable for project {project}: {source}")]
    ListUnreadable {
        project: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
