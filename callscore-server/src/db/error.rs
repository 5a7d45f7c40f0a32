//! Database error type

use callscore_core::CoreError;

use crate::workspace::WorkspaceError;

/// Failure anywhere between credential lookup and row decoding
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("database instance '{instance}' has no read-write endpoint")]
    NoEndpoint { instance: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("connection unavailable")]
    Unavailable,
}
