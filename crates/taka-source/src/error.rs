//! Error types for record sources

use std::io;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {message}")]
    Unavailable { message: String },

    #[error("Bad cursor: {token}")]
    BadCursor { token: String },

    #[error("Query is missing an owner scope")]
    UnscopedQuery,

    #[error("Record not found: {id}")]
    NotFound { id: Uuid },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("Malformed seed data")]
    Malformed(#[from] serde_yaml::Error),
}

impl SourceError {
    /// Whether retrying the same call may succeed.
    /// Cursor, scope, and query shape errors never heal on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. } | SourceError::Io(_))
    }
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

// ==================== Tests ====================
