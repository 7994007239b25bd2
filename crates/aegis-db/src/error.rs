//! Database errors.

use thiserror::Error;

/// Errors from the finding store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to open or create the database
    #[error("failed to open database: {0}")]
    Open(String),

    /// Migration failed
    #[error("migration failed: {0}")]
    Migration(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Feedback value outside the accepted set
    #[error("invalid feedback value: {0} (expected \"Correct\" or \"Incorrect\")")]
    InvalidFeedback(String),

    /// Record not found
    #[error("record not found")]
    NotFound,
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
