//! Errors raised while setting up the scanning pipeline.
//!
//! Per-file failures never surface here; they are recorded on the
//! individual `ScanResult` instead.

use thiserror::Error;

/// Pipeline setup errors.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Classifier client could not be constructed
    #[error("classifier setup failed: {0}")]
    Classifier(#[from] aegis_llm::LlmError),

    /// Finding store could not be used
    #[error("finding store error: {0}")]
    Store(#[from] aegis_db::DatabaseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline setup.
pub type Result<T> = std::result::Result<T, ScanError>;
