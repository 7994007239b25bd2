//! Error types for content extraction.

use thiserror::Error;

/// Errors that can occur while extracting content from a file.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The extension is on the hard reject list
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// Underlying read failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet library rejected the file
    #[error("spreadsheet parsing failed: {0}")]
    Spreadsheet(String),

    /// The PDF library rejected the file
    #[error("PDF parsing failed: {0}")]
    Pdf(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
