//! Error types for the classifier client.

use thiserror::Error;

/// Errors that can occur while talking to the classifier endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Endpoint returned a non-success status
    #[error("classifier returned status {status}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body, if any
        message: String,
    },

    /// Response body could not be interpreted
    #[error("failed to parse classifier response: {message}")]
    ParseError {
        /// Parser error message
        message: String,
    },

    /// Network error (unreachable endpoint, timeout)
    #[error("classifier unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Internal error (client construction)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for classifier operations.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmError::ApiError {
            status: 503,
            message: "model loading".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "classifier returned status 503: model loading"
        );

        let err = LlmError::ParseError {
            message: "expected value".to_string(),
        };
        assert!(err.to_string().contains("expected value"));
    }
}
