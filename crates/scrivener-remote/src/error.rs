//! Remote call error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling a remote correction service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Rate limit exceeded (HTTP 429 or equivalent)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The call did not complete within the per-call timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Every allowed attempt failed with a retryable error
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last: Box<RemoteError>,
    },

    /// Generic error
    #[error("Remote error: {0}")]
    Other(String),
}

impl RemoteError {
    /// Whether the call may succeed if retried after a delay
    ///
    /// Only rate-limit and timeout failures are retried; everything else fails fast.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::RateLimitExceeded | RemoteError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(RemoteError::RateLimitExceeded.is_retryable());
        assert!(RemoteError::Timeout(Duration::from_secs(45)).is_retryable());
        assert!(!RemoteError::Communication("refused".to_string()).is_retryable());
        assert!(!RemoteError::InvalidResponse("bad json".to_string()).is_retryable());
        assert!(!RemoteError::ModelNotAvailable("llama2".to_string()).is_retryable());
    }

    #[test]
    fn test_retries_exhausted_message() {
        let err = RemoteError::RetriesExhausted {
            attempts: 3,
            last: Box::new(RemoteError::Timeout(Duration::from_secs(45))),
        };
        assert_eq!(
            err.to_string(),
            "Retries exhausted after 3 attempts: Request timed out after 45s"
        );
        assert!(!err.is_retryable());
    }
}
