//! Cascade error types

use scrivener_remote::RemoteError;
use thiserror::Error;

/// Errors raised by a correction source
///
/// The cascade never propagates these: a failing source is recorded as a
/// zero-quality rejection and the next source is tried.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Remote service failure (after the client's retries)
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Source produced something unusable
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

/// Errors raised while building sources or the cascade
#[derive(Error, Debug)]
pub enum CascadeError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid pattern rule
    #[error("Invalid rule '{name}': {message}")]
    InvalidRule {
        /// Rule name
        name: String,
        /// Regex compiler message
        message: String,
    },

    /// Dictionary file could not be read or parsed
    #[error("Dictionary error: {0}")]
    Dictionary(String),
}
