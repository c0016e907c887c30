//! Cache error types

use thiserror::Error;

/// Errors raised by cache storage backends
///
/// These never reach callers of [`SimilarityCache`](crate::SimilarityCache);
/// the cache logs them and degrades to a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Cache lock poisoned by a panicking holder
    #[error("Cache lock poisoned")]
    LockPoisoned,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
