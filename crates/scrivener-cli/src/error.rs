//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document could not be read or written
    #[error("Document error: {0}")]
    Document(String),

    /// Cascade construction error
    #[error(transparent)]
    Cascade(#[from] scrivener_cascade::CascadeError),

    /// Remote service client error
    #[error(transparent)]
    Remote(#[from] scrivener_remote::RemoteError),

    /// Cache backend error
    #[error(transparent)]
    Cache(#[from] scrivener_cache::CacheError),

    /// Orchestrator error
    #[error(transparent)]
    Orchestrator(#[from] scrivener_orchestrator::OrchestratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
