//! Error types for document runs

use thiserror::Error;

/// Errors that end a document run
///
/// Per-unit problems never appear here: they are recorded as rejected
/// outcomes in the session.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The document collaborator failed while listing units
    #[error("Document error: {0}")]
    Document(String),

    /// Too few units were corrected
    #[error(
        "Success rate {rate:.3} below threshold {threshold:.2} \
         (processed {processed}, applied {applied}, rejected {rejected})"
    )]
    SuccessRateBelowThreshold {
        /// Units processed
        processed: usize,
        /// Units with an applied correction
        applied: usize,
        /// Units whose candidates were all rejected
        rejected: usize,
        /// Computed success rate
        rate: f64,
        /// Configured minimum
        threshold: f64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (task panicked or was aborted)
    #[error("Worker error: {0}")]
    Worker(String),
}
