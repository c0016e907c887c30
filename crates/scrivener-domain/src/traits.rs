//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates.

use crate::{CorrectableUnit, QualityScore, UnitId};

/// Trait for the document being proofread
///
/// Implemented by the document collaborator (Word files, plain text, ...).
/// The orchestrator calls `list_correctable_units` once per run and
/// `apply_correction` once per accepted outcome.
pub trait DocumentSource {
    /// Error type for document operations
    type Error;

    /// Ordered sequence of units eligible for correction
    fn list_correctable_units(&self) -> Result<Vec<CorrectableUnit>, Self::Error>;

    /// Replace the text of a unit with its accepted correction
    fn apply_correction(&mut self, unit_id: &UnitId, new_text: &str) -> Result<(), Self::Error>;
}

/// Trait for scoring a candidate correction
///
/// Implementations must be pure: no I/O, no state, and the same inputs
/// always produce the same score.
pub trait QualityScorer {
    /// Score `candidate` as a replacement for `original`
    fn score(&self, original: &str, candidate: &str) -> QualityScore;
}
