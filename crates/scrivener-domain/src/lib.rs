//! Scrivener Domain Layer
//!
//! This crate contains the core value types and trait interfaces shared by every
//! stage of the proofreading pipeline. It has no runtime dependencies; the
//! infrastructure (scoring heuristics, caches, remote services) lives in other
//! crates and depends on this one.
//!
//! ## Key Concepts
//!
//! - **CorrectableUnit**: one addressable span of document text, read-only once produced
//! - **QualityScore**: four sub-scores, a weighted overall score and a confidence class
//! - **CorrectionOutcome**: what happened to one unit after the cascade ran
//! - **SourceId**: which correction source produced a candidate
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure value types only
//! - Trait definitions for the document collaborator and the scorer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod grammar;
pub mod outcome;
pub mod quality;
pub mod source;
pub mod traits;
pub mod unit;

// Re-exports for convenience
pub use grammar::GrammarMatch;
pub use outcome::{CorrectionOutcome, OutcomeStatus};
pub use quality::{ConfidenceClass, QualityScore, SubScores};
pub use source::SourceId;
pub use unit::{CorrectableUnit, UnitId};
