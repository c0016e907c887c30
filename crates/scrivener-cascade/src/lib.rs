//! Scrivener Correction Cascade
//!
//! Applies an ordered list of correction sources to one unit of text. Each
//! source's candidates are scored and gated individually; the cascade stops
//! at the first accepted candidate and never chains a rejected candidate
//! into a later source.
//!
//! # Pipeline per unit
//!
//! 1. Blank units return unchanged without touching any source
//! 2. The similarity cache is consulted once
//! 3. Sources run in priority order: dictionary, pattern rules, grammar
//!    checker, LLM
//! 4. A failing source is a zero-quality rejection, never an error
//!
//! Remote sources ([`GrammarSource`], [`LlmSource`]) go through a shared
//! [`RateLimitedClient`](scrivener_remote::RateLimitedClient).

#![warn(missing_docs)]

mod cascade;
mod config;
mod error;
pub mod sources;

pub use cascade::{CorrectionCascade, SharedScorer};
pub use config::CascadeConfig;
pub use error::{CascadeError, SourceError};
pub use sources::{
    CorrectionSource, DictionarySource, GrammarSource, LlmSource, PatternRule, PatternRuleSource,
    PatternRuleSpec,
};
