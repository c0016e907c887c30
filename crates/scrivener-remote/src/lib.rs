//! Scrivener Remote Services
//!
//! Remote correction services and the rate-limited client that wraps them.
//!
//! # Architecture
//!
//! - [`RateLimitedClient`]: one shared abstraction for concurrency limits,
//!   call spacing, per-call timeouts and retry with exponential backoff
//! - [`LlmCorrector`] / [`GrammarChecker`]: async service interfaces
//!
//! # Services
//!
//! - `OllamaCorrector`: local Ollama model rewrite
//! - `LanguageToolChecker`: LanguageTool grammar checking
//! - `MockCorrector` / `MockGrammarChecker`: deterministic mocks for testing

#![warn(missing_docs)]

mod client;
mod config;
mod error;
pub mod languagetool;
mod mock;
pub mod ollama;
mod traits;

pub use client::{ClientStats, RateLimitedClient};
pub use config::RateLimitConfig;
pub use error::RemoteError;
pub use languagetool::LanguageToolChecker;
pub use mock::{MockCorrector, MockGrammarChecker};
pub use ollama::OllamaCorrector;
pub use traits::{GrammarChecker, LlmCorrector};
