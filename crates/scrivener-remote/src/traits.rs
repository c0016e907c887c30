//! Remote correction service interfaces

use async_trait::async_trait;
use scrivener_domain::GrammarMatch;

use crate::RemoteError;

/// A language model that rewrites text with corrections applied
#[async_trait]
pub trait LlmCorrector: Send + Sync {
    /// Return a corrected version of `text`
    ///
    /// `context` is optional surrounding text (e.g. the section heading) the
    /// model may use to disambiguate; it must never be echoed back.
    async fn correct(&self, text: &str, context: Option<&str>) -> Result<String, RemoteError>;
}

/// A grammar checker that reports problems with suggested replacements
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Check `text` and return the matches found, in text order
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, RemoteError>;
}
