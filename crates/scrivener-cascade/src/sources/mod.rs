//! Correction sources
//!
//! Sources are tried cheapest and most certain first:
//! - [`DictionarySource`]: static replacement table
//! - [`PatternRuleSource`]: mechanical regex rules
//! - [`GrammarSource`]: grammar-checker suggestions (remote)
//! - [`LlmSource`]: language-model rewrite (remote)

use async_trait::async_trait;
use scrivener_domain::{CorrectableUnit, SourceId};

use crate::SourceError;

mod dictionary;
mod grammar;
mod llm;
mod patterns;

pub use dictionary::DictionarySource;
pub use grammar::GrammarSource;
pub use llm::LlmSource;
pub use patterns::{PatternRule, PatternRuleSource, PatternRuleSpec};

/// A producer of candidate corrections for a unit
#[async_trait]
pub trait CorrectionSource: Send + Sync {
    /// Which source this is
    fn id(&self) -> SourceId;

    /// Propose candidate corrections for `unit`, best first
    ///
    /// An empty list, or candidates equal to the unit text, mean the source
    /// has nothing to change.
    async fn propose(&self, unit: &CorrectableUnit) -> Result<Vec<String>, SourceError>;
}
