//! LLM rewrite source

use async_trait::async_trait;
use scrivener_domain::{CorrectableUnit, SourceId};
use scrivener_remote::{LlmCorrector, RateLimitedClient};
use std::sync::Arc;

use crate::sources::CorrectionSource;
use crate::SourceError;

/// Asks a language model to rewrite the unit
pub struct LlmSource {
    corrector: Arc<dyn LlmCorrector>,
    client: Arc<RateLimitedClient>,
    send_context: bool,
}

impl LlmSource {
    /// Create a source calling `corrector` through `client`
    pub fn new(corrector: Arc<dyn LlmCorrector>, client: Arc<RateLimitedClient>) -> Self {
        Self {
            corrector,
            client,
            send_context: true,
        }
    }

    /// Whether to pass the unit's section name as context
    pub fn with_context(mut self, send_context: bool) -> Self {
        self.send_context = send_context;
        self
    }
}

#[async_trait]
impl CorrectionSource for LlmSource {
    fn id(&self) -> SourceId {
        SourceId::Llm
    }

    async fn propose(&self, unit: &CorrectableUnit) -> Result<Vec<String>, SourceError> {
        let text = unit.text();
        let context = if self.send_context {
            Some(unit.id().section.as_str())
        } else {
            None
        };

        let response = self
            .client
            .invoke(|| self.corrector.correct(text, context))
            .await?;

        if response.trim().is_empty() {
            return Err(SourceError::InvalidCandidate(
                "model returned an empty response".to_string(),
            ));
        }
        Ok(vec![response])
    }
}
