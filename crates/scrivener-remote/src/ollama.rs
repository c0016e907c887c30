//! Ollama corrector
//!
//! Asks a local Ollama model to proofread a span of text. The corrector makes
//! exactly one HTTP call per invocation; spacing, timeouts and retries belong
//! to the [`RateLimitedClient`](crate::RateLimitedClient) that wraps it.
//!
//! # Examples
//!
//! ```no_run
//! use scrivener_remote::OllamaCorrector;
//!
//! let corrector = OllamaCorrector::new("http://localhost:11434", "llama3").unwrap();
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{LlmCorrector, RemoteError};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default HTTP timeout (the rate-limited client usually times out first)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama API corrector
pub struct OllamaCorrector {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
    api_key: Option<String>,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaCorrector {
    /// Create a new Ollama corrector
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama corrector with an explicit HTTP timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            timeout,
            api_key: None,
        })
    }

    /// Send a bearer token with every request (for proxied deployments)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build the proofreading prompt
pub(crate) fn build_prompt(text: &str, context: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a careful proofreader. Correct spelling, grammar and punctuation \
         in the text below. Keep the author's wording, tone and meaning. Do not add \
         or remove content. Reply with the corrected text only, without quotes or \
         commentary.\n\n",
    );
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("Context (do not correct or repeat):\n");
        prompt.push_str(context.trim());
        prompt.push_str("\n\n");
    }
    prompt.push_str("Text:\n");
    prompt.push_str(text);
    prompt
}

/// Strip wrapping the model adds despite instructions
pub(crate) fn clean_response(response: &str) -> String {
    let mut cleaned = response.trim();
    for prefix in ["Corrected text:", "Corrected:", "Text:"] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest.trim_start();
        }
    }
    if cleaned.len() >= 2 {
        for (open, close) in [('"', '"'), ('“', '”'), ('\'', '\'')] {
            if cleaned.starts_with(open) && cleaned.ends_with(close) {
                cleaned = &cleaned[open.len_utf8()..cleaned.len() - close.len_utf8()];
                break;
            }
        }
    }
    cleaned.trim().to_string()
}

#[async_trait]
impl LlmCorrector for OllamaCorrector {
    async fn correct(&self, text: &str, context: Option<&str>) -> Result<String, RemoteError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt: build_prompt(text, context),
            stream: false,
            options: OllamaOptions { temperature: 0.0 },
        };

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.timeout)
                } else {
                    RemoteError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RemoteError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let corrected = clean_response(&body.response);
        if corrected.is_empty() && !text.trim().is_empty() {
            return Err(RemoteError::InvalidResponse("Model returned empty text".to_string()));
        }
        Ok(corrected)
    }
}
