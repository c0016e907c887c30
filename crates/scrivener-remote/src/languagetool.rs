//! LanguageTool grammar checker
//!
//! Talks to a LanguageTool server (`/v2/check`). LanguageTool reports offsets
//! in UTF-16 code units; they are converted to character offsets here so the
//! rest of the pipeline never deals with encodings.

use async_trait::async_trait;
use scrivener_domain::GrammarMatch;
use serde::Deserialize;
use std::time::Duration;

use crate::{GrammarChecker, RemoteError};

/// Default LanguageTool endpoint (local server)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081";

/// Default HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// LanguageTool HTTP client
pub struct LanguageToolChecker {
    endpoint: String,
    language: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<LtMatch>,
}

#[derive(Deserialize)]
struct LtMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    rule: LtRule,
}

#[derive(Deserialize)]
struct LtReplacement {
    value: String,
}

#[derive(Deserialize)]
struct LtRule {
    id: String,
}

impl LanguageToolChecker {
    /// Create a new checker for the given endpoint and language code (e.g. "en-US")
    pub fn new(endpoint: impl Into<String>, language: impl Into<String>) -> Result<Self, RemoteError> {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            language: language.into(),
            client,
            timeout,
        })
    }

    /// Get the language code
    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Convert a UTF-16 code-unit offset into a character offset of `text`
pub(crate) fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (chars, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return chars;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}

fn parse_matches(text: &str, body: CheckResponse) -> Vec<GrammarMatch> {
    let mut matches: Vec<GrammarMatch> = body
        .matches
        .into_iter()
        .map(|m| {
            let start = utf16_to_char_offset(text, m.offset);
            let end = utf16_to_char_offset(text, m.offset + m.length);
            GrammarMatch {
                offset: start,
                length: end.saturating_sub(start),
                message: m.message,
                rule_id: m.rule.id,
                suggestions: m.replacements.into_iter().map(|r| r.value).collect(),
            }
        })
        .collect();
    matches.sort_by_key(|m| m.offset);
    matches
}

#[async_trait]
impl GrammarChecker for LanguageToolChecker {
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, RemoteError> {
        let url = format!("{}/v2/check", self.endpoint);
        let params = [("text", text), ("language", self.language.as_str())];

        let response = self
            .client
            .post(&url)
            .form(&params)
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
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<CheckResponse>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parse_matches(text, body))
    }
}
