//! Mock remote services for deterministic testing
//!
//! These make no network calls. Responses are configured up front; failures
//! can be scripted for the first N calls to exercise retry and rejection paths.

use async_trait::async_trait;
use scrivener_domain::GrammarMatch;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{GrammarChecker, LlmCorrector, RemoteError};

/// Mock LLM corrector
///
/// # Examples
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use scrivener_remote::{LlmCorrector, MockCorrector};
///
/// let corrector = MockCorrector::echo().with_response("teh cat", "the cat");
/// assert_eq!(corrector.correct("teh cat", None).await.unwrap(), "the cat");
/// assert_eq!(corrector.correct("unknown", None).await.unwrap(), "unknown");
/// assert_eq!(corrector.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockCorrector {
    default_response: Option<String>,
    responses: HashMap<String, String>,
    failure: Option<RemoteError>,
    fail_times: usize,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
}

impl MockCorrector {
    /// Corrector returning a fixed response for every text
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            ..Self::echo()
        }
    }

    /// Corrector returning its input unchanged unless a response is configured
    pub fn echo() -> Self {
        Self {
            default_response: None,
            responses: HashMap::new(),
            failure: None,
            fail_times: 0,
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `response` when asked to correct exactly `text`
    pub fn with_response(mut self, text: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(text.into(), response.into());
        self
    }

    /// Fail every call with `error`
    pub fn failing(error: RemoteError) -> Self {
        Self::echo().fail_first(usize::MAX, error)
    }

    /// Fail the first `times` calls with `error`, then behave normally
    pub fn fail_first(mut self, times: usize, error: RemoteError) -> Self {
        self.failure = Some(error);
        self.fail_times = times;
        self
    }

    /// Sleep before answering (to trigger client timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `correct` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockCorrector {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl LlmCorrector for MockCorrector {
    async fn correct(&self, text: &str, _context: Option<&str>) -> Result<String, RemoteError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = &self.failure {
            if call < self.fail_times {
                return Err(error.clone());
            }
        }

        if let Some(response) = self.responses.get(text) {
            return Ok(response.clone());
        }
        Ok(self
            .default_response
            .clone()
            .unwrap_or_else(|| text.to_string()))
    }
}

/// Mock grammar checker
#[derive(Debug, Clone, Default)]
pub struct MockGrammarChecker {
    matches: HashMap<String, Vec<GrammarMatch>>,
    failure: Option<RemoteError>,
    call_count: Arc<AtomicUsize>,
}

impl MockGrammarChecker {
    /// Checker that finds nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `matches` when checking exactly `text`
    pub fn with_matches(mut self, text: impl Into<String>, matches: Vec<GrammarMatch>) -> Self {
        self.matches.insert(text.into(), matches);
        self
    }

    /// Fail every call with `error`
    pub fn failing(error: RemoteError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of times `check` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrammarChecker for MockGrammarChecker {
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, RemoteError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.matches.get(text).cloned().unwrap_or_default())
    }
}
