//! Integration tests for scrivener-remote
//!
//! These tests drive mock services through the rate-limited client the same
//! way the correction cascade does.

use std::sync::Arc;
use std::time::Duration;

use scrivener_remote::{
    GrammarChecker, LlmCorrector, MockCorrector, MockGrammarChecker, RateLimitConfig,
    RateLimitedClient, RemoteError,
};

#[tokio::test(start_paused = true)]
async fn test_slow_llm_exhausts_retries() {
    let client = RateLimitedClient::new(RateLimitConfig::default());
    let corrector = MockCorrector::echo().with_delay(Duration::from_secs(120));

    let result = client.invoke(|| corrector.correct("teh cat", None)).await;

    assert_eq!(corrector.call_count(), 3);
    match result {
        Err(RemoteError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, RemoteError::Timeout(_)));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_rate_limit_recovers() {
    let client = RateLimitedClient::new(RateLimitConfig::default());
    let corrector = MockCorrector::echo()
        .with_response("teh cat", "the cat")
        .fail_first(2, RemoteError::RateLimitExceeded);

    let result = client.invoke(|| corrector.correct("teh cat", None)).await;

    assert_eq!(result, Ok("the cat".to_string()));
    assert_eq!(client.stats().retries, 2);
}

#[tokio::test(start_paused = true)]
async fn test_model_missing_fails_fast() {
    let client = RateLimitedClient::new(RateLimitConfig::default());
    let corrector =
        MockCorrector::failing(RemoteError::ModelNotAvailable("llama3".to_string()));

    let result = client.invoke(|| corrector.correct("text", None)).await;

    assert!(matches!(result, Err(RemoteError::ModelNotAvailable(_))));
    assert_eq!(corrector.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shared_client_across_services() {
    let client = Arc::new(RateLimitedClient::new(RateLimitConfig::default()));
    let corrector = Arc::new(MockCorrector::new("Corrected."));
    let checker = Arc::new(MockGrammarChecker::new());

    let c = Arc::clone(&client);
    let llm = Arc::clone(&corrector);
    let first = tokio::spawn(async move { c.invoke(|| llm.correct("x", None)).await });

    let c = Arc::clone(&client);
    let grammar = Arc::clone(&checker);
    let second = tokio::spawn(async move { c.invoke(|| grammar.check("x")).await });

    assert_eq!(first.await.unwrap(), Ok("Corrected.".to_string()));
    assert!(second.await.unwrap().unwrap().is_empty());
    assert_eq!(client.stats().attempts, 2);
}
