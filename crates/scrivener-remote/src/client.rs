//! Rate-limited client
//!
//! Every remote correction source goes through one [`RateLimitedClient`],
//! which bounds in-flight calls with a semaphore, spaces successive calls by
//! the per-minute budget, times out each call and retries rate-limit and
//! timeout failures with exponential backoff.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, Semaphore};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::{RateLimitConfig, RemoteError};

/// Call counters of a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// Attempts made, including retries
    pub attempts: u64,
    /// Calls that eventually succeeded
    pub successes: u64,
    /// Calls that failed (fast or after exhausting retries)
    pub failures: u64,
    /// Retries scheduled after a retryable failure
    pub retries: u64,
}

/// Concurrency-bounded, spaced, retrying wrapper around remote calls
pub struct RateLimitedClient {
    config: RateLimitConfig,
    semaphore: Semaphore,
    last_call: Mutex<Option<Instant>>,
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    retries: AtomicU64,
}

impl RateLimitedClient {
    /// Create a new client with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            semaphore: Semaphore::new(config.max_concurrent.max(1)),
            config,
            last_call: Mutex::new(None),
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Create a client with default configuration
    pub fn default_config() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Snapshot of the call counters
    pub fn stats(&self) -> ClientStats {
        ClientStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
        }
    }

    /// Wait until the minimum spacing since the previous call has elapsed
    async fn wait_for_slot(&self) {
        let min_interval = self.config.min_interval();
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Invoke a remote operation under the client's limits
    ///
    /// `op` is called once per attempt. Rate-limit and timeout failures are
    /// retried up to `max_retries` total attempts with backoff
    /// `base_delay * 2^attempt`; any other failure is returned immediately.
    /// Exhausting the attempts yields [`RemoteError::RetriesExhausted`].
    pub async fn invoke<F, Fut, T>(&self, mut op: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let max_attempts = self.config.max_retries.max(1);
        let call_timeout = self.config.timeout();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let result = {
                let _permit = self
                    .semaphore
                    .acquire()
                    .await
                    .map_err(|_| RemoteError::Other("Client is shut down".to_string()))?;
                self.wait_for_slot().await;
                self.attempts.fetch_add(1, Ordering::Relaxed);

                match timeout(call_timeout, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(RemoteError::Timeout(call_timeout)),
                }
            };

            match result {
                Ok(value) => {
                    self.successes.fetch_add(1, Ordering::Relaxed);
                    return Ok(value);
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempt = attempt + 1, max_attempts, error = %e, "Retryable remote failure");
                    last_error = Some(e);
                    if attempt + 1 < max_attempts {
                        self.retries.fetch_add(1, Ordering::Relaxed);
                        sleep(self.config.backoff(attempt)).await;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Remote failure is not retryable");
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }

        self.failures.fetch_add(1, Ordering::Relaxed);
        Err(RemoteError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| RemoteError::Other("No attempt made".to_string())),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    fn fast_config() -> RateLimitConfig {
        RateLimitConfig {
            max_concurrent: 3,
            requests_per_minute: 60_000,
            timeout_secs: 1,
            max_retries: 3,
            base_delay_ms: 10,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let client = RateLimitedClient::new(fast_config());
        let result = client.invoke(|| async { Ok::<_, RemoteError>("done") }).await;
        assert_eq!(result, Ok("done"));
        assert_eq!(client.stats().attempts, 1);
        assert_eq!(client.stats().successes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success() {
        let client = RateLimitedClient::new(fast_config());
        let calls = AtomicUsize::new(0);

        let result = client
            .invoke(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(RemoteError::RateLimitExceeded)
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(1));
        assert_eq!(client.stats().retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let client = RateLimitedClient::new(fast_config());
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = client
            .invoke(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RemoteError::InvalidResponse("garbage".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(RemoteError::InvalidResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_exhaust_retries() {
        let client = RateLimitedClient::new(fast_config());
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = client
            .invoke(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    sleep(Duration::from_secs(10)).await;
                    Ok(())
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(RemoteError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(*last, RemoteError::Timeout(Duration::from_secs(1)));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
        assert_eq!(client.stats().failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_exponential() {
        let client = RateLimitedClient::new(RateLimitConfig {
            base_delay_ms: 1000,
            ..fast_config()
        });
        let start = Instant::now();

        let _: Result<(), _> = client
            .invoke(|| async { Err(RemoteError::RateLimitExceeded) })
            .await;

        // 1s after the first failure, 2s after the second, none after the last
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_spacing_between_calls() {
        let client = RateLimitedClient::new(RateLimitConfig {
            requests_per_minute: 40,
            ..fast_config()
        });
        let start = Instant::now();

        for _ in 0..3 {
            client.invoke(|| async { Ok::<_, RemoteError>(()) }).await.unwrap();
        }

        // Three calls need two full spacings of 1.5s
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let client = Arc::new(RateLimitedClient::new(RateLimitConfig {
            max_concurrent: 2,
            ..fast_config()
        }));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let client = Arc::clone(&client);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                client
                    .invoke(|| {
                        let in_flight = Arc::clone(&in_flight);
                        let peak = Arc::clone(&peak);
                        async move {
                            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            sleep(Duration::from_millis(100)).await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                            Ok::<_, RemoteError>(())
                        }
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(client.stats().successes, 8);
    }
}
