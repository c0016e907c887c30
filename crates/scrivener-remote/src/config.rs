//! Rate-limited client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`RateLimitedClient`](crate::RateLimitedClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum number of concurrently in-flight calls
    pub max_concurrent: usize,

    /// Request budget per minute; successive calls are spaced by `60s / budget`
    pub requests_per_minute: u32,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per call, including the first
    pub max_retries: u32,

    /// Base backoff delay in milliseconds, doubled after every retryable failure
    pub base_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 3,
            requests_per_minute: 40,
            timeout_secs: 45,
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RateLimitConfig {
    /// Minimum spacing between successive calls
    pub fn min_interval(&self) -> Duration {
        if self.requests_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(60) / self.requests_per_minute
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff before the retry that follows failed attempt `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms).saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be greater than 0".to_string());
        }
        if self.requests_per_minute == 0 {
            return Err("requests_per_minute must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
