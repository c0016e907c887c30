//! Cache configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Seven days, in seconds
pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the similarity cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the cache (a disabled cache always misses and never stores)
    pub enabled: bool,

    /// Entry lifetime in seconds
    pub ttl_secs: u64,

    /// Maximum number of entries before least-recently-used eviction
    pub max_entries: usize,

    /// Minimum normalized similarity for a near-duplicate hit (0.0-1.0)
    pub similarity_threshold: f64,

    /// SQLite database path; `None` keeps the cache in memory
    pub sqlite_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_TTL_SECS,
            max_entries: 1000,
            similarity_threshold: 0.85,
            sqlite_path: None,
        }
    }
}

impl CacheConfig {
    /// A cache that never hits and never stores
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be greater than 0".to_string());
        }
        if self.ttl_secs == 0 {
            return Err("ttl_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be within [0.0, 1.0], got {}",
                self.similarity_threshold
            ));
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
