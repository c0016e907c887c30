//! Orchestrator configuration

use serde::{Deserialize, Serialize};

/// Configuration of a document run
///
/// # Examples
///
/// ```
/// use scrivener_orchestrator::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.batch_size, 10);
/// assert_eq!(config.workers, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Units per batch; a batch finishes before the next one starts
    pub batch_size: usize,

    /// Units corrected concurrently within a batch
    pub workers: usize,

    /// Minimum applied / processed ratio for the run to complete
    pub min_success_rate: f64,

    /// Count units no source changed as successes
    pub count_unchanged_as_success: bool,

    /// Decide but never write corrections back to the document
    pub dry_run: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            workers: 5,
            min_success_rate: 0.80,
            count_unchanged_as_success: false,
            dry_run: false,
        }
    }
}

impl OrchestratorConfig {
    /// One unit at a time (deterministic audit order)
    pub fn sequential() -> Self {
        Self {
            batch_size: 1,
            workers: 1,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_success_rate) {
            return Err("min_success_rate must be between 0.0 and 1.0".to_string());
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
