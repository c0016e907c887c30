//! Cascade configuration

use scrivener_scorer::{AcceptanceMode, AcceptancePolicy};
use serde::{Deserialize, Serialize};

/// Configuration of the correction cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Acceptance gate applied to every scored candidate
    #[serde(flatten)]
    pub acceptance: AcceptancePolicy,

    /// Maximum candidates scored per source step
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Pass the unit's section name to the LLM as context
    #[serde(default = "default_llm_context")]
    pub llm_context: bool,
}

fn default_max_candidates() -> usize {
    3
}

fn default_llm_context() -> bool {
    true
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self::conservative()
    }
}

impl CascadeConfig {
    /// Conservative gate: threshold 0.80, confidence >= medium, safety >= 0.8
    pub fn conservative() -> Self {
        Self::with_acceptance(AcceptancePolicy::conservative())
    }

    /// Permissive gate: threshold 0.50 only
    pub fn permissive() -> Self {
        Self::with_acceptance(AcceptancePolicy::permissive())
    }

    /// Preset for an acceptance mode
    pub fn for_mode(mode: AcceptanceMode) -> Self {
        Self::with_acceptance(AcceptancePolicy::for_mode(mode))
    }

    fn with_acceptance(acceptance: AcceptancePolicy) -> Self {
        Self {
            acceptance,
            max_candidates: default_max_candidates(),
            llm_context: default_llm_context(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.acceptance.validate()?;
        if self.max_candidates == 0 {
            return Err("max_candidates must be greater than 0".to_string());
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
