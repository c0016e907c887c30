//! Configuration management for the CLI.
//!
//! One TOML file nests the configuration of every pipeline component plus
//! the settings of the remote sources.

use crate::error::{CliError, Result};
use scrivener_cache::CacheConfig;
use scrivener_cascade::{CascadeConfig, PatternRuleSpec};
use scrivener_orchestrator::OrchestratorConfig;
use scrivener_remote::RateLimitConfig;
use scrivener_scorer::ScorerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings
    pub settings: Settings,

    /// Quality scorer
    pub scorer: ScorerConfig,

    /// Correction cascade and acceptance gate
    pub cascade: CascadeConfig,

    /// Similarity cache
    pub cache: CacheConfig,

    /// Rate limiting of remote calls
    pub rate_limit: RateLimitConfig,

    /// Batch orchestration
    pub orchestrator: OrchestratorConfig,

    /// Static dictionary
    pub dictionary: DictionarySettings,

    /// Mechanical pattern rules
    pub patterns: PatternSettings,

    /// LLM correction source
    pub llm: LlmSettings,

    /// Grammar checker source
    pub grammar: GrammarSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Keep a `.bak` copy of every document before writing corrections
    #[serde(default = "default_true")]
    pub backup: bool,
}

/// Static dictionary settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionarySettings {
    /// Extra replacements file, merged over the built-in dictionary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Pattern rule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Include the built-in mechanical rules
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Custom regex rules, applied after the built-in ones
    #[serde(default)]
    pub rules: Vec<PatternRuleSpec>,
}

/// LLM source settings (Ollama-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Use the LLM source
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the service
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Environment variable holding a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// Grammar checker settings (LanguageTool-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarSettings {
    /// Use the grammar checker source
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the service
    #[serde(default = "default_grammar_endpoint")]
    pub endpoint: String,

    /// Language code passed to the checker
    #[serde(default = "default_language")]
    pub language: String,
}

impl Config {
    /// Get the default config file path (`~/.scrivener/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".scrivener").join("config.toml"))
    }

    /// Resolve the config file path.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist. Without one, the default file is
    /// read if present and built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Validate every section.
    ///
    /// Runs before any document is read; a failure is fatal.
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("scorer", self.scorer.validate()),
            ("cascade", self.cascade.validate()),
            ("cache", self.cache.validate()),
            ("rate_limit", self.rate_limit.validate()),
            ("orchestrator", self.orchestrator.validate()),
            ("llm", self.llm.validate()),
            ("grammar", self.grammar.validate()),
        ];

        for (section, result) in sections {
            result.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            backup: true,
        }
    }
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            builtin: true,
            rules: Vec::new(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key_env: None,
        }
    }
}

impl LlmSettings {
    /// Validate the settings of an enabled source.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if let Some(var) = &self.api_key_env {
            if std::env::var(var).is_err() {
                return Err(format!("api_key_env names an unset environment variable: {}", var));
            }
        }
        Ok(())
    }

    /// Read the bearer token, if one is configured.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    }
}

impl Default for GrammarSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_grammar_endpoint(),
            language: default_language(),
        }
    }
}

impl GrammarSettings {
    /// Validate the settings of an enabled source.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("language must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.1".to_string()
}

fn default_grammar_endpoint() -> String {
    "http://localhost:8081".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_scorer::AcceptanceMode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert!(config.settings.backup);
        assert!(config.patterns.builtin);
        assert!(!config.llm.enabled);
        assert!(!config.grammar.enabled);
        assert_eq!(config.cascade.acceptance.mode, AcceptanceMode::Conservative);
        assert_eq!(config.orchestrator.batch_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [llm]
            enabled = true
            model = "mistral"

            [orchestrator]
            workers = 2
            "#,
        )
        .unwrap();

        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.orchestrator.workers, 2);
        assert_eq!(config.orchestrator.batch_size, 10);
        assert_eq!(config.cache.max_entries, 1000);
    }

    #[test]
    fn test_custom_pattern_rules() {
        let config = Config::from_toml(
            r#"
            [[patterns.rules]]
            name = "ellipsis"
            pattern = '\.\.\.'
            replacement = "…"
            "#,
        )
        .unwrap();

        assert_eq!(config.patterns.rules.len(), 1);
        assert_eq!(config.patterns.rules[0].name, "ellipsis");
        assert!(config.patterns.builtin);
    }

    #[test]
    fn test_enabled_llm_without_model_is_fatal() {
        let mut config = Config::default();
        config.llm.enabled = true;
        config.llm.model = String::new();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("[llm] model must not be empty"));
    }

    #[test]
    fn test_unset_api_key_variable_is_fatal() {
        let mut config = Config::default();
        config.llm.enabled = true;
        config.llm.api_key_env = Some("SCRIVENER_TEST_KEY_THAT_IS_NEVER_SET".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unset environment variable"));
    }

    #[test]
    fn test_disabled_source_is_not_validated() {
        let mut config = Config::default();
        config.grammar.endpoint = String::new();
        assert!(config.validate().is_ok());

        config.grammar.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_component_section_is_reported() {
        let mut config = Config::default();
        config.orchestrator.workers = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[orchestrator]"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.grammar.enabled = true;
        config.grammar.language = "it".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert!(loaded.grammar.enabled);
        assert_eq!(loaded.grammar.language, "it");
        assert_eq!(loaded.cascade, config.cascade);
        assert_eq!(loaded.cache, config.cache);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
