//! Scorer configuration

use serde::{Deserialize, Serialize};

/// Tunable constants of the heuristic scorer
///
/// The dimension weights are fixed by the domain layer; everything the
/// individual dimensions measure is configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Relative length change tolerated before content preservation is penalized
    pub length_tolerance: f64,

    /// Relative length loss above which the safety dimension flags truncation
    pub truncation_threshold: f64,

    /// Duplicated-word ratio above which the safety dimension is penalized
    pub duplicate_ratio_threshold: f64,

    /// Minimum candidate token count before duplicated words are checked
    pub duplicate_min_tokens: usize,

    /// Bonus added to content preservation when a known-equivalent pair is found
    pub semantic_bonus: f64,

    /// Maximum total penalty of the style dimension
    pub max_style_penalty: f64,

    /// Known-equivalent token pairs (misspelling, correction)
    ///
    /// A legitimate spelling fix changes characters and sometimes length; these
    /// pairs keep such fixes from being scored as content loss.
    #[serde(default = "default_semantic_pairs")]
    pub semantic_pairs: Vec<[String; 2]>,

    /// Words that mark an informal register
    #[serde(default = "default_informal_markers")]
    pub informal_markers: Vec<String>,

    /// Punctuation and symbols allowed in a candidate besides letters, digits and whitespace
    #[serde(default = "default_allowed_punctuation")]
    pub allowed_punctuation: String,
}

fn default_semantic_pairs() -> Vec<[String; 2]> {
    [
        ("vlta", "volta"),
        ("teh", "the"),
        ("recieve", "receive"),
        ("seperate", "separate"),
        ("definately", "definitely"),
        ("occured", "occurred"),
        ("untill", "until"),
        ("wich", "which"),
        ("accomodate", "accommodate"),
        ("goverment", "government"),
        ("perchè", "perché"),
        ("poichè", "poiché"),
    ]
    .iter()
    .map(|(a, b)| [a.to_string(), b.to_string()])
    .collect()
}

fn default_informal_markers() -> Vec<String> {
    [
        "gonna", "wanna", "gotta", "kinda", "sorta", "yeah", "ok", "okay", "lol", "stuff", "guys",
        "cool", "awesome", "btw",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_allowed_punctuation() -> String {
    ".,;:!?'\"()[]{}-–—…/\\%&@#*+=<>«»“”‘’§°€$£_|~^`".to_string()
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            length_tolerance: 0.30,
            truncation_threshold: 0.30,
            duplicate_ratio_threshold: 0.30,
            duplicate_min_tokens: 5,
            semantic_bonus: 0.10,
            max_style_penalty: 0.50,
            semantic_pairs: default_semantic_pairs(),
            informal_markers: default_informal_markers(),
            allowed_punctuation: default_allowed_punctuation(),
        }
    }
}

impl ScorerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let unit_fields = [
            ("length_tolerance", self.length_tolerance),
            ("truncation_threshold", self.truncation_threshold),
            ("duplicate_ratio_threshold", self.duplicate_ratio_threshold),
            ("semantic_bonus", self.semantic_bonus),
            ("max_style_penalty", self.max_style_penalty),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0.0, 1.0], got {}", name, value));
            }
        }
        if self.semantic_pairs.iter().any(|[a, b]| a.trim().is_empty() || b.trim().is_empty()) {
            return Err("semantic_pairs entries must not be empty".to_string());
        }
        Ok(())
    }

    /// Add known-equivalent pairs (e.g. the entries of a static dictionary)
    pub fn with_semantic_pairs<I, A, B>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.semantic_pairs
            .extend(pairs.into_iter().map(|(a, b)| [a.into(), b.into()]));
        self
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
