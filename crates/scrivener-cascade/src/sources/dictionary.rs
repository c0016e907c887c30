//! Static dictionary source

use async_trait::async_trait;
use regex::{Captures, Regex};
use scrivener_domain::{CorrectableUnit, SourceId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::sources::CorrectionSource;
use crate::{CascadeError, SourceError};

/// Misspellings corrected out of the box
const BUILTIN: &[(&str, &str)] = &[
    ("vlta", "volta"),
    ("teh", "the"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("untill", "until"),
    ("wich", "which"),
    ("accomodate", "accommodate"),
    ("goverment", "government"),
    ("perchè", "perché"),
    ("poichè", "poiché"),
];

#[derive(Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    replacements: BTreeMap<String, String>,
}

/// Whole-word replacement table
///
/// Matching is case-insensitive; the replacement takes the capitalization of
/// the matched word (`Teh` becomes `The`, `TEH` becomes `THE`).
///
/// # Examples
///
/// ```
/// use scrivener_cascade::DictionarySource;
///
/// let dictionary = DictionarySource::builtin();
/// assert_eq!(dictionary.apply("Teh cat sat on teh mat"), "The cat sat on the mat");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DictionarySource {
    replacements: BTreeMap<String, String>,
    matcher: Option<Regex>,
}

impl DictionarySource {
    /// Build a dictionary from (misspelling, correction) pairs
    pub fn new<I, K, V>(entries: I) -> Result<Self, CascadeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut replacements = BTreeMap::new();
        for (from, to) in entries {
            let from = from.as_ref().trim().to_lowercase();
            if from.is_empty() {
                return Err(CascadeError::Dictionary("empty dictionary key".to_string()));
            }
            replacements.insert(from, to.into());
        }

        let matcher = if replacements.is_empty() {
            None
        } else {
            // Longest keys first so overlapping alternatives prefer the longer word
            let mut keys: Vec<&String> = replacements.keys().collect();
            keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})\b", alternation);
            Some(Regex::new(&pattern).map_err(|e| CascadeError::Dictionary(e.to_string()))?)
        };

        Ok(Self {
            replacements,
            matcher,
        })
    }

    /// Dictionary of common misspellings
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().copied()).unwrap_or_default()
    }

    /// Parse a TOML dictionary with a `[replacements]` table
    pub fn from_toml(toml_str: &str) -> Result<Self, CascadeError> {
        let file: DictionaryFile = toml::from_str(toml_str)
            .map_err(|e| CascadeError::Dictionary(format!("Failed to parse TOML: {}", e)))?;
        Self::new(file.replacements)
    }

    /// Load a TOML dictionary from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CascadeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CascadeError::Dictionary(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Merge another dictionary into this one (entries of `other` win)
    pub fn merged(self, other: DictionarySource) -> Result<Self, CascadeError> {
        let mut replacements = self.replacements;
        replacements.extend(other.replacements);
        Self::new(replacements)
    }

    /// (misspelling, correction) pairs, sorted by misspelling
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.replacements
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Apply every replacement to `text`
    pub fn apply(&self, text: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return text.to_string();
        };
        matcher
            .replace_all(text, |caps: &Captures<'_>| {
                let word = &caps[0];
                match self.replacements.get(&word.to_lowercase()) {
                    Some(replacement) => match_case(word, replacement),
                    None => word.to_string(),
                }
            })
            .into_owned()
    }
}

/// Give `replacement` the capitalization of `word`
fn match_case(word: &str, replacement: &str) -> String {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if word.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

#[async_trait]
impl CorrectionSource for DictionarySource {
    fn id(&self) -> SourceId {
        SourceId::Dictionary
    }

    async fn propose(&self, unit: &CorrectableUnit) -> Result<Vec<String>, SourceError> {
        Ok(vec![self.apply(unit.text())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let dictionary = DictionarySource::new([("teh", "the")]).unwrap();
        assert_eq!(dictionary.apply("teh tehran"), "the tehran");
    }

    #[test]
    fn test_preserves_capitalization() {
        let dictionary = DictionarySource::new([("recieve", "receive")]).unwrap();
        assert_eq!(dictionary.apply("Recieve"), "Receive");
        assert_eq!(dictionary.apply("RECIEVE"), "RECEIVE");
        assert_eq!(dictionary.apply("recieve"), "receive");
    }

    #[test]
    fn test_accented_words() {
        let dictionary = DictionarySource::builtin();
        assert_eq!(dictionary.apply("Non so perchè."), "Non so perché.");
    }

    #[test]
    fn test_from_toml() {
        let dictionary = DictionarySource::from_toml(
            r#"
            [replacements]
            colour = "color"
            "adress" = "address"
            "#,
        )
        .unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.apply("My adress, my colour"), "My address, my color");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(DictionarySource::new([(" ", "x")]).is_err());
    }

    #[test]
    fn test_empty_dictionary_is_noop() {
        let dictionary = DictionarySource::default();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.apply("teh"), "teh");
    }

    #[test]
    fn test_merged_overrides() {
        let custom = DictionarySource::new([("teh", "tea")]).unwrap();
        let dictionary = DictionarySource::builtin().merged(custom).unwrap();
        assert_eq!(dictionary.apply("teh"), "tea");
        assert_eq!(dictionary.apply("wich"), "which");
    }

    #[tokio::test]
    async fn test_propose() {
        let unit = CorrectableUnit::new(scrivener_domain::UnitId::body(0), 0, "vlta");
        let candidates = DictionarySource::builtin().propose(&unit).await.unwrap();
        assert_eq!(candidates, vec!["volta".to_string()]);
    }
}
