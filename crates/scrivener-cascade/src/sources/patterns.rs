//! Mechanical pattern rules
//!
//! Regex rewrites for typographic slips that need no language knowledge:
//! stray spaces, split contractions, lowercase sentence starts and doubled
//! words. All rules run in order over the unit and produce one candidate.

use async_trait::async_trait;
use regex::{Captures, Regex};
use scrivener_domain::{CorrectableUnit, SourceId};
use scrivener_scorer::text::ends_with_abbreviation;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::sources::CorrectionSource;
use crate::{CascadeError, SourceError};

/// Words that may legitimately appear twice in a row
const ALLOWED_REPEATS: &[&str] = &[
    // English
    "had", "that", "is", "very", "so", "no", "bye", "really",
    // Italian reduplications
    "piano", "pian", "così", "via", "passo", "poco", "bene", "quasi", "appena", "proprio",
    "subito", "adagio", "zitto", "lemme", "pari", "man", "ora", "sì",
];

static BUILTIN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::compiled(
            "spaced-apostrophe",
            r"\b(\p{L}+)(?: '|' )(s|t|re|ll|ve|d|m)([\s,.;:!?)]|$)",
            Rewrite::Template("${1}'${2}${3}".to_string()),
        ),
        PatternRule::compiled(
            "space-before-punctuation",
            r"(\S)[ \t]+([,.;:!?])",
            Rewrite::Template("${1}${2}".to_string()),
        ),
        PatternRule::compiled(
            "repeated-spaces",
            r"(\S) {2,}",
            Rewrite::Template("${1} ".to_string()),
        ),
        PatternRule::compiled(
            "space-after-punctuation",
            r"([,;])(\p{L})",
            Rewrite::Template("${1} ${2}".to_string()),
        ),
        PatternRule::compiled(
            "sentence-capitalization",
            r"(^|[.!?][ \t]+)(\p{Ll})",
            Rewrite::UppercaseSecond,
        ),
    ]
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}']+").expect("valid regex"));

/// Serializable definition of a custom rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRuleSpec {
    /// Rule name, used in logs
    pub name: String,
    /// Regular expression to match
    pub pattern: String,
    /// Replacement template (`$1`, `${name}` expand capture groups)
    pub replacement: String,
}

#[derive(Debug, Clone)]
enum Rewrite {
    Template(String),
    /// `$1` followed by the uppercased `$2`, unless `$1` closes an abbreviation
    UppercaseSecond,
}

/// A named regex rewrite
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
    rewrite: Rewrite,
}

impl PatternRule {
    /// Compile a custom rule
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, CascadeError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| CascadeError::InvalidRule {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            regex,
            rewrite: Rewrite::Template(replacement.into()),
        })
    }

    /// Compile a rule from its serialized definition
    pub fn from_spec(spec: &PatternRuleSpec) -> Result<Self, CascadeError> {
        Self::new(spec.name.clone(), &spec.pattern, spec.replacement.clone())
    }

    fn compiled(name: &str, pattern: &str, rewrite: Rewrite) -> Self {
        Self {
            name: name.to_string(),
            regex: Regex::new(pattern).expect("valid regex"),
            rewrite,
        }
    }

    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the rule to every match in `text`
    pub fn apply(&self, text: &str) -> String {
        match &self.rewrite {
            Rewrite::Template(template) => {
                self.regex.replace_all(text, template.as_str()).into_owned()
            }
            Rewrite::UppercaseSecond => self
                .regex
                .replace_all(text, |caps: &Captures<'_>| {
                    let punct = &caps[1];
                    if punct.starts_with('.') {
                        let dot_end = caps.get(1).map_or(0, |m| m.start() + 1);
                        if ends_with_abbreviation(&text[..dot_end]) {
                            return caps[0].to_string();
                        }
                    }
                    format!("{}{}", punct, caps[2].to_uppercase())
                })
                .into_owned(),
        }
    }
}

/// Ordered set of pattern rules
///
/// # Examples
///
/// ```
/// use scrivener_cascade::PatternRuleSource;
///
/// let rules = PatternRuleSource::builtin();
/// assert_eq!(
///     rules.apply("it is the the end ,isn 't it?  yes"),
///     "It is the end, isn't it? Yes"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PatternRuleSource {
    rules: Vec<PatternRule>,
    remove_duplicate_words: bool,
}

impl PatternRuleSource {
    /// The built-in rules plus duplicated-word removal
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
            remove_duplicate_words: true,
        }
    }

    /// No rules at all
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            remove_duplicate_words: false,
        }
    }

    /// Built-in rules followed by the given custom rules
    pub fn with_custom(specs: &[PatternRuleSpec]) -> Result<Self, CascadeError> {
        let mut source = Self::builtin();
        for spec in specs {
            source.rules.push(PatternRule::from_spec(spec)?);
        }
        Ok(source)
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Run every rule over `text`
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule.apply(&result);
        }
        if self.remove_duplicate_words {
            result = remove_duplicate_words(&result);
        }
        result
    }
}

impl Default for PatternRuleSource {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drop a word repeated immediately after itself (`the the` -> `the`)
///
/// Only words separated by spaces or tabs count; a line break between them
/// is left alone. The first occurrence keeps its capitalization.
fn remove_duplicate_words(text: &str) -> String {
    // Byte ranges to delete: the gap plus the repeated word
    let mut deletions: Vec<(usize, usize)> = Vec::new();
    let mut kept: Option<(usize, usize)> = None;
    let mut last_end: Option<usize> = None;

    for m in WORD.find_iter(text) {
        if let (Some((kept_start, kept_end)), Some(prev_end)) = (kept, last_end) {
            let gap = &text[prev_end..m.start()];
            let kept_word = text[kept_start..kept_end].to_lowercase();
            let is_repeat = !gap.is_empty()
                && gap.chars().all(|c| c == ' ' || c == '\t')
                && kept_word == m.as_str().to_lowercase()
                && kept_word.chars().any(char::is_alphabetic)
                && !ALLOWED_REPEATS.contains(&kept_word.as_str());

            if is_repeat {
                deletions.push((prev_end, m.end()));
                last_end = Some(m.end());
                continue;
            }
        }
        kept = Some((m.start(), m.end()));
        last_end = Some(m.end());
    }

    if deletions.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in deletions {
        result.push_str(&text[cursor..start]);
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    result
}

#[async_trait]
impl CorrectionSource for PatternRuleSource {
    fn id(&self) -> SourceId {
        SourceId::PatternRules
    }

    async fn propose(&self, unit: &CorrectableUnit) -> Result<Vec<String>, SourceError> {
        Ok(vec![self.apply(unit.text())])
    }
}
