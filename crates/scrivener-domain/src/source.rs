//! Correction source identifiers

use std::fmt;

/// Identifies the correction source that produced a candidate
///
/// Sources are listed cheapest and most certain first, which is also the
/// default cascade order:
/// - Dictionary: static replacement table
/// - PatternRules: mechanical regex rules
/// - Grammar: grammar-checking service suggestions
/// - Llm: large-language-model rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
    /// Static dictionary of known misspellings
    Dictionary,

    /// Mechanical pattern rules (spacing, apostrophes, capitalization)
    PatternRules,

    /// Grammar-checking service
    Grammar,

    /// Large-language-model correction service
    Llm,
}

impl SourceId {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Dictionary => "dictionary",
            SourceId::PatternRules => "pattern_rules",
            SourceId::Grammar => "grammar",
            SourceId::Llm => "llm",
        }
    }

    /// Parse a source from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dictionary" => Some(SourceId::Dictionary),
            "pattern_rules" | "patterns" => Some(SourceId::PatternRules),
            "grammar" => Some(SourceId::Grammar),
            "llm" => Some(SourceId::Llm),
            _ => None,
        }
    }

    /// Whether the source calls a remote service
    pub fn is_remote(&self) -> bool {
        matches!(self, SourceId::Grammar | SourceId::Llm)
    }

    /// All sources in default cascade order
    pub fn all() -> [SourceId; 4] {
        [
            SourceId::Dictionary,
            SourceId::PatternRules,
            SourceId::Grammar,
            SourceId::Llm,
        ]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid correction source: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let all = SourceId::all();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all[0], SourceId::Dictionary);
        assert_eq!(all[3], SourceId::Llm);
    }

    #[test]
    fn test_remote_sources() {
        assert!(!SourceId::Dictionary.is_remote());
        assert!(!SourceId::PatternRules.is_remote());
        assert!(SourceId::Grammar.is_remote());
        assert!(SourceId::Llm.is_remote());
    }

    #[test]
    fn test_parse() {
        assert_eq!("LLM".parse::<SourceId>(), Ok(SourceId::Llm));
        assert_eq!(SourceId::parse("patterns"), Some(SourceId::PatternRules));
        assert!(SourceId::parse("oracle").is_none());
    }
}
