//! Grammar-checker source

use async_trait::async_trait;
use scrivener_domain::{CorrectableUnit, GrammarMatch, SourceId};
use scrivener_remote::{GrammarChecker, RateLimitedClient};
use std::sync::Arc;
use tracing::debug;

use crate::sources::CorrectionSource;
use crate::SourceError;

/// Applies grammar-checker suggestions to the unit
///
/// The first candidate uses every match's top suggestion. Further candidates
/// use the second, third, ... suggestion where a match offers one, falling
/// back to its top suggestion otherwise.
pub struct GrammarSource {
    checker: Arc<dyn GrammarChecker>,
    client: Arc<RateLimitedClient>,
    max_candidates: usize,
}

impl GrammarSource {
    /// Create a source calling `checker` through `client`
    pub fn new(checker: Arc<dyn GrammarChecker>, client: Arc<RateLimitedClient>) -> Self {
        Self {
            checker,
            client,
            max_candidates: 3,
        }
    }

    /// Limit the number of alternative candidates
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }
}

/// Replace each matched span with its suggestion of the given rank
///
/// Matches without suggestions, out of range, or overlapping an earlier
/// match are skipped.
fn apply_suggestions(text: &str, matches: &[GrammarMatch], rank: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut ordered: Vec<&GrammarMatch> = matches
        .iter()
        .filter(|m| !m.suggestions.is_empty() && m.end() <= chars.len())
        .collect();
    ordered.sort_by_key(|m| (m.offset, m.length));

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in ordered {
        if m.offset < cursor {
            continue;
        }
        let suggestion = m
            .suggestions
            .get(rank)
            .or_else(|| m.suggestions.first())
            .map(String::as_str)
            .unwrap_or_default();
        result.extend(&chars[cursor..m.offset]);
        result.push_str(suggestion);
        cursor = m.end();
    }
    result.extend(&chars[cursor..]);
    result
}

#[async_trait]
impl CorrectionSource for GrammarSource {
    fn id(&self) -> SourceId {
        SourceId::Grammar
    }

    async fn propose(&self, unit: &CorrectableUnit) -> Result<Vec<String>, SourceError> {
        let text = unit.text();
        let matches = self.client.invoke(|| self.checker.check(text)).await?;
        debug!(unit = %unit.id(), matches = matches.len(), "Grammar check complete");

        let deepest = matches.iter().map(|m| m.suggestions.len()).max().unwrap_or(0);
        let mut candidates: Vec<String> = Vec::new();
        for rank in 0..self.max_candidates.min(deepest) {
            let candidate = apply_suggestions(text, &matches, rank);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_match(offset: usize, length: usize, suggestions: &[&str]) -> GrammarMatch {
        GrammarMatch {
            offset,
            length,
            message: "Possible spelling mistake".to_string(),
            rule_id: "MORFOLOGIK_RULE_EN_US".to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_apply_top_suggestions() {
        let text = "I has a apple";
        let matches = vec![grammar_match(2, 3, &["have"]), grammar_match(6, 1, &["an"])];
        assert_eq!(apply_suggestions(text, &matches, 0), "I have an apple");
    }

    #[test]
    fn test_character_offsets() {
        let text = "Perchè lui é qui";
        let matches = vec![grammar_match(11, 1, &["è"])];
        assert_eq!(apply_suggestions(text, &matches, 0), "Perchè lui è qui");
    }

    #[test]
    fn test_rank_falls_back_to_top() {
        let text = "teh cat adn dog";
        let matches = vec![
            grammar_match(0, 3, &["the", "tea"]),
            grammar_match(8, 3, &["and"]),
        ];
        assert_eq!(apply_suggestions(text, &matches, 1), "tea cat and dog");
    }

    #[test]
    fn test_skips_overlap_and_out_of_range() {
        let text = "abcdef";
        let matches = vec![
            grammar_match(0, 3, &["X"]),
            grammar_match(2, 2, &["Y"]),
            grammar_match(5, 4, &["Z"]),
            grammar_match(4, 1, &[]),
        ];
        assert_eq!(apply_suggestions(text, &matches, 0), "Xdef");
    }
}
