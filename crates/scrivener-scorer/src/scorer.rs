//! Heuristic quality scorer

use std::collections::{HashMap, HashSet};

use scrivener_domain::traits::QualityScorer;
use scrivener_domain::{QualityScore, SubScores};

use crate::integrity::check_integrity;
use crate::text;
use crate::ScorerConfig;

/// Pure, deterministic scorer over the four quality dimensions
///
/// The same `(original, candidate)` pair always yields the same score, and
/// scoring never touches anything outside its inputs.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    config: ScorerConfig,
    equivalents: HashMap<String, HashSet<String>>,
    allowed: HashSet<char>,
}

impl HeuristicScorer {
    /// Create a new scorer with the given configuration
    pub fn new(config: ScorerConfig) -> Self {
        let mut equivalents: HashMap<String, HashSet<String>> = HashMap::new();
        for [a, b] in &config.semantic_pairs {
            let (a, b) = (a.to_lowercase(), b.to_lowercase());
            equivalents.entry(a.clone()).or_default().insert(b.clone());
            equivalents.entry(b).or_default().insert(a);
        }
        let allowed = config.allowed_punctuation.chars().collect();

        Self {
            config,
            equivalents,
            allowed,
        }
    }

    /// Create a scorer with default configuration
    pub fn default_config() -> Self {
        Self::new(ScorerConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    fn is_equivalent(&self, word: &str, vocabulary: &HashSet<String>) -> bool {
        self.equivalents
            .get(word)
            .is_some_and(|eq| eq.iter().any(|w| vocabulary.contains(w)))
    }

    /// Content preservation: character similarity, length ratio and word overlap
    fn content_preservation(&self, original: &str, candidate: &str) -> f64 {
        let char_similarity = strsim::normalized_levenshtein(original, candidate);

        let orig_len = text::char_len(original);
        let cand_len = text::char_len(candidate);
        let length_term = if orig_len == 0 {
            if cand_len == 0 {
                1.0
            } else {
                0.0
            }
        } else {
            let delta = (1.0 - cand_len as f64 / orig_len as f64).abs();
            if delta <= self.config.length_tolerance {
                1.0
            } else {
                let span = (1.0 - self.config.length_tolerance).max(f64::EPSILON);
                (1.0 - (delta - self.config.length_tolerance) / span).max(0.0)
            }
        };

        let orig_vocab = text::vocabulary(original);
        let cand_vocab = text::vocabulary(candidate);
        let mut semantic_match = false;
        let overlap = if orig_vocab.is_empty() {
            1.0
        } else {
            let kept = orig_vocab
                .iter()
                .filter(|w| {
                    if cand_vocab.contains(*w) {
                        true
                    } else if self.is_equivalent(w, &cand_vocab) {
                        semantic_match = true;
                        true
                    } else {
                        false
                    }
                })
                .count();
            kept as f64 / orig_vocab.len() as f64
        };

        let mut content = 0.5 * char_similarity + 0.2 * length_term + 0.3 * overlap;
        if semantic_match {
            content += self.config.semantic_bonus;
        }
        content.clamp(0.0, 1.0)
    }

    /// Grammar improvement over four mechanical checks
    fn grammar_improvement(&self, original: &str, candidate: &str, issues: &mut Vec<String>) -> f64 {
        let checks: [(&str, fn(&str) -> usize); 4] = [
            ("apostrophe spacing", text::count_spaced_apostrophes),
            ("sentence capitalization", text::count_lowercase_sentence_starts),
            ("space before punctuation", text::count_space_before_punctuation),
            ("repeated spaces", text::count_repeated_spaces),
        ];

        let mut total = 0.0;
        for (name, count) in checks {
            let before = count(original);
            let after = count(candidate);
            total += if before == 0 && after == 0 {
                0.5
            } else if after < before {
                1.0
            } else if after > before {
                issues.push(format!("Grammar regression: {}", name));
                -0.5
            } else {
                0.5
            };
        }
        (total / checks.len() as f64).clamp(0.0, 1.0)
    }

    /// Style preservation: sentence length and informal register
    fn style_preservation(&self, original: &str, candidate: &str, issues: &mut Vec<String>) -> f64 {
        let orig_avg = text::average_sentence_length(original);
        let cand_avg = text::average_sentence_length(candidate);
        let relative_delta = if orig_avg > 0.0 {
            (cand_avg - orig_avg).abs() / orig_avg
        } else if cand_avg > 0.0 {
            1.0
        } else {
            0.0
        };
        let length_penalty = (relative_delta * 0.5).min(0.3);

        let markers = |s: &str| {
            text::words(s)
                .iter()
                .filter(|w| self.config.informal_markers.iter().any(|m| m == *w))
                .count()
        };
        let marker_delta = markers(original).abs_diff(markers(candidate));
        let marker_penalty = (marker_delta as f64 * 0.1).min(0.3);

        let style = 1.0 - (length_penalty + marker_penalty).min(self.config.max_style_penalty);
        if style < 0.7 {
            issues.push("Style significantly altered".to_string());
        }
        style
    }

    /// Safety: integrity, truncation, duplication and unexpected characters
    fn safety(&self, original: &str, candidate: &str, issues: &mut Vec<String>) -> f64 {
        let mut safety: f64 = 1.0;

        // 1. Basic integrity
        let integrity = check_integrity(original, candidate);
        if !integrity.passed {
            safety -= 0.5;
            issues.push(format!("Integrity check failed: {}", integrity.failures.join("; ")));
        }

        // 2. Truncation
        let orig_len = text::char_len(original) as f64;
        let cand_len = text::char_len(candidate) as f64;
        if cand_len < orig_len * (1.0 - self.config.truncation_threshold) {
            safety -= 0.3;
            issues.push("Possible truncation".to_string());
        }

        // 3. Duplicated words, only when worse than the original
        let cand_tokens = text::words(candidate);
        if cand_tokens.len() > self.config.duplicate_min_tokens {
            let ratio = text::duplicated_word_ratio(&cand_tokens);
            let orig_ratio = text::duplicated_word_ratio(&text::words(original));
            if ratio > self.config.duplicate_ratio_threshold && ratio > orig_ratio {
                safety -= 0.3;
                issues.push("Excessive word duplication".to_string());
            }
        }

        // 4. Characters the original never contained
        let orig_chars: HashSet<char> = original.chars().collect();
        let unexpected = candidate.chars().any(|c| {
            !(c.is_alphanumeric() || c.is_whitespace() || self.allowed.contains(&c))
                && !orig_chars.contains(&c)
        });
        if unexpected {
            safety -= 0.2;
            issues.push("Unexpected characters introduced".to_string());
        }

        safety.max(0.0)
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::default_config()
    }
}

impl QualityScorer for HeuristicScorer {
    fn score(&self, original: &str, candidate: &str) -> QualityScore {
        if original == candidate {
            return QualityScore::perfect();
        }

        let mut issues = Vec::new();

        let content = self.content_preservation(original, candidate);
        if content < 0.6 {
            issues.push("Low content preservation".to_string());
        }
        let grammar = self.grammar_improvement(original, candidate, &mut issues);
        let style = self.style_preservation(original, candidate, &mut issues);
        let safety = self.safety(original, candidate, &mut issues);

        QualityScore::new(
            SubScores {
                content,
                grammar,
                style,
                safety,
            },
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scrivener_domain::ConfidenceClass;

    fn scorer() -> HeuristicScorer {
        HeuristicScorer::default_config()
    }

    #[test]
    fn test_identical_is_perfect() {
        let score = scorer().score("Same text.", "Same text.");
        assert_eq!(score.overall(), 1.0);
        assert_eq!(score.confidence(), ConfidenceClass::VeryHigh);
    }

    #[test]
    fn test_empty_is_perfect() {
        let score = scorer().score("", "");
        assert_eq!(score.safety(), 1.0);
        assert_eq!(score.confidence(), ConfidenceClass::VeryHigh);
    }

    #[test]
    fn test_known_misspelling_scores_medium() {
        let score = scorer().score("vlta", "volta");
        assert!((score.content() - 1.0).abs() < 1e-9);
        assert_eq!(score.grammar(), 0.5);
        assert_eq!(score.style(), 1.0);
        assert_eq!(score.safety(), 1.0);
        assert!((score.overall() - 0.875).abs() < 1e-9);
        assert_eq!(score.confidence(), ConfidenceClass::Medium);
        assert!(score.issues().is_empty());
    }

    #[test]
    fn test_mechanical_fix_improves_grammar() {
        let score = scorer().score("I don 't know , really.", "I don't know, really.");
        // Two checks improved, two not applicable
        assert_eq!(score.grammar(), 0.75);
        assert!(score.issues().is_empty());
    }

    #[test]
    fn test_grammar_regression_flagged() {
        let score = scorer().score("Hello world.", "Hello  world .");
        assert_eq!(score.grammar(), 0.0);
        assert_eq!(
            score
                .issues()
                .iter()
                .filter(|i| i.starts_with("Grammar regression"))
                .count(),
            2
        );
    }

    #[test]
    fn test_empty_candidate_is_unsafe() {
        let score = scorer().score("A perfectly fine sentence.", "");
        assert!((score.safety() - 0.2).abs() < 1e-9);
        assert!(score.issues().iter().any(|i| i.contains("Candidate is empty")));
        assert!(score.issues().iter().any(|i| i == "Possible truncation"));
        assert!(score.issues().iter().any(|i| i == "Low content preservation"));
        assert_eq!(score.confidence(), ConfidenceClass::VeryLow);
    }

    #[test]
    fn test_duplication_penalized() {
        let score = scorer().score(
            "The cat sat on the mat today.",
            "The cat cat cat sat sat on on the mat today.",
        );
        assert!(score.issues().iter().any(|i| i == "Excessive word duplication"));
        assert!(score.safety() < 1.0);
    }

    #[test]
    fn test_duplication_inherited_from_original_is_fine() {
        let score = scorer().score("no no no no no, not now", "No no no no no, not now.");
        assert!(!score.issues().iter().any(|i| i == "Excessive word duplication"));
    }

    #[test]
    fn test_unexpected_characters_penalized() {
        let score = scorer().score("Plain words here", "Plain words here ☃");
        assert!((score.safety() - 0.8).abs() < 1e-9);
        assert!(score
            .issues()
            .iter()
            .any(|i| i == "Unexpected characters introduced"));
    }

    #[test]
    fn test_characters_from_original_are_fine() {
        let score = scorer().score("Temperature ☃ falls", "Temperature ☃ falls.");
        assert_eq!(score.safety(), 1.0);
    }

    #[test]
    fn test_informal_register_change_lowers_style() {
        let score = scorer().score(
            "We are gonna fix this stuff, yeah.",
            "We are going to fix this material, indeed.",
        );
        assert!(score.style() < 1.0);
    }

    #[test]
    fn test_unrelated_rewrite_rejected_quality() {
        let score = scorer().score(
            "The meeting is scheduled for Tuesday afternoon.",
            "Bananas grow in tropical climates worldwide.",
        );
        assert!(score.content() < 0.6);
        assert!(score.confidence() <= ConfidenceClass::Low);
    }

    proptest! {
        #[test]
        fn prop_scoring_is_deterministic(a in ".{0,60}", b in ".{0,60}") {
            let scorer = scorer();
            prop_assert_eq!(scorer.score(&a, &b), scorer.score(&a, &b));
        }

        #[test]
        fn prop_scores_are_bounded(a in "[a-z ,.']{0,60}", b in "[a-z ,.']{0,60}") {
            let score = scorer().score(&a, &b);
            for v in [score.content(), score.grammar(), score.style(), score.safety(), score.overall()] {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
