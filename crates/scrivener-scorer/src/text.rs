//! Text statistics shared by the scoring dimensions

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Apostrophe separated from its word by a space (`don 't`, `it' s`)
static SPACED_APOSTROPHE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z]+(?: '|' )(?:s|t|re|ll|ve|d|m)(?:[\s,.;:!?)]|$)").expect("valid regex")
});

/// Whitespace before a punctuation mark
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S[ \t]+[,.;:!?]").expect("valid regex"));

/// Two or more spaces between words
static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S {2,}\S").expect("valid regex"));

/// Abbreviations whose trailing dot does not end a sentence
pub const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "vs.", "cf.", "pp.", "mr.", "mrs.", "ms.", "dr.", "prof.", "fig.", "vol.",
    "approx.", "ca.", "es.", "cfr.", "pag.", "sig.", "dott.", "ing.", "avv.", "nr.",
];

/// Whether the last word of `text` is a known abbreviation
pub fn ends_with_abbreviation(text: &str) -> bool {
    text.split_whitespace()
        .next_back()
        .map(|word| word.trim_start_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .is_some_and(|word| ABBREVIATIONS.contains(&word.as_str()))
}

/// Lowercased word tokens (letters, digits and inner apostrophes)
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|w| w.trim_matches(|c| c == '\'' || c == '’'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Distinct lowercased words
pub fn vocabulary(text: &str) -> HashSet<String> {
    words(text).into_iter().collect()
}

/// Sentences split on terminal punctuation, trimmed, empty ones dropped
pub fn sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?' | '…') {
            // Consume runs like "?!" or "..."
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '…') {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace())
                && !(c == '.' && end == idx + 1 && ends_with_abbreviation(&text[start..end]));
            if at_boundary {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    result.push(sentence);
                }
                start = end;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        result.push(tail);
    }
    result
}

/// Average number of words per sentence (0 for empty text)
pub fn average_sentence_length(text: &str) -> f64 {
    let sentences = sentences(text);
    if sentences.is_empty() {
        return 0.0;
    }
    let total: usize = sentences.iter().map(|s| words(s).len()).sum();
    total as f64 / sentences.len() as f64
}

/// Number of characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Occurrences of apostrophes separated from their word
pub fn count_spaced_apostrophes(text: &str) -> usize {
    SPACED_APOSTROPHE.find_iter(text).count()
}

/// Occurrences of whitespace before punctuation
pub fn count_space_before_punctuation(text: &str) -> usize {
    SPACE_BEFORE_PUNCT.find_iter(text).count()
}

/// Occurrences of repeated spaces between words
pub fn count_repeated_spaces(text: &str) -> usize {
    REPEATED_SPACES.find_iter(text).count()
}

/// Sentences whose first letter is lowercase
pub fn count_lowercase_sentence_starts(text: &str) -> usize {
    sentences(text)
        .iter()
        .filter(|s| {
            s.chars()
                .find(|c| c.is_alphabetic())
                .is_some_and(|c| c.is_lowercase())
        })
        .count()
}

/// Fraction of tokens that repeat an earlier token
pub fn duplicated_word_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&String> = tokens.iter().collect();
    (tokens.len() - unique.len()) as f64 / tokens.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        assert_eq!(words("Don't stop, Alice!"), vec!["don't", "stop", "alice"]);
        assert!(words("  ...  ").is_empty());
    }

    #[test]
    fn test_sentences() {
        let s = sentences("First one. Second one?! Third... and a tail");
        assert_eq!(s, vec!["First one.", "Second one?!", "Third...", "and a tail"]);
    }

    #[test]
    fn test_sentences_ignore_inner_dots() {
        assert_eq!(sentences("Version 1.5 is out."), vec!["Version 1.5 is out."]);
    }

    #[test]
    fn test_sentences_keep_abbreviations() {
        assert_eq!(
            sentences("See e.g. the appendix. Then stop."),
            vec!["See e.g. the appendix.", "Then stop."]
        );
        assert_eq!(sentences("Vedi ad es. la tabella sotto."), vec!["Vedi ad es. la tabella sotto."]);
        assert_eq!(count_lowercase_sentence_starts("See e.g. the appendix for details."), 0);
    }

    #[test]
    fn test_ends_with_abbreviation() {
        assert!(ends_with_abbreviation("See e.g."));
        assert!(ends_with_abbreviation("(cfr."));
        assert!(ends_with_abbreviation("ad Es."));
        assert!(!ends_with_abbreviation("the end."));
        assert!(!ends_with_abbreviation(""));
    }

    #[test]
    fn test_possessive_apostrophe_is_not_spaced() {
        assert_eq!(count_spaced_apostrophes("The students' t-shirts are red."), 0);
        assert_eq!(count_spaced_apostrophes("The students' shirts are red."), 0);
        assert_eq!(count_spaced_apostrophes("Don 't go"), 1);
        assert_eq!(count_spaced_apostrophes("It' s fine"), 1);
    }

    #[test]
    fn test_average_sentence_length() {
        assert_eq!(average_sentence_length("One two. Three four five six."), 3.0);
        assert_eq!(average_sentence_length(""), 0.0);
    }

    #[test]
    fn test_mechanical_counts() {
        assert_eq!(count_spaced_apostrophes("I don 't know, it' s fine"), 2);
        assert_eq!(count_space_before_punctuation("Hello , world !"), 2);
        assert_eq!(count_repeated_spaces("a  b   c d"), 2);
        assert_eq!(count_lowercase_sentence_starts("hello. World. again"), 2);
    }

    #[test]
    fn test_duplicated_word_ratio() {
        let tokens = words("the the the cat");
        assert_eq!(duplicated_word_ratio(&tokens), 0.5);
        assert_eq!(duplicated_word_ratio(&[]), 0.0);
    }
}
