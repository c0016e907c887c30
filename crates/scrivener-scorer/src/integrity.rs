//! Basic-integrity validation of a candidate against its original

use crate::text;

/// Result of a basic-integrity check
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    /// Whether the candidate passed every check
    pub passed: bool,

    /// Failed checks, human readable
    pub failures: Vec<String>,
}

impl IntegrityReport {
    fn ok() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, reason: String) {
        self.passed = false;
        self.failures.push(reason);
    }
}

/// Check that a candidate is structurally sound relative to its original
///
/// A candidate fails when it is blank while the original is not, when it is
/// less than half the original's length, or when a multi-sentence original
/// gains or loses sentences beyond tolerance.
///
/// # Examples
///
/// ```
/// use scrivener_scorer::check_integrity;
///
/// assert!(check_integrity("Hello world.", "Hello, world.").passed);
/// assert!(!check_integrity("Hello world.", "").passed);
/// ```
pub fn check_integrity(original: &str, candidate: &str) -> IntegrityReport {
    let mut report = IntegrityReport::ok();

    if candidate.trim().is_empty() {
        if !original.trim().is_empty() {
            report.fail("Candidate is empty".to_string());
        }
        return report;
    }

    let orig_len = text::char_len(original);
    let cand_len = text::char_len(candidate);
    if (cand_len as f64) < orig_len as f64 * 0.5 {
        report.fail(format!(
            "Candidate is less than half the original length ({} of {} chars)",
            cand_len, orig_len
        ));
    }

    let orig_sentences = text::sentences(original).len();
    let cand_sentences = text::sentences(candidate).len();
    if orig_sentences >= 2 {
        let tolerance = std::cmp::max(1, orig_sentences / 2);
        if orig_sentences.abs_diff(cand_sentences) > tolerance {
            report.fail(format!(
                "Sentence count changed from {} to {}",
                orig_sentences, cand_sentences
            ));
        }
    }

    report
}
