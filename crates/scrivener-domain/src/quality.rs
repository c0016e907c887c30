//! Quality score module
//!
//! A [`QualityScore`] is produced fresh for every candidate correction and is
//! never mutated afterwards. The overall score is always the weighted sum of the
//! four sub-scores, clipped to `[0, 1]`, and the confidence class is derived
//! from `(overall, issue count)` alone.

use std::fmt;

/// Weight of the content-preservation sub-score
pub const CONTENT_WEIGHT: f64 = 0.40;

/// Weight of the grammar-improvement sub-score
pub const GRAMMAR_WEIGHT: f64 = 0.25;

/// Weight of the style-preservation sub-score
pub const STYLE_WEIGHT: f64 = 0.20;

/// Weight of the safety sub-score
pub const SAFETY_WEIGHT: f64 = 0.15;

/// Discrete confidence bucket derived from a quality score
///
/// Ordered from least to most confident, so `ConfidenceClass::High > ConfidenceClass::Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceClass {
    /// overall < 0.70
    VeryLow,
    /// overall >= 0.70
    Low,
    /// overall >= 0.85 with at most two issues
    Medium,
    /// overall >= 0.95 with at most one issue
    High,
    /// overall >= 0.98 with no issues
    VeryHigh,
}

impl ConfidenceClass {
    /// Classify an overall score and issue count
    ///
    /// Thresholds are checked from the strictest bucket down, so the result is
    /// monotonic: a higher score or fewer issues never yields a lower class.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::ConfidenceClass;
    ///
    /// assert_eq!(ConfidenceClass::classify(0.99, 0), ConfidenceClass::VeryHigh);
    /// assert_eq!(ConfidenceClass::classify(0.99, 1), ConfidenceClass::High);
    /// assert_eq!(ConfidenceClass::classify(0.90, 2), ConfidenceClass::Medium);
    /// assert_eq!(ConfidenceClass::classify(0.90, 3), ConfidenceClass::Low);
    /// assert_eq!(ConfidenceClass::classify(0.50, 0), ConfidenceClass::VeryLow);
    /// ```
    pub fn classify(overall: f64, issue_count: usize) -> Self {
        if overall >= 0.98 && issue_count == 0 {
            ConfidenceClass::VeryHigh
        } else if overall >= 0.95 && issue_count <= 1 {
            ConfidenceClass::High
        } else if overall >= 0.85 && issue_count <= 2 {
            ConfidenceClass::Medium
        } else if overall >= 0.70 {
            ConfidenceClass::Low
        } else {
            ConfidenceClass::VeryLow
        }
    }

    /// Get the class name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceClass::VeryLow => "very_low",
            ConfidenceClass::Low => "low",
            ConfidenceClass::Medium => "medium",
            ConfidenceClass::High => "high",
            ConfidenceClass::VeryHigh => "very_high",
        }
    }

    /// Parse a class from its string name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "very_low" => Some(ConfidenceClass::VeryLow),
            "low" => Some(ConfidenceClass::Low),
            "medium" => Some(ConfidenceClass::Medium),
            "high" => Some(ConfidenceClass::High),
            "very_high" => Some(ConfidenceClass::VeryHigh),
            _ => None,
        }
    }
}

impl fmt::Display for ConfidenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfidenceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid confidence class: {}", s))
    }
}

/// The four quality dimensions, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    /// How much of the original meaning and wording survived
    pub content: f64,
    /// How much the candidate fixes mechanical grammar problems
    pub grammar: f64,
    /// How closely the candidate keeps the author's register
    pub style: f64,
    /// How safe the candidate is to persist
    pub safety: f64,
}

impl SubScores {
    /// All dimensions perfect
    pub fn perfect() -> Self {
        Self {
            content: 1.0,
            grammar: 1.0,
            style: 1.0,
            safety: 1.0,
        }
    }

    /// All dimensions zero
    pub fn zero() -> Self {
        Self {
            content: 0.0,
            grammar: 0.0,
            style: 0.0,
            safety: 0.0,
        }
    }

    /// Clamp every dimension to `[0, 1]`
    fn clamped(self) -> Self {
        Self {
            content: clamp_unit(self.content),
            grammar: clamp_unit(self.grammar),
            style: clamp_unit(self.style),
            safety: clamp_unit(self.safety),
        }
    }

    /// Weighted sum of the dimensions, clipped to `[0, 1]`
    ///
    /// Rounded to 12 decimal places so that all-perfect dimensions yield exactly 1.0.
    pub fn weighted_overall(&self) -> f64 {
        let sum = CONTENT_WEIGHT * self.content
            + GRAMMAR_WEIGHT * self.grammar
            + STYLE_WEIGHT * self.style
            + SAFETY_WEIGHT * self.safety;
        clamp_unit((sum * 1e12).round() / 1e12)
    }

    /// Name and value of the weakest dimension
    ///
    /// Ties resolve in declaration order (content, grammar, style, safety).
    pub fn weakest(&self) -> (&'static str, f64) {
        let dims = [
            ("content", self.content),
            ("grammar", self.grammar),
            ("style", self.style),
            ("safety", self.safety),
        ];
        dims.into_iter()
            .fold(("content", f64::INFINITY), |acc, d| if d.1 < acc.1 { d } else { acc })
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Multi-dimensional quality score for one candidate correction
#[derive(Debug, Clone, PartialEq)]
pub struct QualityScore {
    sub: SubScores,
    overall: f64,
    confidence: ConfidenceClass,
    issues: Vec<String>,
}

impl QualityScore {
    /// Build a score from its sub-scores and flagged issues
    ///
    /// Sub-scores are clamped to `[0, 1]`; the overall score and confidence
    /// class are derived, never supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::{ConfidenceClass, QualityScore, SubScores};
    ///
    /// let score = QualityScore::new(SubScores::perfect(), Vec::new());
    /// assert_eq!(score.overall(), 1.0);
    /// assert_eq!(score.confidence(), ConfidenceClass::VeryHigh);
    /// ```
    pub fn new(sub: SubScores, issues: Vec<String>) -> Self {
        let sub = sub.clamped();
        let overall = sub.weighted_overall();
        let confidence = ConfidenceClass::classify(overall, issues.len());
        Self {
            sub,
            overall,
            confidence,
            issues,
        }
    }

    /// Perfect score with no issues (identical or empty input)
    pub fn perfect() -> Self {
        Self::new(SubScores::perfect(), Vec::new())
    }

    /// Zero-quality score for a source that failed to produce a candidate
    pub fn failure(message: impl fmt::Display) -> Self {
        Self::new(SubScores::zero(), vec![format!("Exception: {}", message)])
    }

    /// The four sub-scores
    pub fn sub_scores(&self) -> SubScores {
        self.sub
    }

    /// Content-preservation sub-score
    pub fn content(&self) -> f64 {
        self.sub.content
    }

    /// Grammar-improvement sub-score
    pub fn grammar(&self) -> f64 {
        self.sub.grammar
    }

    /// Style-preservation sub-score
    pub fn style(&self) -> f64 {
        self.sub.style
    }

    /// Safety sub-score
    pub fn safety(&self) -> f64 {
        self.sub.safety
    }

    /// Weighted overall score in `[0, 1]`
    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Confidence class
    pub fn confidence(&self) -> ConfidenceClass {
        self.confidence
    }

    /// Human-readable issues flagged while scoring
    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}
