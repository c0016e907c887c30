//! Acceptance gate
//!
//! Decides whether a scored candidate may be applied. Two operating modes are
//! exposed as explicit configuration:
//!
//! - **Conservative**: overall score at or above the threshold, confidence at
//!   least medium, and safety at or above `min_safety`
//! - **Permissive**: overall score at or above the threshold only

use scrivener_domain::{ConfidenceClass, QualityScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acceptance operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AcceptanceMode {
    /// Threshold plus confidence and safety requirements
    #[default]
    Conservative,
    /// Threshold only
    Permissive,
}

impl AcceptanceMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptanceMode::Conservative => "conservative",
            AcceptanceMode::Permissive => "permissive",
        }
    }

    /// Parse a mode from its string name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "conservative" => Some(AcceptanceMode::Conservative),
            "permissive" => Some(AcceptanceMode::Permissive),
            _ => None,
        }
    }
}

impl fmt::Display for AcceptanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AcceptanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid acceptance mode: {}", s))
    }
}

/// Thresholds applied by the [`Gatekeeper`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptancePolicy {
    /// Operating mode
    #[serde(default)]
    pub mode: AcceptanceMode,

    /// Minimum overall score (0.0-1.0)
    pub acceptance_threshold: f64,

    /// Minimum safety sub-score in conservative mode (0.0-1.0)
    #[serde(default = "default_min_safety")]
    pub min_safety: f64,
}

fn default_min_safety() -> f64 {
    0.8
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::conservative()
    }
}

impl AcceptancePolicy {
    /// Conservative preset: threshold 0.80, confidence >= medium, safety >= 0.8
    pub fn conservative() -> Self {
        Self {
            mode: AcceptanceMode::Conservative,
            acceptance_threshold: 0.80,
            min_safety: default_min_safety(),
        }
    }

    /// Permissive preset: threshold 0.50 only
    pub fn permissive() -> Self {
        Self {
            mode: AcceptanceMode::Permissive,
            acceptance_threshold: 0.50,
            min_safety: default_min_safety(),
        }
    }

    /// Preset for a mode
    pub fn for_mode(mode: AcceptanceMode) -> Self {
        match mode {
            AcceptanceMode::Conservative => Self::conservative(),
            AcceptanceMode::Permissive => Self::permissive(),
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.acceptance_threshold) {
            return Err(format!(
                "acceptance_threshold must be within [0.0, 1.0], got {}",
                self.acceptance_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.min_safety) {
            return Err(format!(
                "min_safety must be within [0.0, 1.0], got {}",
                self.min_safety
            ));
        }
        Ok(())
    }
}

/// Gate decision for one scored candidate
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Candidate may be applied
    Accept,
    /// Candidate must not be applied
    Reject(String),
}

impl GateDecision {
    /// Whether the candidate was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accept)
    }

    /// Rejection reason, if rejected
    pub fn reason(&self) -> Option<&str> {
        match self {
            GateDecision::Accept => None,
            GateDecision::Reject(reason) => Some(reason),
        }
    }
}

/// The Gatekeeper applies the acceptance policy to quality scores
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    policy: AcceptancePolicy,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given policy
    pub fn new(policy: AcceptancePolicy) -> Self {
        Self { policy }
    }

    /// Create a Gatekeeper with the default (conservative) policy
    pub fn default_config() -> Self {
        Self::new(AcceptancePolicy::default())
    }

    /// Get the policy
    pub fn policy(&self) -> &AcceptancePolicy {
        &self.policy
    }

    /// Evaluate a score against the policy
    ///
    /// The rejection reason names the first failing criterion, followed by the
    /// flagged issues or, when there are none, the weakest dimension.
    pub fn evaluate(&self, score: &QualityScore) -> GateDecision {
        let failure = if score.overall() < self.policy.acceptance_threshold {
            Some(format!(
                "Overall score {:.3} below threshold {:.2}",
                score.overall(),
                self.policy.acceptance_threshold
            ))
        } else if self.policy.mode == AcceptanceMode::Conservative
            && score.confidence() < ConfidenceClass::Medium
        {
            Some(format!("Confidence {} below medium", score.confidence()))
        } else if self.policy.mode == AcceptanceMode::Conservative
            && score.safety() < self.policy.min_safety
        {
            Some(format!(
                "Safety {:.3} below {:.2}",
                score.safety(),
                self.policy.min_safety
            ))
        } else {
            None
        };

        match failure {
            None => GateDecision::Accept,
            Some(criterion) => {
                let detail = if score.issues().is_empty() {
                    let (name, value) = score.sub_scores().weakest();
                    format!("weakest dimension {} = {:.3}", name, value)
                } else {
                    score.issues().join("; ")
                };
                GateDecision::Reject(format!("{} ({})", criterion, detail))
            }
        }
    }
}
