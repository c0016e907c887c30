//! Correction outcome - the decision recorded for one unit

use crate::{CorrectableUnit, QualityScore, SourceId, UnitId};
use std::fmt;

/// What the cascade decided for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// A candidate passed the gate and should be persisted
    Applied,

    /// At least one candidate was proposed and none passed the gate
    Rejected,

    /// No source proposed a change (or the unit was blank)
    Unchanged,
}

impl OutcomeStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Applied => "applied",
            OutcomeStatus::Rejected => "rejected",
            OutcomeStatus::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the correction cascade on one unit
///
/// The cascade keeps only the last outcome per unit: the applied one, or the
/// last rejected one if nothing was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    /// Unit the outcome belongs to
    pub unit_id: UnitId,

    /// Original text of the unit
    pub original: String,

    /// Candidate text that was scored (equals `original` when unchanged)
    pub candidate: String,

    /// Decision
    pub status: OutcomeStatus,

    /// Score that produced the decision
    pub quality: QualityScore,

    /// Why the candidate was rejected, if it was
    pub rejection_reason: Option<String>,

    /// Source that produced the candidate, if any source did
    pub source: Option<SourceId>,

    /// Whether the candidate came from the similarity cache
    pub from_cache: bool,
}

impl CorrectionOutcome {
    /// Outcome for an accepted candidate
    pub fn applied(
        unit: &CorrectableUnit,
        candidate: impl Into<String>,
        quality: QualityScore,
        source: SourceId,
    ) -> Self {
        Self {
            unit_id: unit.id().clone(),
            original: unit.text().to_string(),
            candidate: candidate.into(),
            status: OutcomeStatus::Applied,
            quality,
            rejection_reason: None,
            source: Some(source),
            from_cache: false,
        }
    }

    /// Outcome for a rejected candidate
    pub fn rejected(
        unit: &CorrectableUnit,
        candidate: impl Into<String>,
        quality: QualityScore,
        source: SourceId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            unit_id: unit.id().clone(),
            original: unit.text().to_string(),
            candidate: candidate.into(),
            status: OutcomeStatus::Rejected,
            quality,
            rejection_reason: Some(reason.into()),
            source: Some(source),
            from_cache: false,
        }
    }

    /// Outcome for a unit no source changed
    ///
    /// Blank units take this path too: nothing to risk, nothing to gain, so the
    /// score is perfect.
    pub fn unchanged(unit: &CorrectableUnit) -> Self {
        Self {
            unit_id: unit.id().clone(),
            original: unit.text().to_string(),
            candidate: unit.text().to_string(),
            status: OutcomeStatus::Unchanged,
            quality: QualityScore::perfect(),
            rejection_reason: None,
            source: None,
            from_cache: false,
        }
    }

    /// Mark the outcome as served from the similarity cache
    pub fn with_cache_hit(mut self) -> Self {
        self.from_cache = true;
        self
    }

    /// Whether the candidate should be persisted
    pub fn applied_flag(&self) -> bool {
        self.status == OutcomeStatus::Applied
    }

    /// One-line summary used in audit logs
    pub fn summary(&self) -> String {
        let source = self.source.map(|s| s.as_str()).unwrap_or("none");
        match self.status {
            OutcomeStatus::Applied => format!(
                "applied via {}{} (overall {:.2}, {})",
                source,
                if self.from_cache { " [cache]" } else { "" },
                self.quality.overall(),
                self.quality.confidence()
            ),
            OutcomeStatus::Rejected => format!(
                "rejected from {} (overall {:.2}): {}",
                source,
                self.quality.overall(),
                self.rejection_reason.as_deref().unwrap_or("no reason recorded")
            ),
            OutcomeStatus::Unchanged => "unchanged".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfidenceClass, UnitId};

    fn unit() -> CorrectableUnit {
        CorrectableUnit::new(UnitId::body(0), 0, "teh cat")
    }

    #[test]
    fn test_applied_outcome() {
        let outcome =
            CorrectionOutcome::applied(&unit(), "the cat", QualityScore::perfect(), SourceId::Dictionary);
        assert!(outcome.applied_flag());
        assert_eq!(outcome.original, "teh cat");
        assert_eq!(outcome.candidate, "the cat");
        assert!(outcome.rejection_reason.is_none());
        assert!(outcome.summary().starts_with("applied via dictionary"));
    }

    #[test]
    fn test_rejected_outcome() {
        let outcome = CorrectionOutcome::rejected(
            &unit(),
            "",
            QualityScore::failure("boom"),
            SourceId::Llm,
            "Exception: boom",
        );
        assert!(!outcome.applied_flag());
        assert_eq!(outcome.status, OutcomeStatus::Rejected);
        assert!(outcome.summary().contains("Exception: boom"));
    }

    #[test]
    fn test_unchanged_outcome() {
        let outcome = CorrectionOutcome::unchanged(&unit());
        assert!(!outcome.applied_flag());
        assert_eq!(outcome.candidate, outcome.original);
        assert_eq!(outcome.quality.confidence(), ConfidenceClass::VeryHigh);
        assert!(outcome.source.is_none());
    }

    #[test]
    fn test_cache_marker() {
        let outcome = CorrectionOutcome::applied(&unit(), "the cat", QualityScore::perfect(), SourceId::Llm)
            .with_cache_hit();
        assert!(outcome.from_cache);
        assert!(outcome.summary().contains("[cache]"));
    }
}
