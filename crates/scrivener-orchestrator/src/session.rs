//! Batch session: counters and audit log of one document run

use scrivener_domain::{CorrectionOutcome, OutcomeStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// One audit-log line, appended per completed unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in completion order
    pub sequence: usize,
    /// Unit identifier (`section#index`)
    pub unit: String,
    /// `applied`, `rejected` or `unchanged`
    pub status: String,
    /// Source of the candidate, if any
    pub source: Option<String>,
    /// Overall quality score
    pub overall: f64,
    /// Confidence class
    pub confidence: String,
    /// Issues flagged by the scorer
    pub issues: Vec<String>,
    /// Rejection reason
    pub reason: Option<String>,
    /// Served from the similarity cache
    pub from_cache: bool,
    /// Original text
    pub original: String,
    /// Candidate text
    pub candidate: String,
    /// Unix seconds at which the unit completed
    pub timestamp: u64,
}

impl AuditEntry {
    fn from_outcome(sequence: usize, outcome: &CorrectionOutcome) -> Self {
        Self {
            sequence,
            unit: outcome.unit_id.to_string(),
            status: outcome.status.as_str().to_string(),
            source: outcome.source.map(|s| s.as_str().to_string()),
            overall: outcome.quality.overall(),
            confidence: outcome.quality.confidence().as_str().to_string(),
            issues: outcome.quality.issues().to_vec(),
            reason: outcome.rejection_reason.clone(),
            from_cache: outcome.from_cache,
            original: outcome.original.clone(),
            candidate: outcome.candidate.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

/// Aggregate counters of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Units completed
    pub processed: usize,
    /// Units with an applied correction
    pub applied: usize,
    /// Units whose candidates were all rejected
    pub rejected: usize,
    /// Units no source changed
    pub unchanged: usize,
    /// Applied corrections served from the cache
    pub cache_hits: usize,
    /// Applied corrections per source
    pub applied_by_source: BTreeMap<String, usize>,
}

impl SessionCounters {
    fn record(&mut self, outcome: &CorrectionOutcome) {
        self.processed += 1;
        match outcome.status {
            OutcomeStatus::Applied => {
                self.applied += 1;
                if outcome.from_cache {
                    self.cache_hits += 1;
                }
                if let Some(source) = outcome.source {
                    *self
                        .applied_by_source
                        .entry(source.as_str().to_string())
                        .or_insert(0) += 1;
                }
            }
            OutcomeStatus::Rejected => self.rejected += 1,
            OutcomeStatus::Unchanged => self.unchanged += 1,
        }
    }

    /// Successes under the given counting rule
    pub fn successes(&self, count_unchanged: bool) -> usize {
        if count_unchanged {
            self.applied + self.unchanged
        } else {
            self.applied
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    counters: SessionCounters,
    audit: Vec<AuditEntry>,
}

/// Counters and audit log shared by the workers of one run
///
/// Every [`record`](Self::record) updates the counters and appends the
/// audit entry under one lock, so the two never disagree.
#[derive(Debug, Default)]
pub struct BatchSession {
    state: Mutex<SessionState>,
}

impl BatchSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed unit
    pub fn record(&self, outcome: &CorrectionOutcome) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.counters.record(outcome);
        let sequence = state.audit.len();
        state.audit.push(AuditEntry::from_outcome(sequence, outcome));
    }

    /// Snapshot of the counters
    pub fn counters(&self) -> SessionCounters {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .counters
            .clone()
    }

    /// Snapshot of the audit log, in completion order
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .audit
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_domain::{CorrectableUnit, QualityScore, SourceId, UnitId};
    use std::sync::Arc;

    fn unit(index: usize) -> CorrectableUnit {
        CorrectableUnit::new(UnitId::body(index), index as u64, "vlta")
    }

    #[test]
    fn test_record_counts_by_status() {
        let session = BatchSession::new();
        session.record(&CorrectionOutcome::applied(
            &unit(0),
            "volta",
            QualityScore::perfect(),
            SourceId::Dictionary,
        ));
        session.record(
            &CorrectionOutcome::applied(&unit(1), "volta", QualityScore::perfect(), SourceId::Dictionary)
                .with_cache_hit(),
        );
        session.record(&CorrectionOutcome::rejected(
            &unit(2),
            "vltaa",
            QualityScore::failure("boom"),
            SourceId::Llm,
            "Exception: boom",
        ));
        session.record(&CorrectionOutcome::unchanged(&unit(3)));

        let counters = session.counters();
        assert_eq!(counters.processed, 4);
        assert_eq!(counters.applied, 2);
        assert_eq!(counters.rejected, 1);
        assert_eq!(counters.unchanged, 1);
        assert_eq!(counters.cache_hits, 1);
        assert_eq!(counters.applied_by_source.get("dictionary"), Some(&2));
        assert_eq!(counters.successes(false), 2);
        assert_eq!(counters.successes(true), 3);

        let audit = session.audit_log();
        assert_eq!(audit.len(), 4);
        assert_eq!(audit[2].status, "rejected");
        assert_eq!(audit[2].reason.as_deref(), Some("Exception: boom"));
        assert_eq!(audit[3].sequence, 3);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let session = Arc::new(BatchSession::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let session = session.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        session.record(&CorrectionOutcome::unchanged(&unit(t * 25 + i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(session.counters().processed, 200);
        let audit = session.audit_log();
        assert!(audit.iter().enumerate().all(|(i, e)| e.sequence == i));
    }
}
