//! Run report handed to the reporting collaborator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{AuditEntry, OrchestratorError, RunState};

/// Read-only summary of a finished document run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier (UUIDv7, time-ordered)
    pub run_id: Uuid,
    /// Final state: `completed` or `failed`
    pub state: RunState,
    /// Units in the document
    pub total_units: usize,
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
    /// Success rate the gate was evaluated on
    pub success_rate: f64,
    /// Configured minimum success rate
    pub min_success_rate: f64,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
    /// Whether corrections were withheld from the document
    pub dry_run: bool,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Applied corrections per source
    pub applied_by_source: BTreeMap<String, usize>,
    /// Audit log in completion order
    pub audit: Vec<AuditEntry>,
}

impl RunReport {
    /// Whether the run passed the success-rate gate
    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    /// Turn a failed run into an error carrying the counts
    pub fn ensure_completed(&self) -> Result<(), OrchestratorError> {
        if self.is_completed() {
            Ok(())
        } else {
            Err(OrchestratorError::SuccessRateBelowThreshold {
                processed: self.processed,
                applied: self.applied,
                rejected: self.rejected,
                rate: self.success_rate,
                threshold: self.min_success_rate,
            })
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Proofreading Run Summary".to_string(),
            "========================".to_string(),
            format!("Run: {}", self.run_id),
            format!("State: {}", self.state),
            format!(
                "Processed: {} of {} units{}",
                self.processed,
                self.total_units,
                if self.cancelled { " (cancelled)" } else { "" }
            ),
            format!("Applied: {} ({} from cache)", self.applied, self.cache_hits),
            format!("Rejected: {}", self.rejected),
            format!("Unchanged: {}", self.unchanged),
            format!(
                "Success rate: {:.1}% (minimum {:.1}%)",
                self.success_rate * 100.0,
                self.min_success_rate * 100.0
            ),
            format!("Duration: {:.1}s", self.duration_ms as f64 / 1000.0),
        ];

        if self.dry_run {
            lines.push("Dry run: no corrections were written".to_string());
        }

        if !self.applied_by_source.is_empty() {
            lines.push(String::new());
            lines.push("Applied by source:".to_string());
            for (source, count) in &self.applied_by_source {
                lines.push(format!("  {}: {}", source, count));
            }
        }

        lines.join("\n")
    }
}
