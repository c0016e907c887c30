//! Document run state machine
//!
//! `Idle -> Loading -> Batching -> Completed | Failed`

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use scrivener_cascade::CorrectionCascade;
use scrivener_domain::traits::DocumentSource;
use scrivener_domain::{CorrectableUnit, CorrectionOutcome, OutcomeStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{BatchSession, OrchestratorConfig, OrchestratorError, RunReport};

/// Lifecycle state of a document run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Reading units from the document
    Loading,
    /// Correcting units batch by batch
    Batching,
    /// Success-rate gate met
    Completed,
    /// Success-rate gate missed, or the document could not be read
    Failed,
}

impl RunState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Loading => "loading",
            RunState::Batching => "batching",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Apply the success-rate gate
///
/// Returns the success rate (0 when nothing was processed) and the final
/// state. A run with no units is a trivial success.
///
/// # Examples
///
/// ```
/// use scrivener_orchestrator::{evaluate_success, RunState};
///
/// assert_eq!(evaluate_success(100, 79, 0.80).1, RunState::Failed);
/// assert_eq!(evaluate_success(100, 80, 0.80).1, RunState::Completed);
/// ```
pub fn evaluate_success(processed: usize, successes: usize, min_success_rate: f64) -> (f64, RunState) {
    if processed == 0 {
        return (0.0, RunState::Completed);
    }
    let rate = successes as f64 / processed as f64;
    let state = if rate < min_success_rate {
        RunState::Failed
    } else {
        RunState::Completed
    };
    (rate, state)
}

/// Drives a document through the correction cascade
///
/// Units are split into fixed-size batches. Within a batch up to `workers`
/// units are corrected concurrently and outcomes are recorded in completion
/// order; the next batch starts only once the current one has finished.
/// Cancellation is checked between batches.
pub struct Orchestrator {
    config: OrchestratorConfig,
    cascade: Arc<CorrectionCascade>,
    cancel: CancellationToken,
    state: RunState,
    session: Arc<BatchSession>,
}

impl Orchestrator {
    /// Create an orchestrator over a configured cascade
    pub fn new(
        config: OrchestratorConfig,
        cascade: Arc<CorrectionCascade>,
    ) -> Result<Self, OrchestratorError> {
        config.validate().map_err(OrchestratorError::Config)?;
        Ok(Self {
            config,
            cascade,
            cancel: CancellationToken::new(),
            state: RunState::Idle,
            session: Arc::new(BatchSession::new()),
        })
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the run after the current batch
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Get the configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Session of the current (or last) run
    pub fn session(&self) -> Arc<BatchSession> {
        self.session.clone()
    }

    /// Run the document through the cascade
    ///
    /// Returns a report for both `Completed` and `Failed` runs; use
    /// [`RunReport::ensure_completed`] to turn a missed success-rate gate into
    /// an error. Only a document that cannot be read or a crashed worker end
    /// the run with an error.
    pub async fn run<D>(&mut self, document: &mut D) -> Result<RunReport, OrchestratorError>
    where
        D: DocumentSource,
        D::Error: fmt::Display,
    {
        let run_id = Uuid::now_v7();
        let started = Instant::now();
        self.session = Arc::new(BatchSession::new());

        // 1. Loading
        self.state = RunState::Loading;
        let units = match document.list_correctable_units() {
            Ok(units) => units,
            Err(e) => {
                self.state = RunState::Failed;
                return Err(OrchestratorError::Document(e.to_string()));
            }
        };
        let total_units = units.len();
        info!(%run_id, units = total_units, "Document loaded");

        // 2. Batching
        let mut cancelled = false;
        if !units.is_empty() {
            self.state = RunState::Batching;
            let batch_count = total_units.div_ceil(self.config.batch_size);

            for (index, batch) in units.chunks(self.config.batch_size).enumerate() {
                if self.cancel.is_cancelled() {
                    warn!(%run_id, batch = index + 1, "Run cancelled, no further batches started");
                    cancelled = true;
                    break;
                }

                debug!(batch = index + 1, of = batch_count, size = batch.len(), "Starting batch");
                if let Err(e) = self.run_batch(batch, document).await {
                    self.state = RunState::Failed;
                    return Err(e);
                }
            }
        }

        // 3. Success-rate gate
        let counters = self.session.counters();
        let (success_rate, state) = evaluate_success(
            counters.processed,
            counters.successes(self.config.count_unchanged_as_success),
            self.config.min_success_rate,
        );
        self.state = state;

        let report = RunReport {
            run_id,
            state,
            total_units,
            processed: counters.processed,
            applied: counters.applied,
            rejected: counters.rejected,
            unchanged: counters.unchanged,
            cache_hits: counters.cache_hits,
            success_rate,
            min_success_rate: self.config.min_success_rate,
            cancelled,
            dry_run: self.config.dry_run,
            duration_ms: started.elapsed().as_millis() as u64,
            applied_by_source: counters.applied_by_source,
            audit: self.session.audit_log(),
        };

        info!(
            %run_id,
            state = %report.state,
            processed = report.processed,
            applied = report.applied,
            rejected = report.rejected,
            success_rate = report.success_rate,
            "Run finished"
        );
        Ok(report)
    }

    /// Correct one batch and record outcomes as they complete
    async fn run_batch<D>(
        &self,
        batch: &[CorrectableUnit],
        document: &mut D,
    ) -> Result<(), OrchestratorError>
    where
        D: DocumentSource,
        D::Error: fmt::Display,
    {
        let permits = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();

        for unit in batch {
            let unit = unit.clone();
            let cascade = self.cascade.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                cascade.correct(&unit).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| OrchestratorError::Worker(e.to_string()))?;
            let outcome = self.persist(outcome, document);
            self.session.record(&outcome);
        }
        Ok(())
    }

    /// Write an applied correction back to the document
    ///
    /// A failed write turns the outcome into a rejection.
    fn persist<D>(&self, mut outcome: CorrectionOutcome, document: &mut D) -> CorrectionOutcome
    where
        D: DocumentSource,
        D::Error: fmt::Display,
    {
        if outcome.status != OutcomeStatus::Applied || self.config.dry_run {
            return outcome;
        }

        if let Err(e) = document.apply_correction(&outcome.unit_id, &outcome.candidate) {
            warn!(unit = %outcome.unit_id, error = %e, "Failed to apply correction");
            outcome.status = OutcomeStatus::Rejected;
            outcome.rejection_reason = Some(format!("Failed to apply correction: {}", e));
        }
        outcome
    }
}
