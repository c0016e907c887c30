//! The correction cascade
//!
//! Runs a unit through the configured sources in priority order, scoring and
//! gating every candidate, and stops at the first accepted one.

use std::sync::Arc;

use scrivener_cache::{CacheLookup, CacheStats, CorrectionCache};
use scrivener_domain::traits::QualityScorer;
use scrivener_domain::{CorrectableUnit, CorrectionOutcome, QualityScore, SourceId};
use scrivener_scorer::{GateDecision, Gatekeeper};
use tracing::{debug, warn};

use crate::sources::CorrectionSource;
use crate::{CascadeConfig, CascadeError};

/// Scorer shared by every worker of a run
pub type SharedScorer = Arc<dyn QualityScorer + Send + Sync>;

/// Result of scoring the candidates of one source
enum Step {
    Accepted { candidate: String, quality: QualityScore },
    Rejected { candidate: String, quality: QualityScore, reason: String },
    NoChange,
}

/// Quality-gated cascade of correction sources
///
/// # Examples
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use std::sync::Arc;
/// use scrivener_cache::{CacheConfig, SimilarityCache};
/// use scrivener_cascade::{CascadeConfig, CorrectionCascade, DictionarySource};
/// use scrivener_domain::{CorrectableUnit, OutcomeStatus, UnitId};
/// use scrivener_scorer::HeuristicScorer;
///
/// let cascade = CorrectionCascade::new(
///     CascadeConfig::conservative(),
///     Arc::new(HeuristicScorer::default_config()),
///     Arc::new(SimilarityCache::in_memory(CacheConfig::default())),
/// )
/// .unwrap()
/// .with_source(Arc::new(DictionarySource::builtin()));
///
/// let outcome = cascade.correct(&CorrectableUnit::new(UnitId::body(0), 0, "vlta")).await;
/// assert_eq!(outcome.status, OutcomeStatus::Applied);
/// assert_eq!(outcome.candidate, "volta");
/// # });
/// ```
pub struct CorrectionCascade {
    config: CascadeConfig,
    gatekeeper: Gatekeeper,
    scorer: SharedScorer,
    cache: Arc<dyn CorrectionCache>,
    sources: Vec<Arc<dyn CorrectionSource>>,
}

impl CorrectionCascade {
    /// Create a cascade with no sources
    ///
    /// Add sources with [`with_source`](Self::with_source), cheapest and most
    /// certain first.
    pub fn new(
        config: CascadeConfig,
        scorer: SharedScorer,
        cache: Arc<dyn CorrectionCache>,
    ) -> Result<Self, CascadeError> {
        config.validate().map_err(CascadeError::Config)?;
        Ok(Self {
            gatekeeper: Gatekeeper::new(config.acceptance.clone()),
            config,
            scorer,
            cache,
            sources: Vec::new(),
        })
    }

    /// Append a source at the lowest priority
    pub fn with_source(mut self, source: Arc<dyn CorrectionSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Source identifiers in priority order
    pub fn sources(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Snapshot of the cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Correct one unit
    ///
    /// Never fails: source errors become zero-quality rejections and the
    /// next source is tried with the original text.
    pub async fn correct(&self, unit: &CorrectableUnit) -> CorrectionOutcome {
        // 1. Nothing to risk, nothing to gain
        if unit.is_blank() {
            debug!(unit = %unit.id(), "Blank unit, skipping");
            return CorrectionOutcome::unchanged(unit);
        }

        // 2. Reuse an earlier accepted correction
        if let Some(outcome) = self.from_cache(unit) {
            return outcome;
        }

        // 3. Sources in priority order, always fed the original text
        let mut last_rejection = None;
        for source in &self.sources {
            let source_id = source.id();

            let candidates = match source.propose(unit).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(unit = %unit.id(), source = %source_id, error = %e, "Correction source failed");
                    last_rejection = Some(CorrectionOutcome::rejected(
                        unit,
                        unit.text(),
                        QualityScore::failure(&e),
                        source_id,
                        format!("Exception: {}", e),
                    ));
                    continue;
                }
            };

            match self.evaluate_step(unit, candidates) {
                Step::Accepted { candidate, quality } => {
                    debug!(
                        unit = %unit.id(),
                        source = %source_id,
                        overall = quality.overall(),
                        "Candidate accepted"
                    );
                    self.cache.store(unit.text(), &candidate, &quality, source_id);
                    return CorrectionOutcome::applied(unit, candidate, quality, source_id);
                }
                Step::Rejected {
                    candidate,
                    quality,
                    reason,
                } => {
                    debug!(unit = %unit.id(), source = %source_id, %reason, "Candidate rejected");
                    last_rejection = Some(CorrectionOutcome::rejected(
                        unit, candidate, quality, source_id, reason,
                    ));
                }
                Step::NoChange => {
                    debug!(unit = %unit.id(), source = %source_id, "Source proposed no change");
                }
            }
        }

        // 4. Exhausted
        last_rejection.unwrap_or_else(|| CorrectionOutcome::unchanged(unit))
    }

    /// Synthesize an outcome from the cache, if a usable entry exists
    ///
    /// An entry recorded for exactly this text keeps its stored score, which
    /// must still pass this cascade's gate. Anything else (a near duplicate,
    /// or text equal only after normalization) is re-scored against this
    /// unit and must pass the gate again.
    fn from_cache(&self, unit: &CorrectableUnit) -> Option<CorrectionOutcome> {
        let (entry, exact) = match self.cache.lookup(unit.text()) {
            CacheLookup::Exact(entry) => {
                let exact = entry.original == unit.text();
                (entry, exact)
            }
            CacheLookup::Near { entry, .. } => (entry, false),
            CacheLookup::Miss => return None,
        };

        if exact {
            let quality = entry.quality();
            return match self.gatekeeper.evaluate(&quality) {
                GateDecision::Accept => {
                    debug!(unit = %unit.id(), source = %entry.source, "Exact cache hit");
                    Some(
                        CorrectionOutcome::applied(unit, entry.correction, quality, entry.source)
                            .with_cache_hit(),
                    )
                }
                GateDecision::Reject(reason) => {
                    debug!(unit = %unit.id(), %reason, "Cached correction failed the gate");
                    None
                }
            };
        }

        if entry.correction == unit.text() {
            return None;
        }
        let quality = self.scorer.score(unit.text(), &entry.correction);
        match self.gatekeeper.evaluate(&quality) {
            GateDecision::Accept => {
                debug!(unit = %unit.id(), source = %entry.source, "Similar cache entry re-accepted");
                Some(
                    CorrectionOutcome::applied(unit, entry.correction, quality, entry.source)
                        .with_cache_hit(),
                )
            }
            GateDecision::Reject(reason) => {
                debug!(unit = %unit.id(), %reason, "Similar cache entry failed the gate");
                None
            }
        }
    }

    /// Score one source's candidates and keep the best of each kind
    fn evaluate_step(&self, unit: &CorrectableUnit, candidates: Vec<String>) -> Step {
        let original = unit.text();
        let mut scored: Vec<String> = Vec::new();
        let mut best_accepted: Option<(String, QualityScore)> = None;
        let mut best_rejected: Option<(String, QualityScore, String)> = None;

        for candidate in candidates {
            if scored.len() >= self.config.max_candidates {
                break;
            }
            if candidate == original || scored.contains(&candidate) {
                continue;
            }
            scored.push(candidate.clone());

            let quality = self.scorer.score(original, &candidate);
            match self.gatekeeper.evaluate(&quality) {
                GateDecision::Accept => {
                    let better = best_accepted
                        .as_ref()
                        .map_or(true, |(_, best)| quality.overall() > best.overall());
                    if better {
                        best_accepted = Some((candidate, quality));
                    }
                }
                GateDecision::Reject(reason) => {
                    let better = best_rejected
                        .as_ref()
                        .map_or(true, |(_, best, _)| quality.overall() > best.overall());
                    if better {
                        best_rejected = Some((candidate, quality, reason));
                    }
                }
            }
        }

        match (best_accepted, best_rejected) {
            (Some((candidate, quality)), _) => Step::Accepted { candidate, quality },
            (None, Some((candidate, quality, reason))) => Step::Rejected {
                candidate,
                quality,
                reason,
            },
            (None, None) => Step::NoChange,
        }
    }
}
