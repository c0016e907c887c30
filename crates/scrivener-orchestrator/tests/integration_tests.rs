//! Integration tests for scrivener-orchestrator
//!
//! These tests run whole documents through a real cascade (heuristic scorer,
//! similarity cache, dictionary source) plus scripted sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scrivener_cache::{CacheConfig, CacheLookup, SimilarityCache};
use scrivener_cascade::{
    CascadeConfig, CorrectionCascade, CorrectionSource, DictionarySource, SourceError,
};
use scrivener_domain::{CorrectableUnit, SourceId, UnitId};
use scrivener_orchestrator::{
    MemoryDocument, Orchestrator, OrchestratorConfig, OrchestratorError, RunState,
};
use scrivener_scorer::HeuristicScorer;
use tokio_util::sync::CancellationToken;

fn dictionary_cascade(cache: Arc<SimilarityCache>) -> Arc<CorrectionCascade> {
    Arc::new(
        CorrectionCascade::new(
            CascadeConfig::conservative(),
            Arc::new(HeuristicScorer::default_config()),
            cache,
        )
        .unwrap()
        .with_source(Arc::new(DictionarySource::builtin())),
    )
}

fn memory_cache() -> Arc<SimilarityCache> {
    Arc::new(SimilarityCache::in_memory(CacheConfig::default()))
}

/// Source that cancels a token the first time it is asked
struct CancellingSource {
    token: CancellationToken,
    calls: AtomicUsize,
}

#[async_trait]
impl CorrectionSource for CancellingSource {
    fn id(&self) -> SourceId {
        SourceId::PatternRules
    }

    async fn propose(&self, _unit: &CorrectableUnit) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_concurrent_run_keeps_every_count() {
    let cache = Arc::new(SimilarityCache::in_memory(CacheConfig {
        max_entries: 10,
        similarity_threshold: 0.99,
        ..Default::default()
    }));
    let paragraphs: Vec<String> = (0..50).map(|i| format!("vlta {}", i)).collect();
    let mut document = MemoryDocument::new(paragraphs);

    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig {
            batch_size: 10,
            workers: 5,
            ..Default::default()
        },
        dictionary_cascade(cache.clone()),
    )
    .unwrap();
    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.processed, 50);
    assert_eq!(report.applied, 50);
    assert_eq!(report.audit.len(), 50);
    assert_eq!(report.applied_by_source.get("dictionary"), Some(&50));
    assert_eq!(orchestrator.state(), RunState::Completed);

    let paragraphs = document.paragraphs();
    for (i, text) in paragraphs.iter().enumerate() {
        assert_eq!(text, &format!("volta {}", i));
    }

    assert_eq!(cache.len(), 10);
    assert_eq!(cache.stats().stores, 50);
    for i in 0..50 {
        if let CacheLookup::Exact(entry) = cache.lookup(&format!("vlta {}", i)) {
            assert_eq!(entry.correction, format!("volta {}", i));
        }
    }
}

#[tokio::test]
async fn test_low_success_rate_fails_run() {
    // One fixable paragraph out of five: 20% < 80%
    let mut document = MemoryDocument::new([
        "vlta",
        "This is fine.",
        "So is this.",
        "Nothing to do here.",
        "All good.",
    ]);
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::default(), dictionary_cascade(memory_cache())).unwrap();

    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.processed, 5);
    assert_eq!(report.applied, 1);
    assert_eq!(report.unchanged, 4);
    assert!((report.success_rate - 0.2).abs() < 1e-12);

    let err = report.ensure_completed().unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::SuccessRateBelowThreshold { processed: 5, applied: 1, .. }
    ));
    let message = err.to_string();
    assert!(message.contains("processed 5"));
    assert!(message.contains("applied 1"));
    assert!(message.contains("rejected 0"));
}

#[tokio::test]
async fn test_unchanged_can_count_as_success() {
    let mut document = MemoryDocument::new(["vlta", "This is fine.", "So is this."]);
    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig {
            count_unchanged_as_success: true,
            ..Default::default()
        },
        dictionary_cascade(memory_cache()),
    )
    .unwrap();

    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.success_rate, 1.0);
    assert!(report.ensure_completed().is_ok());
}

#[tokio::test]
async fn test_empty_document_completes_trivially() {
    let mut document = MemoryDocument::new(Vec::<String>::new());
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::default(), dictionary_cascade(memory_cache())).unwrap();

    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.processed, 0);
    assert_eq!(report.success_rate, 0.0);
}

#[tokio::test]
async fn test_unreadable_document_fails_run() {
    let mut document = MemoryDocument::unavailable();
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::default(), dictionary_cascade(memory_cache())).unwrap();

    let result = orchestrator.run(&mut document).await;

    assert!(matches!(result, Err(OrchestratorError::Document(_))));
    assert_eq!(orchestrator.state(), RunState::Failed);
}

#[tokio::test]
async fn test_dry_run_leaves_document_untouched() {
    let mut document = MemoryDocument::new(["vlta", "recieve"]);
    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig {
            dry_run: true,
            ..Default::default()
        },
        dictionary_cascade(memory_cache()),
    )
    .unwrap();

    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.applied, 2);
    assert!(report.dry_run);
    assert!(document.corrections().is_empty());
    assert_eq!(document.paragraphs(), vec!["vlta", "recieve"]);
}

#[tokio::test]
async fn test_cancellation_stops_between_batches() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingSource {
        token: token.clone(),
        calls: AtomicUsize::new(0),
    });
    let cascade = Arc::new(
        CorrectionCascade::new(
            CascadeConfig::conservative(),
            Arc::new(HeuristicScorer::default_config()),
            memory_cache(),
        )
        .unwrap()
        .with_source(source.clone()),
    );

    let mut document = MemoryDocument::new(["one", "two", "three", "four", "five", "six"]);
    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig {
            batch_size: 2,
            workers: 2,
            ..Default::default()
        },
        cascade,
    )
    .unwrap()
    .with_cancellation(token);

    let report = orchestrator.run(&mut document).await.unwrap();

    // The first batch finishes; no further batch starts
    assert!(report.cancelled);
    assert_eq!(report.total_units, 6);
    assert_eq!(report.processed, 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_audit_log_and_report_serialize() {
    let mut document = MemoryDocument::new(["vlta", "Fine as is."]);
    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig::sequential(),
        dictionary_cascade(memory_cache()),
    )
    .unwrap();

    let report = orchestrator.run(&mut document).await.unwrap();

    assert_eq!(report.audit[0].unit, UnitId::body(0).to_string());
    assert_eq!(report.audit[0].status, "applied");
    assert_eq!(report.audit[0].source.as_deref(), Some("dictionary"));
    assert_eq!(report.audit[1].status, "unchanged");

    let json = report.to_json().unwrap();
    assert!(json.contains("\"state\": \"failed\""));
    assert!(report.summary().contains("Applied: 1"));
    assert_eq!(orchestrator.session().counters().processed, 2);
}

#[test]
fn test_invalid_config_rejected() {
    let result = Orchestrator::new(
        OrchestratorConfig {
            batch_size: 0,
            ..Default::default()
        },
        dictionary_cascade(memory_cache()),
    );
    assert!(matches!(result, Err(OrchestratorError::Config(_))));
}
