//! Scrivener Correction Orchestrator
//!
//! Runs every correctable unit of a document through the correction cascade
//! on a bounded worker pool and decides whether the run succeeded.
//!
//! # Run lifecycle
//!
//! | State | What happens |
//! |-------|--------------|
//! | **Idle** | Nothing started |
//! | **Loading** | Units are listed from the document once |
//! | **Batching** | Fixed-size batches run one after another; units within a batch run concurrently |
//! | **Completed** | `applied / processed` reached `min_success_rate` (or there were no units) |
//! | **Failed** | The success rate fell short, or the document could not be read |
//!
//! Counters and the audit log live in a [`BatchSession`]; the finished run is
//! summarized in a [`RunReport`] for the reporting collaborator.
//!
//! # Examples
//!
//! ```
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use std::sync::Arc;
//! use scrivener_cache::{CacheConfig, SimilarityCache};
//! use scrivener_cascade::{CascadeConfig, CorrectionCascade, DictionarySource};
//! use scrivener_orchestrator::{MemoryDocument, Orchestrator, OrchestratorConfig, RunState};
//! use scrivener_scorer::HeuristicScorer;
//!
//! let cascade = CorrectionCascade::new(
//!     CascadeConfig::conservative(),
//!     Arc::new(HeuristicScorer::default_config()),
//!     Arc::new(SimilarityCache::in_memory(CacheConfig::default())),
//! )
//! .unwrap()
//! .with_source(Arc::new(DictionarySource::builtin()));
//!
//! let mut document = MemoryDocument::new(["vlta"]);
//! let mut orchestrator = Orchestrator::new(OrchestratorConfig::default(), Arc::new(cascade)).unwrap();
//! let report = orchestrator.run(&mut document).await.unwrap();
//!
//! assert_eq!(report.state, RunState::Completed);
//! assert_eq!(document.paragraphs(), vec!["volta"]);
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod memory;
mod orchestrator;
mod report;
mod session;

pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
pub use memory::{MemoryDocument, MemoryDocumentError};
pub use orchestrator::{evaluate_success, Orchestrator, RunState};
pub use report::RunReport;
pub use session::{AuditEntry, BatchSession, SessionCounters};
