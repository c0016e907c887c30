//! Scrivener Scorer
//!
//! Scores candidate corrections and decides whether they may be applied.
//!
//! The scorer provides:
//! - A pure, deterministic [`HeuristicScorer`] producing a four-dimension
//!   [`QualityScore`](scrivener_domain::QualityScore)
//! - Basic-integrity validation consumed by the safety dimension
//! - The [`Gatekeeper`] acceptance gate with conservative and permissive modes
//!
//! # Examples
//!
//! ```
//! use scrivener_domain::traits::QualityScorer;
//! use scrivener_scorer::{AcceptancePolicy, Gatekeeper, HeuristicScorer};
//!
//! let scorer = HeuristicScorer::default_config();
//! let gatekeeper = Gatekeeper::new(AcceptancePolicy::conservative());
//!
//! let score = scorer.score("vlta", "volta");
//! assert!(score.overall() >= 0.85);
//! assert!(gatekeeper.evaluate(&score).is_accepted());
//! ```

#![warn(missing_docs)]

mod config;
mod gate;
mod integrity;
mod scorer;
pub mod text;

pub use config::ScorerConfig;
pub use gate::{AcceptanceMode, AcceptancePolicy, GateDecision, Gatekeeper};
pub use integrity::{check_integrity, IntegrityReport};
pub use scorer::HeuristicScorer;
