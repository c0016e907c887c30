//! Scrivener Similarity Cache
//!
//! Remembers accepted corrections so repeated or near-identical text is not
//! corrected twice.
//!
//! # Architecture
//!
//! - [`SimilarityCache`] owns the locking, expiry, LRU and near-duplicate logic
//! - [`CacheStore`] backends hold the entries: [`MemoryStore`] for a single run,
//!   [`SqliteStore`] to persist across runs
//! - Keys are BLAKE3 [`fingerprint`]s of lowercased, whitespace-collapsed text
//!
//! # Examples
//!
//! ```
//! use scrivener_cache::{CacheConfig, CacheLookup, SimilarityCache};
//! use scrivener_domain::{QualityScore, SourceId};
//!
//! let cache = SimilarityCache::in_memory(CacheConfig::default());
//! cache.store("vlta", "volta", &QualityScore::perfect(), SourceId::Dictionary);
//!
//! match cache.lookup("vlta") {
//!     CacheLookup::Exact(entry) => assert_eq!(entry.correction, "volta"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod entry;
mod error;
mod fingerprint;
mod sqlite;
mod store;

pub use cache::{now_secs, CacheLookup, CacheStats, CorrectionCache, SimilarityCache};
pub use config::{CacheConfig, DEFAULT_TTL_SECS};
pub use entry::CacheEntry;
pub use error::CacheError;
pub use fingerprint::{fingerprint, normalize};
pub use sqlite::SqliteStore;
pub use store::{CacheStore, MemoryStore};
