//! Similarity cache
//!
//! Maps text fingerprints to previously accepted corrections. Lookups try an
//! exact fingerprint match first, then the closest stored text whose
//! normalized similarity reaches the configured threshold.
//!
//! Storage failures never reach the caller: they are logged and the
//! operation degrades to a miss (or a skipped store).

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use scrivener_domain::{QualityScore, SourceId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::fingerprint::{fingerprint, normalize};
use crate::{CacheConfig, CacheEntry, CacheError, CacheStore, MemoryStore};

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// The fingerprint matched exactly
    Exact(CacheEntry),
    /// A stored text was similar enough
    Near {
        /// The matched entry
        entry: CacheEntry,
        /// Normalized similarity to the looked-up text
        similarity: f64,
    },
    /// Nothing usable was found
    Miss,
}

impl CacheLookup {
    /// The matched entry, if any
    pub fn entry(&self) -> Option<&CacheEntry> {
        match self {
            CacheLookup::Exact(entry) | CacheLookup::Near { entry, .. } => Some(entry),
            CacheLookup::Miss => None,
        }
    }

    /// Whether the lookup missed
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheLookup::Miss)
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Exact fingerprint hits
    pub exact_hits: u64,
    /// Near-duplicate hits
    pub near_hits: u64,
    /// Misses (including degraded lookups)
    pub misses: u64,
    /// Entries written
    pub stores: u64,
    /// Entries evicted for capacity
    pub evictions: u64,
    /// Storage failures degraded to a miss or skipped store
    pub failures: u64,
}

impl CacheStats {
    /// Total lookups
    pub fn lookups(&self) -> u64 {
        self.exact_hits + self.near_hits + self.misses
    }

    /// Fraction of lookups that hit (0 when there were none)
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            (self.exact_hits + self.near_hits) as f64 / lookups as f64
        }
    }
}

/// Cache interface consumed by the correction cascade
///
/// Implementations must be safe for concurrent callers and must never fail:
/// storage problems degrade to a miss or a skipped store.
pub trait CorrectionCache: Send + Sync {
    /// Look up a correction for `text`
    fn lookup(&self, text: &str) -> CacheLookup;

    /// Store an accepted correction for `text`
    fn store(&self, text: &str, correction: &str, quality: &QualityScore, source: SourceId);

    /// Snapshot of the cache counters
    fn stats(&self) -> CacheStats;
}

struct Inner<S> {
    store: S,
    access_seq: u64,
    stats: CacheStats,
}

/// Thread-safe similarity cache over a [`CacheStore`]
pub struct SimilarityCache<S: CacheStore = MemoryStore> {
    inner: Mutex<Inner<S>>,
    config: CacheConfig,
}

/// Current Unix time in seconds
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SimilarityCache<MemoryStore> {
    /// Create an in-memory cache
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }
}

impl<S: CacheStore> SimilarityCache<S> {
    /// Create a cache over the given store
    pub fn new(mut store: S, config: CacheConfig) -> Self {
        let access_seq = match store.max_access() {
            Ok(seq) => seq,
            Err(e) => {
                warn!(error = %e, "Failed to read cache access sequence, starting from zero");
                0
            }
        };

        Self {
            inner: Mutex::new(Inner {
                store,
                access_seq,
                stats: CacheStats::default(),
            }),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<S>>, CacheError> {
        self.inner.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Look up a correction for `text`
    pub fn lookup(&self, text: &str) -> CacheLookup {
        self.lookup_at(text, now_secs())
    }

    /// Look up a correction for `text` as of `now` (Unix seconds)
    pub fn lookup_at(&self, text: &str, now: u64) -> CacheLookup {
        if !self.config.enabled {
            return CacheLookup::Miss;
        }

        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                return CacheLookup::Miss;
            }
        };

        match Self::find(&mut inner, text, now, self.config.similarity_threshold) {
            Ok(lookup) => {
                match &lookup {
                    CacheLookup::Exact(_) => inner.stats.exact_hits += 1,
                    CacheLookup::Near { similarity, .. } => {
                        debug!(similarity, "Near-duplicate cache hit");
                        inner.stats.near_hits += 1;
                    }
                    CacheLookup::Miss => inner.stats.misses += 1,
                }
                lookup
            }
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                inner.stats.failures += 1;
                inner.stats.misses += 1;
                CacheLookup::Miss
            }
        }
    }

    fn find(
        inner: &mut Inner<S>,
        text: &str,
        now: u64,
        threshold: f64,
    ) -> Result<CacheLookup, CacheError> {
        let fp = fingerprint(text);

        // 1. Exact fingerprint
        if let Some(entry) = inner.store.get(&fp)? {
            if !entry.is_expired(now) {
                let entry = Self::record_access(inner, entry)?;
                return Ok(CacheLookup::Exact(entry));
            }
        }

        // 2. Closest live entry above the similarity threshold
        let normalized = normalize(text);
        let mut best: Option<(f64, CacheEntry)> = None;
        for entry in inner.store.entries()? {
            if entry.is_expired(now) || entry.fingerprint == fp {
                continue;
            }
            let similarity = strsim::normalized_levenshtein(&normalized, &entry.normalized);
            if similarity >= threshold && best.as_ref().map_or(true, |(s, _)| similarity > *s) {
                best = Some((similarity, entry));
            }
        }

        match best {
            Some((similarity, entry)) => {
                let entry = Self::record_access(inner, entry)?;
                Ok(CacheLookup::Near { entry, similarity })
            }
            None => Ok(CacheLookup::Miss),
        }
    }

    fn record_access(inner: &mut Inner<S>, mut entry: CacheEntry) -> Result<CacheEntry, CacheError> {
        inner.access_seq += 1;
        inner.store.touch(&entry.fingerprint, inner.access_seq)?;
        entry.last_access = inner.access_seq;
        entry.hit_count += 1;
        Ok(entry)
    }

    /// Store an accepted correction for `text`
    pub fn store(&self, text: &str, correction: &str, quality: &QualityScore, source: SourceId) {
        self.store_at(text, correction, quality, source, now_secs())
    }

    /// Store an accepted correction for `text` as of `now` (Unix seconds)
    ///
    /// Overwrites any entry with the same fingerprint, sets the expiry to
    /// `now + ttl` and evicts least-recently-used entries above capacity.
    pub fn store_at(
        &self,
        text: &str,
        correction: &str,
        quality: &QualityScore,
        source: SourceId,
        now: u64,
    ) {
        if !self.config.enabled {
            return;
        }

        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!(error = %e, "Cache store failed, entry skipped");
                return;
            }
        };

        inner.access_seq += 1;
        let entry = CacheEntry {
            fingerprint: fingerprint(text),
            normalized: normalize(text),
            original: text.to_string(),
            correction: correction.to_string(),
            sub_scores: quality.sub_scores(),
            issues: quality.issues().to_vec(),
            source,
            created_at: now,
            expires_at: now.saturating_add(self.config.ttl_secs),
            last_access: inner.access_seq,
            hit_count: 0,
        };

        let result = inner.store.put(entry).and_then(|_| {
            let len = inner.store.len()?;
            if len > self.config.max_entries {
                inner.store.evict_lru(len - self.config.max_entries)
            } else {
                Ok(0)
            }
        });

        match result {
            Ok(evicted) => {
                inner.stats.stores += 1;
                inner.stats.evictions += evicted as u64;
                if evicted > 0 {
                    debug!(evicted, "Evicted least-recently-used cache entries");
                }
            }
            Err(e) => {
                warn!(error = %e, "Cache store failed, entry skipped");
                inner.stats.failures += 1;
            }
        }
    }

    /// Remove the entry with the given fingerprint, returning whether it existed
    pub fn invalidate(&self, fingerprint: &str) -> bool {
        match self.lock().and_then(|mut inner| inner.store.remove(fingerprint)) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Cache invalidate failed");
                false
            }
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        if let Err(e) = self.lock().and_then(|mut inner| inner.store.clear()) {
            warn!(error = %e, "Cache clear failed");
        }
    }

    /// Remove entries expired at `now`, returning how many were removed
    pub fn purge_expired(&self, now: u64) -> usize {
        match self.lock().and_then(|mut inner| inner.store.purge_expired(now)) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Cache purge failed");
                0
            }
        }
    }

    /// Number of stored entries (0 if the store is unavailable)
    pub fn len(&self) -> usize {
        match self.lock().and_then(|mut inner| inner.store.len()) {
            Ok(len) => len,
            Err(e) => {
                warn!(error = %e, "Cache size unavailable");
                0
            }
        }
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        match self.lock() {
            Ok(inner) => inner.stats,
            Err(_) => CacheStats::default(),
        }
    }
}

impl<S: CacheStore> CorrectionCache for SimilarityCache<S> {
    fn lookup(&self, text: &str) -> CacheLookup {
        SimilarityCache::lookup(self, text)
    }

    fn store(&self, text: &str, correction: &str, quality: &QualityScore, source: SourceId) {
        SimilarityCache::store(self, text, correction, quality, source)
    }

    fn stats(&self) -> CacheStats {
        SimilarityCache::stats(self)
    }
}
