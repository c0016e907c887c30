//! Cache storage backends

use std::collections::HashMap;

use crate::{CacheEntry, CacheError};

/// Storage backend behind a [`SimilarityCache`](crate::SimilarityCache)
///
/// Backends are used from behind the cache's lock, so methods take
/// `&mut self` and need not synchronize internally.
pub trait CacheStore: Send {
    /// Get an entry by fingerprint
    fn get(&mut self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or overwrite an entry keyed by its fingerprint
    fn put(&mut self, entry: CacheEntry) -> Result<(), CacheError>;

    /// Record an access: set the access sequence and bump the hit count
    fn touch(&mut self, fingerprint: &str, access: u64) -> Result<(), CacheError>;

    /// Remove an entry, returning whether it existed
    fn remove(&mut self, fingerprint: &str) -> Result<bool, CacheError>;

    /// Remove every entry
    fn clear(&mut self) -> Result<(), CacheError>;

    /// All entries, in no particular order
    fn entries(&mut self) -> Result<Vec<CacheEntry>, CacheError>;

    /// Number of entries
    fn len(&mut self) -> Result<usize, CacheError>;

    /// Whether the store holds no entries
    fn is_empty(&mut self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Evict the `count` least-recently-used entries, returning how many were removed
    fn evict_lru(&mut self, count: usize) -> Result<usize, CacheError>;

    /// Remove entries expired at `now`, returning how many were removed
    fn purge_expired(&mut self, now: u64) -> Result<usize, CacheError>;

    /// Largest access sequence number stored (0 when empty)
    fn max_access(&mut self) -> Result<u64, CacheError> {
        Ok(self
            .entries()?
            .iter()
            .map(|e| e.last_access)
            .max()
            .unwrap_or(0))
    }
}

/// In-memory cache backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&mut self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.get(fingerprint).cloned())
    }

    fn put(&mut self, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(entry.fingerprint.clone(), entry);
        Ok(())
    }

    fn touch(&mut self, fingerprint: &str, access: u64) -> Result<(), CacheError> {
        if let Some(entry) = self.entries.get_mut(fingerprint) {
            entry.last_access = access;
            entry.hit_count += 1;
        }
        Ok(())
    }

    fn remove(&mut self, fingerprint: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(fingerprint).is_some())
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }

    fn entries(&mut self) -> Result<Vec<CacheEntry>, CacheError> {
        Ok(self.entries.values().cloned().collect())
    }

    fn len(&mut self) -> Result<usize, CacheError> {
        Ok(self.entries.len())
    }

    fn evict_lru(&mut self, count: usize) -> Result<usize, CacheError> {
        let mut by_access: Vec<(u64, String)> = self
            .entries
            .values()
            .map(|e| (e.last_access, e.fingerprint.clone()))
            .collect();
        by_access.sort();

        let mut evicted = 0;
        for (_, fingerprint) in by_access.into_iter().take(count) {
            if self.entries.remove(&fingerprint).is_some() {
                evicted += 1;
            }
        }
        Ok(evicted)
    }

    fn purge_expired(&mut self, now: u64) -> Result<usize, CacheError> {
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(now));
        Ok(before - self.entries.len())
    }

    fn max_access(&mut self) -> Result<u64, CacheError> {
        Ok(self.entries.values().map(|e| e.last_access).max().unwrap_or(0))
    }
}
