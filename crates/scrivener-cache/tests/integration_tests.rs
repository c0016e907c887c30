//! Integration tests for scrivener-cache
//!
//! These tests exercise the cache over the SQLite backend and under
//! concurrent access.

use std::sync::Arc;
use std::thread;

use scrivener_cache::{CacheConfig, CacheLookup, SimilarityCache, SqliteStore};
use scrivener_domain::{QualityScore, SourceId};
use tempfile::TempDir;

#[test]
fn test_sqlite_cache_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.db");

    {
        let cache = SimilarityCache::new(SqliteStore::new(&path).unwrap(), CacheConfig::default());
        cache.store_at("recieve the parcel", "receive the parcel", &QualityScore::perfect(), SourceId::Dictionary, 10);
    }

    let cache = SimilarityCache::new(SqliteStore::new(&path).unwrap(), CacheConfig::default());
    match cache.lookup_at("Recieve  the parcel", 11) {
        CacheLookup::Exact(entry) => {
            assert_eq!(entry.correction, "receive the parcel");
            assert_eq!(entry.hit_count, 1);
        }
        other => panic!("expected exact hit, got {:?}", other),
    }
}

#[test]
fn test_sqlite_cache_expiry_and_purge() {
    let cache = SimilarityCache::new(
        SqliteStore::new(":memory:").unwrap(),
        CacheConfig {
            ttl_secs: 60,
            ..Default::default()
        },
    );
    cache.store_at("short lived", "Short-lived", &QualityScore::perfect(), SourceId::PatternRules, 100);

    assert!(!cache.lookup_at("short lived", 159).is_miss());
    assert!(cache.lookup_at("short lived", 160).is_miss());
    assert_eq!(cache.purge_expired(160), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_sqlite_capacity_eviction() {
    let cache = SimilarityCache::new(
        SqliteStore::new(":memory:").unwrap(),
        CacheConfig {
            max_entries: 3,
            similarity_threshold: 1.0,
            ..Default::default()
        },
    );
    for i in 0..10 {
        cache.store_at(&format!("sentence number {}", i), "x", &QualityScore::perfect(), SourceId::Llm, 0);
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions, 7);
    assert!(!cache.lookup_at("sentence number 9", 1).is_miss());
    assert!(cache.lookup_at("sentence number 0", 1).is_miss());
}

#[test]
fn test_concurrent_read_after_write() {
    let cache = Arc::new(SimilarityCache::in_memory(CacheConfig {
        max_entries: 10,
        similarity_threshold: 1.0,
        ..Default::default()
    }));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let text = format!("unit {} text", i);
                let correction = format!("Unit {} text.", i);
                cache.store_at(&text, &correction, &QualityScore::perfect(), SourceId::Grammar, 0);
                // Any hit for this fingerprint must carry this unit's correction
                if let Some(entry) = cache.lookup_at(&text, 1).entry() {
                    assert_eq!(entry.correction, correction);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 10);
    let stats = cache.stats();
    assert_eq!(stats.stores, 50);
    assert_eq!(stats.lookups(), 50);
}
