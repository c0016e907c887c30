//! SQLite cache backend

use rusqlite::{params, Connection, OptionalExtension, Row};
use scrivener_domain::{SourceId, SubScores};
use std::path::Path;

use crate::{CacheEntry, CacheError, CacheStore};

const COLUMNS: &str = "fingerprint, normalized, original, correction, content, grammar, style, safety,
     issues, source, created_at, expires_at, last_access, hit_count";

/// SQLite-backed cache store
///
/// Entries survive process restarts, so repeated runs over the same document
/// reuse earlier accepted corrections until they expire.
///
/// # Examples
///
/// ```no_run
/// use scrivener_cache::{CacheConfig, SimilarityCache, SqliteStore};
///
/// let store = SqliteStore::new("scrivener-cache.db").unwrap();
/// let cache = SimilarityCache::new(store, CacheConfig::default());
/// ```
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a cache database at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), CacheError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CacheEntry> {
        let issues_json: String = row.get(8)?;
        let issues: Vec<String> = serde_json::from_str(&issues_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let source_str: String = row.get(9)?;
        let source = SourceId::parse(&source_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                9,
                rusqlite::types::Type::Text,
                Box::new(CacheError::InvalidData(format!("Unknown source: {}", source_str))),
            )
        })?;

        Ok(CacheEntry {
            fingerprint: row.get(0)?,
            normalized: row.get(1)?,
            original: row.get(2)?,
            correction: row.get(3)?,
            sub_scores: SubScores {
                content: row.get(4)?,
                grammar: row.get(5)?,
                style: row.get(6)?,
                safety: row.get(7)?,
            },
            issues,
            source,
            created_at: row.get::<_, i64>(10)? as u64,
            expires_at: row.get::<_, i64>(11)? as u64,
            last_access: row.get::<_, i64>(12)? as u64,
            hit_count: row.get::<_, i64>(13)? as u64,
        })
    }
}

impl CacheStore for SqliteStore {
    fn get(&mut self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {} FROM cache_entries WHERE fingerprint = ?1", COLUMNS),
                params![fingerprint],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn put(&mut self, entry: CacheEntry) -> Result<(), CacheError> {
        let issues = serde_json::to_string(&entry.issues)
            .map_err(|e| CacheError::InvalidData(format!("Failed to encode issues: {}", e)))?;

        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO cache_entries ({}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                COLUMNS
            ),
            params![
                &entry.fingerprint,
                &entry.normalized,
                &entry.original,
                &entry.correction,
                entry.sub_scores.content,
                entry.sub_scores.grammar,
                entry.sub_scores.style,
                entry.sub_scores.safety,
                &issues,
                entry.source.as_str(),
                entry.created_at as i64,
                entry.expires_at as i64,
                entry.last_access as i64,
                entry.hit_count as i64,
            ],
        )?;
        Ok(())
    }

    fn touch(&mut self, fingerprint: &str, access: u64) -> Result<(), CacheError> {
        self.conn.execute(
            "UPDATE cache_entries SET last_access = ?1, hit_count = hit_count + 1 WHERE fingerprint = ?2",
            params![access as i64, fingerprint],
        )?;
        Ok(())
    }

    fn remove(&mut self, fingerprint: &str) -> Result<bool, CacheError> {
        let removed = self.conn.execute(
            "DELETE FROM cache_entries WHERE fingerprint = ?1",
            params![fingerprint],
        )?;
        Ok(removed > 0)
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.conn.execute("DELETE FROM cache_entries", [])?;
        Ok(())
    }

    fn entries(&mut self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM cache_entries", COLUMNS))?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn len(&mut self) -> Result<usize, CacheError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn evict_lru(&mut self, count: usize) -> Result<usize, CacheError> {
        let removed = self.conn.execute(
            "DELETE FROM cache_entries WHERE fingerprint IN (
                 SELECT fingerprint FROM cache_entries ORDER BY last_access ASC LIMIT ?1
             )",
            params![count as i64],
        )?;
        Ok(removed)
    }

    fn purge_expired(&mut self, now: u64) -> Result<usize, CacheError> {
        let removed = self.conn.execute(
            "DELETE FROM cache_entries WHERE expires_at <= ?1",
            params![now as i64],
        )?;
        Ok(removed)
    }

    fn max_access(&mut self) -> Result<u64, CacheError> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(last_access) FROM cache_entries",
            [],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0) as u64)
    }
}
