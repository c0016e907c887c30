//! Cache entries

use scrivener_domain::{QualityScore, SourceId, SubScores};

/// A previously accepted correction and its quality metadata
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Fingerprint of the normalized original text
    pub fingerprint: String,

    /// Normalized original text, used for near-duplicate matching
    pub normalized: String,

    /// Original text as stored
    pub original: String,

    /// Accepted correction
    pub correction: String,

    /// Sub-scores of the accepted correction
    pub sub_scores: SubScores,

    /// Issues flagged when the correction was scored
    pub issues: Vec<String>,

    /// Source that produced the correction
    pub source: SourceId,

    /// Creation time (Unix epoch seconds)
    pub created_at: u64,

    /// Expiry time (Unix epoch seconds); the entry is live while `now < expires_at`
    pub expires_at: u64,

    /// Access sequence number, larger is more recent
    pub last_access: u64,

    /// Number of times the entry was returned by a lookup
    pub hit_count: u64,
}

impl CacheEntry {
    /// Rebuild the quality score recorded with the correction
    pub fn quality(&self) -> QualityScore {
        QualityScore::new(self.sub_scores, self.issues.clone())
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}
