//! Cached search results
//!
//! Track searches against external providers are expensive, so results are
//! cached in a secondary database. Staleness is decided at read time against
//! a caller-supplied maximum age; stored rows are never evicted by reads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::SearchResultId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    /// When this payload was produced.
    pub cached_at: DateTime<Utc>,
    /// Provider response, serialized as JSON.
    pub payload: serde_json::Value,
}

impl SearchResult {
    pub fn new(id: SearchResultId, payload: serde_json::Value) -> Self {
        Self {
            id,
            cached_at: Utc::now(),
            payload,
        }
    }

    /// Overrides the cache timestamp. Tests use this to age entries without
    /// sleeping.
    pub fn with_cached_at(mut self, at: DateTime<Utc>) -> Self {
        self.cached_at = at;
        self
    }

    /// Whether this entry is still acceptable for a read at `now` with the
    /// given maximum age. A negative `max_age_millis` means never expire.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age_millis: i64) -> bool {
        if max_age_millis < 0 {
            return true;
        }
        now.signed_duration_since(self.cached_at) <= Duration::milliseconds(max_age_millis)
    }
}
