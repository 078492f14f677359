use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a cached artifact stays valid.
pub const CACHE_TTL_HOURS: i64 = 10;

/// How often expired cache documents are swept.
pub const PURGE_INTERVAL_SECS: u64 = 60 * 60;

pub fn cache_ttl() -> Duration {
    Duration::hours(CACHE_TTL_HOURS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// JSON document owned by whoever wrote it.
    pub data: String,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            data: data.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.is_valid_at(ttl, Utc::now())
    }

    pub fn is_valid_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.timestamp < ttl
    }
}

/// Entries stamped before this instant are expired.
pub fn expiry_threshold(ttl: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    now - ttl
}
