use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::domain::expiry_threshold;
use crate::errors::StoreError;
use crate::repo::CacheStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub purged: usize,
    pub failed: usize,
}

/// Deletes every cache entry older than `ttl`.
///
/// Individual delete failures are counted and skipped; only failing to list
/// expired entries aborts the sweep.
pub async fn purge_expired(store: &dyn CacheStore, ttl: Duration) -> Result<PurgeReport, StoreError> {
    let threshold = expiry_threshold(ttl, Utc::now());
    let keys = store.expired_keys(threshold).await?;

    let mut report = PurgeReport::default();
    for key in keys {
        match store.delete_if_older(&key, threshold).await {
            Ok(true) => report.purged += 1,
            // Rewritten since it was listed
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to delete cache entry {}: {}", key, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Purged {} cache entries ({} failed)",
        report.purged, report.failed
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{cache_ttl, CacheEntry};
    use crate::repo::MemoryCacheStore;
    use async_trait::async_trait;
    use chrono::DateTime;

    async fn seed(store: &MemoryCacheStore, key: &str, age: Duration) {
        let mut entry = CacheEntry::new(key, "{}");
        entry.timestamp = Utc::now() - age;
        store.insert_entry(entry).await;
    }

    #[tokio::test]
    async fn removes_all_and_only_expired_entries() {
        let store = MemoryCacheStore::new();
        seed(&store, "fresh", Duration::minutes(5)).await;
        seed(&store, "almost", cache_ttl() - Duration::minutes(1)).await;
        seed(&store, "old", cache_ttl() + Duration::minutes(1)).await;
        seed(&store, "ancient", Duration::days(30)).await;

        let report = purge_expired(&store, cache_ttl()).await.unwrap();

        assert_eq!(report, PurgeReport { purged: 2, failed: 0 });
        assert!(store.contains("fresh").await);
        assert!(store.contains("almost").await);
        assert!(!store.contains("old").await);
        assert!(!store.contains("ancient").await);
    }

    /// Refuses to delete one particular key.
    struct FlakyStore {
        inner: MemoryCacheStore,
        stuck: &'static str,
    }

    #[async_trait]
    impl CacheStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, data: String) -> Result<(), StoreError> {
            self.inner.put(key, data).await
        }

        async fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
            self.inner.expired_keys(threshold).await
        }

        async fn delete_if_older(
            &self,
            key: &str,
            threshold: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            if key == self.stuck {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.delete_if_older(key, threshold).await
        }
    }

    #[tokio::test]
    async fn failed_delete_does_not_abort_sweep() {
        let store = FlakyStore {
            inner: MemoryCacheStore::new(),
            stuck: "b",
        };
        for key in ["a", "b", "c"] {
            seed(&store.inner, key, Duration::days(1)).await;
        }

        let report = purge_expired(&store, cache_ttl()).await.unwrap();

        assert_eq!(report, PurgeReport { purged: 2, failed: 1 });
        assert!(store.inner.contains("b").await);
        assert_eq!(store.inner.len().await, 1);
    }
}
