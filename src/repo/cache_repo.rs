use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::error;

use crate::domain::CacheEntry;
use crate::errors::StoreError;

/// Key/value documents stamped with their write time.
///
/// Writes are upserts: the last physical write to a key wins. The store never
/// judges staleness, callers compare timestamps themselves.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Stores `data` under `key` stamped with the current time.
    async fn put(&self, key: &str, data: String) -> Result<(), StoreError>;

    /// Keys of all entries stamped strictly before `threshold`.
    async fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>, StoreError>;

    /// Removes `key` unless it was rewritten at or after `threshold`.
    /// Returns whether a document was removed.
    async fn delete_if_older(
        &self,
        key: &str,
        threshold: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

pub struct CacheRepo {
    pool: PgPool,
}

impl CacheRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize cache_entries table
    pub async fn init_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                stored_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        // Purge scans by timestamp
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_cache_entries_stored_at
             ON cache_entries(stored_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CacheStore for CacheRepo {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let row = sqlx::query(
            "SELECT key, data, stored_at
             FROM cache_entries
             WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await;

        match row {
            Ok(Some(r)) => Ok(Some(CacheEntry {
                key: r.get("key"),
                data: r.get("data"),
                timestamp: r.get("stored_at"),
            })),
            Ok(None) => Ok(None),
            Err(e) => {
                error!("Failed to read cache entry {}: {:?}", key, e);
                Err(e.into())
            }
        }
    }

    async fn put(&self, key: &str, data: String) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO cache_entries (key, data, stored_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (key)
             DO UPDATE SET
                data = EXCLUDED.data,
                stored_at = EXCLUDED.stored_at",
        )
        .bind(key)
        .bind(data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT key
             FROM cache_entries
             WHERE stored_at < $1",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("key")).collect())
    }

    async fn delete_if_older(
        &self,
        key: &str,
        threshold: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = $1 AND stored_at < $2")
            .bind(key)
            .bind(threshold)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
