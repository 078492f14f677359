use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::cache_ttl;
use crate::errors::{FetchError, StoreError};
use crate::repo::CacheStore;

/// Typed cache-aside access on top of a [`CacheStore`].
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

/// A value together with where it came from.
#[derive(Debug)]
pub struct Fetched<T> {
    pub value: T,
    pub from_cache: bool,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: cache_ttl(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Any store failure or expired entry is reported as a miss.
    pub async fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Result<T, FetchError> {
        let entry = match self.store.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return Err(FetchError::CacheMiss(key.to_string())),
            Err(e) => {
                warn!("Cache read for key {} failed, treating as miss: {}", key, e);
                return Err(FetchError::CacheMiss(key.to_string()));
            }
        };

        if !entry.is_valid(self.ttl) {
            return Err(FetchError::CacheMiss(key.to_string()));
        }

        Ok(serde_json::from_str(&entry.data)?)
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_string(value)?;
        self.store.put(key, data).await
    }

    /// Serves `key` from the cache, or runs `fetch` and caches its result.
    ///
    /// Failed fetches are never cached. A failed cache write is logged and the
    /// fetched value still returned.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, fetch: F) -> Result<Fetched<T>, FetchError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        match self.get_cached::<T>(key).await {
            Ok(value) => {
                info!("Cache hit for key: {}", key);
                return Ok(Fetched {
                    value,
                    from_cache: true,
                });
            }
            Err(FetchError::CacheMiss(_)) => info!("Cache miss for key: {}", key),
            Err(e) => warn!("Unreadable cache entry for key {}, refetching: {}", key, e),
        }

        let value = fetch().await?;

        if let Err(e) = self.put(key, &value).await {
            warn!("Failed to cache data for key {}: {}", key, e);
        }

        Ok(Fetched {
            value,
            from_cache: false,
        })
    }
}
