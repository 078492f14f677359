//! In-process implementations of the store traits, used with
//! `STORAGE_BACKEND=memory` and throughout the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CacheStore, RegistrationStore, SubscriptionStore};
use crate::domain::{CacheEntry, Registration, WebhookSubscription};
use crate::errors::StoreError;

#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry with its timestamp untouched.
    pub async fn insert_entry(&self, entry: CacheEntry) {
        self.entries.write().await.insert(entry.key.clone(), entry);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, data: String) -> Result<(), StoreError> {
        self.insert_entry(CacheEntry::new(key, data)).await;
        Ok(())
    }

    async fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| entry.timestamp < threshold)
            .map(|entry| entry.key.clone())
            .collect())
    }

    async fn delete_if_older(
        &self,
        key: &str,
        threshold: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.timestamp < threshold => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryRegistrationStore {
    registrations: RwLock<HashMap<String, Registration>>,
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn insert(&self, mut registration: Registration) -> Result<Registration, StoreError> {
        registration.id = Uuid::new_v4().simple().to_string();
        self.registrations
            .write()
            .await
            .insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    async fn get(&self, id: &str) -> Result<Option<Registration>, StoreError> {
        Ok(self.registrations.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Registration>, StoreError> {
        let mut all: Vec<Registration> =
            self.registrations.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.last_change.cmp(&a.last_change));
        Ok(all)
    }

    async fn replace(&self, registration: Registration) -> Result<bool, StoreError> {
        let mut registrations = self.registrations.write().await;
        match registrations.get_mut(&registration.id) {
            Some(existing) => {
                *existing = registration;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.registrations.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct MemorySubscriptionStore {
    // Insertion order keeps listings stable
    subscriptions: RwLock<Vec<WebhookSubscription>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn insert(
        &self,
        mut subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, StoreError> {
        subscription.id = Uuid::new_v4().simple().to_string();
        self.subscriptions.write().await.push(subscription.clone());
        Ok(subscription)
    }

    async fn get(&self, id: &str) -> Result<Option<WebhookSubscription>, StoreError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<WebhookSubscription>, StoreError> {
        Ok(self.subscriptions.read().await.clone())
    }

    async fn update(&self, subscription: &WebhookSubscription) -> Result<bool, StoreError> {
        let mut subscriptions = self.subscriptions.write().await;
        match subscriptions.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut subscriptions = self.subscriptions.write().await;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        Ok(subscriptions.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureFlags;

    #[tokio::test]
    async fn put_overwrites_previous_value() {
        let store = MemoryCacheStore::new();
        store.put("k", "1".into()).await.unwrap();
        store.put("k", "2".into()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().unwrap().data, "2");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn expired_keys_uses_strict_threshold() {
        let store = MemoryCacheStore::new();
        let now = Utc::now();
        let mut old = CacheEntry::new("old", "{}");
        old.timestamp = now - chrono::Duration::hours(11);
        let mut edge = CacheEntry::new("edge", "{}");
        edge.timestamp = now;
        store.insert_entry(old).await;
        store.insert_entry(edge).await;

        assert_eq!(store.expired_keys(now).await.unwrap(), vec!["old".to_string()]);
    }

    #[tokio::test]
    async fn registration_lifecycle() {
        let store = MemoryRegistrationStore::new();
        let stored = store
            .insert(Registration {
                id: String::new(),
                country: "Norway".into(),
                iso_code: "NO".into(),
                features: FeatureFlags::default(),
                last_change: Utc::now(),
            })
            .await
            .unwrap();
        assert!(!stored.id.is_empty());

        let mut changed = stored.clone();
        changed.country = "Sweden".into();
        assert!(store.replace(changed).await.unwrap());
        assert_eq!(store.get(&stored.id).await.unwrap().unwrap().country, "Sweden");

        assert!(store.delete(&stored.id).await.unwrap());
        assert!(!store.delete(&stored.id).await.unwrap());
        assert!(store.get(&stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn subscription_update_of_unknown_id_is_reported() {
        let store = MemorySubscriptionStore::new();
        let ghost = WebhookSubscription {
            id: "ghost".into(),
            url: "http://localhost".into(),
            country: String::new(),
            event: "INVOKE".into(),
        };
        assert!(!store.update(&ghost).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
