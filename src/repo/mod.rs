pub mod cache_repo;
pub mod memory;
pub mod registration_repo;
pub mod webhook_repo;

use sqlx::PgPool;
use std::sync::Arc;

pub use cache_repo::{CacheRepo, CacheStore};
pub use memory::{MemoryCacheStore, MemoryRegistrationStore, MemorySubscriptionStore};
pub use registration_repo::{RegistrationRepo, RegistrationStore};
pub use webhook_repo::{SubscriptionStore, WebhookRepo};

use crate::errors::StoreError;

/// Handles to every persistent collection, shared by all components.
#[derive(Clone)]
pub struct Storage {
    pub cache: Arc<dyn CacheStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
}

impl Storage {
    pub fn memory() -> Self {
        Self {
            cache: Arc::new(MemoryCacheStore::new()),
            registrations: Arc::new(MemoryRegistrationStore::new()),
            subscriptions: Arc::new(MemorySubscriptionStore::new()),
        }
    }

    /// Creates missing tables before handing out the repos.
    pub async fn postgres(pool: PgPool) -> Result<Self, StoreError> {
        let cache = CacheRepo::new(pool.clone());
        cache.init_tables().await?;
        tracing::info!("Cache tables initialized");

        let registrations = RegistrationRepo::new(pool.clone());
        registrations.init_tables().await?;
        tracing::info!("Registration tables initialized");

        let subscriptions = WebhookRepo::new(pool);
        subscriptions.init_tables().await?;
        tracing::info!("Webhook tables initialized");

        Ok(Self {
            cache: Arc::new(cache),
            registrations: Arc::new(registrations),
            subscriptions: Arc::new(subscriptions),
        })
    }
}
