use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::WebhookSubscription;
use crate::errors::StoreError;

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Assigns a fresh id and stores the subscription.
    async fn insert(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<WebhookSubscription>, StoreError>;

    async fn list(&self) -> Result<Vec<WebhookSubscription>, StoreError>;

    async fn update(&self, subscription: &WebhookSubscription) -> Result<bool, StoreError>;

    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

pub struct WebhookRepo {
    pool: PgPool,
}

impl WebhookRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize webhooks table
    pub async fn init_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS webhooks (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                country TEXT NOT NULL DEFAULT '',
                event TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn to_subscription(row: sqlx::postgres::PgRow) -> WebhookSubscription {
    WebhookSubscription {
        id: row.get("id"),
        url: row.get("url"),
        country: row.get("country"),
        event: row.get("event"),
    }
}

#[async_trait]
impl SubscriptionStore for WebhookRepo {
    async fn insert(
        &self,
        mut subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, StoreError> {
        subscription.id = Uuid::new_v4().simple().to_string();

        sqlx::query(
            "INSERT INTO webhooks (id, url, country, event)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&subscription.id)
        .bind(&subscription.url)
        .bind(&subscription.country)
        .bind(&subscription.event)
        .execute(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn get(&self, id: &str) -> Result<Option<WebhookSubscription>, StoreError> {
        let row = sqlx::query("SELECT id, url, country, event FROM webhooks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(to_subscription))
    }

    async fn list(&self) -> Result<Vec<WebhookSubscription>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, url, country, event
             FROM webhooks
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_subscription).collect())
    }

    async fn update(&self, subscription: &WebhookSubscription) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE webhooks
             SET url = $2, country = $3, event = $4
             WHERE id = $1",
        )
        .bind(&subscription.id)
        .bind(&subscription.url)
        .bind(&subscription.country)
        .bind(&subscription.event)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM webhooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
