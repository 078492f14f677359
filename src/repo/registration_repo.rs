use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::Registration;
use crate::errors::StoreError;

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Assigns a fresh id and stores the registration.
    async fn insert(&self, registration: Registration) -> Result<Registration, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Registration>, StoreError>;

    async fn list(&self) -> Result<Vec<Registration>, StoreError>;

    /// Overwrites an existing registration. Returns false when the id is unknown.
    async fn replace(&self, registration: Registration) -> Result<bool, StoreError>;

    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

pub struct RegistrationRepo {
    pool: PgPool,
}

impl RegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize registrations table
    pub async fn init_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS registrations (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                last_change TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn decode(row: &sqlx::postgres::PgRow) -> Result<Registration, StoreError> {
    let document: String = row.get("document");
    Ok(serde_json::from_str(&document)?)
}

#[async_trait]
impl RegistrationStore for RegistrationRepo {
    async fn insert(&self, mut registration: Registration) -> Result<Registration, StoreError> {
        registration.id = Uuid::new_v4().simple().to_string();
        let document = serde_json::to_string(&registration)?;

        sqlx::query(
            "INSERT INTO registrations (id, document, last_change)
             VALUES ($1, $2, $3)",
        )
        .bind(&registration.id)
        .bind(document)
        .bind(registration.last_change)
        .execute(&self.pool)
        .await?;

        Ok(registration)
    }

    async fn get(&self, id: &str) -> Result<Option<Registration>, StoreError> {
        let row = sqlx::query("SELECT document FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<Registration>, StoreError> {
        let rows = sqlx::query("SELECT document FROM registrations ORDER BY last_change DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode).collect()
    }

    async fn replace(&self, registration: Registration) -> Result<bool, StoreError> {
        let document = serde_json::to_string(&registration)?;

        let result = sqlx::query(
            "UPDATE registrations
             SET document = $2, last_change = $3
             WHERE id = $1",
        )
        .bind(&registration.id)
        .bind(document)
        .bind(registration.last_change)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
