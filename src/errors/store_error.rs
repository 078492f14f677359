use thiserror::Error;

/// Failures of the backing document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}
