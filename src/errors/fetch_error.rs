use thiserror::Error;

/// Outcome of a cache-aside fetch that did not produce data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Control-flow signal from the cache layer, never returned by a fetcher.
    #[error("cache miss for key '{0}'")]
    CacheMiss(String),

    #[error("{service} unavailable: {reason}")]
    UpstreamUnavailable {
        service: &'static str,
        status: Option<u16>,
        reason: String,
    },

    #[error("data not found: {0}")]
    DataNotFound(String),

    #[error("malformed payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FetchError {
    pub fn unavailable(service: &'static str, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service,
            status,
            reason: reason.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::DataNotFound(message.into())
    }

    /// Transport failures and 5xx answers are worth another attempt, everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamUnavailable { status, .. } => status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }
}
