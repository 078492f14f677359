use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use super::http::{fetch_with_retry, join_url, probe, send_json, RetryPolicy};
use crate::domain::RateTable;
use crate::errors::FetchError;

const SERVICE: &str = "currency API";

#[derive(Clone)]
pub struct CurrencyClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl CurrencyClient {
    pub fn new(client: Client, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            retry,
        }
    }

    /// Fetch all exchange rates for one base currency
    pub async fn fetch_rates(&self, base: &str) -> Result<RateTable, FetchError> {
        let base = base.trim().to_uppercase();
        let url = join_url(SERVICE, &self.base_url, &[base.as_str()])?;
        info!("Fetching exchange rates from: {}", url);

        fetch_with_retry(|| send_json(SERVICE, self.client.get(url.clone())), self.retry).await
    }

    pub async fn status(&self) -> u16 {
        match join_url(SERVICE, &self.base_url, &["NOK"]) {
            Ok(url) => probe(&self.client, url.as_str()).await,
            Err(e) => {
                warn!("Status probe skipped: {}", e);
                StatusCode::SERVICE_UNAVAILABLE.as_u16()
            }
        }
    }
}
