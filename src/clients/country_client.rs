use reqwest::{Client, StatusCode, Url};
use tracing::{info, warn};

use super::http::{fetch_with_retry, join_url, probe, send_json, RetryPolicy};
use crate::domain::{CountryInfo, CountryQuery};
use crate::errors::FetchError;

const SERVICE: &str = "countries API";

#[derive(Clone)]
pub struct CountryClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl CountryClient {
    pub fn new(client: Client, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            retry,
        }
    }

    fn url_for(&self, query: &CountryQuery) -> Result<Url, FetchError> {
        match query {
            CountryQuery::Code(code) => {
                join_url(SERVICE, &self.base_url, &["alpha", code.as_str()])
            }
            CountryQuery::Name(name) => {
                join_url(SERVICE, &self.base_url, &["name", name.as_str()])
            }
        }
    }

    /// Fetch the matching country records, best match first
    pub async fn fetch(&self, query: &CountryQuery) -> Result<Vec<CountryInfo>, FetchError> {
        let url = self.url_for(query)?;
        info!("Fetching country data from: {}", url);

        fetch_with_retry(|| send_json(SERVICE, self.client.get(url.clone())), self.retry).await
    }

    pub async fn status(&self) -> u16 {
        match self.url_for(&CountryQuery::Code("no".into())) {
            Ok(url) => probe(&self.client, url.as_str()).await,
            Err(e) => {
                warn!("Status probe skipped: {}", e);
                StatusCode::SERVICE_UNAVAILABLE.as_u16()
            }
        }
    }
}
