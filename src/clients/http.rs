use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::FetchError;

const USER_AGENT: &str = "country-dashboard/1.0";

pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.http_timeout())
        .user_agent(USER_AGENT)
        .build()
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.http_max_retries.max(1),
            base_delay: config.http_retry_delay(),
        }
    }
}

/// Generic retry logic with exponential backoff
pub async fn fetch_with_retry<F, Fut, T>(f: F, policy: RetryPolicy) -> Result<T, FetchError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let mut delay = policy.base_delay;
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "Request succeeded on retry attempt {}/{}",
                        attempt, policy.max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) if attempt < policy.max_attempts && e.is_retryable() => {
                warn!(
                    "Request failed, retry attempt {}/{}: {}",
                    attempt, policy.max_attempts, e
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => {
                error!("Request failed after {} attempt(s): {}", attempt, e);
                return Err(e);
            }
        }
    }
}

/// Sends the request and decodes a 2xx JSON body.
pub async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::unavailable(service, None, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::unavailable(
            service,
            Some(status.as_u16()),
            format!("upstream returned status {}", status),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::unavailable(service, Some(status.as_u16()), e.to_string()))?;

    Ok(serde_json::from_str(&body)?)
}

/// Status code of a GET against `url`, 503 when the upstream cannot be reached.
pub async fn probe(client: &Client, url: &str) -> u16 {
    match client.get(url).send().await {
        Ok(response) => response.status().as_u16(),
        Err(e) => {
            warn!("Status probe of {} failed: {}", url, e);
            StatusCode::SERVICE_UNAVAILABLE.as_u16()
        }
    }
}

/// Appends path segments to a base URL, percent-encoding each one.
pub fn join_url(service: &'static str, base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| {
        FetchError::unavailable(service, None, format!("invalid base url {}: {}", base, e))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            FetchError::unavailable(service, None, format!("base url {} takes no path", base))
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
