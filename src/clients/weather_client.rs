use reqwest::Client;
use tracing::info;

use super::http::{fetch_with_retry, probe, send_json, RetryPolicy};
use crate::domain::{Coordinates, WeatherSeries};
use crate::errors::FetchError;

const SERVICE: &str = "weather API";
const DAILY_FIELDS: &str = "temperature_2m_mean,precipitation_probability_mean";

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl WeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            retry,
        }
    }

    /// Fetch the daily forecast series for a location
    pub async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherSeries, FetchError> {
        info!(
            "Fetching weather for lat={} lon={} from: {}",
            coordinates.latitude, coordinates.longitude, self.base_url
        );

        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        fetch_with_retry(
            || {
                send_json(
                    SERVICE,
                    self.client.get(&self.base_url).query(&[
                        ("latitude", latitude.as_str()),
                        ("longitude", longitude.as_str()),
                        ("daily", DAILY_FIELDS),
                    ]),
                )
            },
            self.retry,
        )
        .await
    }

    pub async fn status(&self) -> u16 {
        let url = format!(
            "{}?latitude=52.52&longitude=13.41&daily={}",
            self.base_url, DAILY_FIELDS
        );
        probe(&self.client, &url).await
    }
}
