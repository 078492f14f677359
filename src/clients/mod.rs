pub mod country_client;
pub mod currency_client;
pub mod http;
pub mod weather_client;

pub use country_client::CountryClient;
pub use currency_client::CurrencyClient;
pub use http::{build_http_client, RetryPolicy};
pub use weather_client::WeatherClient;

use crate::config::Config;

/// One client per upstream provider, sharing a connection pool.
#[derive(Clone)]
pub struct Upstreams {
    pub countries: CountryClient,
    pub weather: WeatherClient,
    pub currency: CurrencyClient,
}

impl Upstreams {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        let retry = RetryPolicy::from_config(config);
        Self {
            countries: CountryClient::new(client.clone(), &config.countries_api_url, retry),
            weather: WeatherClient::new(client.clone(), &config.weather_api_url, retry),
            currency: CurrencyClient::new(client, &config.currency_api_url, retry),
        }
    }
}
