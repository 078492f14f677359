use anyhow::{bail, Context};
use std::env;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,

    pub countries_api_url: String,
    pub currency_api_url: String,
    pub weather_api_url: String,

    // Upstream HTTP behaviour
    pub http_timeout_secs: u64,
    pub http_max_retries: usize,
    pub http_retry_delay_ms: u64,

    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => bail!("unknown STORAGE_BACKEND '{}', expected postgres or memory", other),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT '{}' is not a valid port", raw))?,
            Err(_) => defaults.server_port,
        };

        Ok(Self {
            storage_backend,
            database_url,
            countries_api_url: env::var("COUNTRIES_API_URL")
                .unwrap_or(defaults.countries_api_url),
            currency_api_url: env::var("CURRENCY_API_URL").unwrap_or(defaults.currency_api_url),
            weather_api_url: env::var("WEATHER_API_URL").unwrap_or(defaults.weather_api_url),

            http_timeout_secs: Self::env_u64("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            http_max_retries: Self::env_u64("HTTP_MAX_RETRIES", defaults.http_max_retries as u64)
                .max(1) as usize,
            http_retry_delay_ms: Self::env_u64("HTTP_RETRY_DELAY_MS", defaults.http_retry_delay_ms),

            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn http_retry_delay(&self) -> Duration {
        Duration::from_millis(self.http_retry_delay_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    fn env_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            countries_api_url: "https://restcountries.com/v3.1".to_string(),
            currency_api_url: "https://open.er-api.com/v6/latest".to_string(),
            weather_api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            http_timeout_secs: 30,
            http_max_retries: 3,
            http_retry_delay_ms: 1000, // doubled on every retry
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
        }
    }
}
