use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::clients::{build_http_client, Upstreams};
use crate::config::Config;
use crate::domain::{cache_ttl, PURGE_INTERVAL_SECS};
use crate::repo::{CacheStore, Storage};
use crate::services::{
    purge_expired, Cache, CountryService, CurrencyService, DashboardService, NotificationSink,
    WeatherService, WebhookDispatcher,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
    pub upstreams: Upstreams,
    pub dashboards: Arc<DashboardService>,
    pub notifier: Arc<dyn NotificationSink>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires every component to the given stores.
    pub fn new(config: Config, storage: Storage) -> Result<Self, reqwest::Error> {
        let http = build_http_client(&config)?;
        let upstreams = Upstreams::new(http.clone(), &config);

        let notifier: Arc<dyn NotificationSink> = Arc::new(WebhookDispatcher::new(
            storage.subscriptions.clone(),
            http,
        ));

        let cache = Cache::new(storage.cache.clone());
        let dashboards = Arc::new(DashboardService::new(
            CountryService::new(cache.clone(), upstreams.countries.clone(), notifier.clone()),
            WeatherService::new(cache.clone(), upstreams.weather.clone(), notifier.clone()),
            CurrencyService::new(cache, upstreams.currency.clone()),
        ));

        Ok(Self {
            config,
            storage,
            upstreams,
            dashboards,
            notifier,
            started_at: Utc::now(),
        })
    }
}

/// Start background tasks
pub fn start_background_tasks(state: &AppState) {
    info!("Starting background tasks");

    spawn_cache_purge_task(state.storage.cache.clone());

    info!("All background tasks started");
}

/// Sweeps expired cache entries once at start and then every interval.
fn spawn_cache_purge_task(store: Arc<dyn CacheStore>) {
    tokio::spawn(async move {
        let interval = PURGE_INTERVAL_SECS;

        info!(
            "Cache purge task started with interval {} seconds",
            interval
        );

        // First tick completes immediately
        let mut ticker = tokio::time::interval(Duration::from_secs(interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match purge_expired(store.as_ref(), cache_ttl()).await {
                Ok(report) if report.failed > 0 => {
                    error!("Cache purge left {} expired entries behind", report.failed)
                }
                Ok(_) => info!("Cache purge completed successfully"),
                Err(e) => error!("Cache purge failed: {}", e),
            }
        }
    });
}
