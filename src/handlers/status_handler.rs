use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::errors::ApiError;
use crate::services::scheduler::AppState;

pub const API_VERSION: &str = "v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub countries_api: u16,
    pub currency_api: u16,
    pub meteo_api: u16,
    pub notification_db: u16,
    pub webhooks: usize,
    pub version: &'static str,
    pub uptime: String,
}

/// Report upstream reachability and service uptime
pub async fn service_status(State(state): State<AppState>) -> Result<Json<ServiceStatus>, ApiError> {
    let (countries_api, currency_api, meteo_api, webhooks) = tokio::join!(
        state.upstreams.countries.status(),
        state.upstreams.currency.status(),
        state.upstreams.weather.status(),
        state.storage.subscriptions.list(),
    );

    let (notification_db, webhooks) = match webhooks {
        Ok(hooks) => (200, hooks.len()),
        Err(e) => {
            tracing::error!("Notification store unreachable: {}", e);
            (503, 0)
        }
    };

    let uptime_secs = (Utc::now() - state.started_at).num_seconds();

    Ok(Json(ServiceStatus {
        countries_api,
        currency_api,
        meteo_api,
        notification_db,
        webhooks,
        version: API_VERSION,
        uptime: format_uptime(uptime_secs),
    }))
}

/// Formats seconds as `Dd:HHh:MMm:SSs`
pub fn format_uptime(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let days = total_secs / 86_400;
    let hours = (total_secs / 3_600) % 24;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    format!("{}d:{:02}h:{:02}m:{:02}s", days, hours, minutes, seconds)
}
