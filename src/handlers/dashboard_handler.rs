use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::{PopulatedDashboard, EVENT_INVOKE};
use crate::errors::ApiError;
use crate::services::scheduler::AppState;

/// Populate the dashboard of a registration
pub async fn get_dashboard(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PopulatedDashboard>, ApiError> {
    let registration = state
        .storage
        .registrations
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No registration with id {}", id)))?;

    let dashboard = state.dashboards.render(&registration).await?;

    // Not awaited, subscribers are notified in the background
    state
        .notifier
        .trigger(EVENT_INVOKE, registration.country_identifier());

    Ok(Json(dashboard))
}
