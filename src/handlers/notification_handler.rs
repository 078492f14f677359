use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::domain::{SubscriptionInput, SubscriptionPatch, WebhookSubscription};
use crate::errors::ApiError;
use crate::services::scheduler::AppState;

/// Register a webhook
pub async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<SubscriptionInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    input.validate().map_err(ApiError::validation)?;

    let stored = state
        .storage
        .subscriptions
        .insert(input.into_subscription(String::new()))
        .await?;

    tracing::info!(
        "Registered webhook {} for event {} (country '{}')",
        stored.id,
        stored.event,
        stored.country
    );

    Ok((StatusCode::CREATED, Json(json!({ "id": stored.id }))))
}

/// List every webhook
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<WebhookSubscription>>, ApiError> {
    Ok(Json(state.storage.subscriptions.list().await?))
}

/// Get one webhook by id
pub async fn get_notification(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<WebhookSubscription>, ApiError> {
    state
        .storage
        .subscriptions
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No webhook with id {}", id)))
}

/// Update some fields of a webhook
pub async fn patch_notification(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(patch): Json<SubscriptionPatch>,
) -> Result<StatusCode, ApiError> {
    patch.validate().map_err(ApiError::validation)?;

    let mut subscription = state
        .storage
        .subscriptions
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No webhook with id {}", id)))?;

    patch.apply(&mut subscription);

    if !state.storage.subscriptions.update(&subscription).await? {
        return Err(ApiError::not_found(format!("No webhook with id {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a webhook
pub async fn delete_notification(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if !state.storage.subscriptions.delete(&id).await? {
        return Err(ApiError::not_found(format!("No webhook with id {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
