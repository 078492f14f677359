use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::domain::{Registration, RegistrationInput, EVENT_CHANGE, EVENT_DELETE, EVENT_REGISTER};
use crate::errors::ApiError;
use crate::services::scheduler::AppState;

/// Store a new dashboard registration
pub async fn create_registration(
    State(state): State<AppState>,
    Json(input): Json<RegistrationInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    input.validate().map_err(ApiError::validation)?;

    let stored = state
        .storage
        .registrations
        .insert(input.into_registration(String::new()))
        .await?;

    state
        .notifier
        .trigger(EVENT_REGISTER, stored.country_identifier());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": stored.id,
            "lastChange": stored.last_change
        })),
    ))
}

/// List every registration
pub async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Registration>>, ApiError> {
    Ok(Json(state.storage.registrations.list().await?))
}

/// Get one registration by id
pub async fn get_registration(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Registration>, ApiError> {
    state
        .storage
        .registrations
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No registration with id {}", id)))
}

/// Replace a registration wholesale
pub async fn update_registration(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(input): Json<RegistrationInput>,
) -> Result<StatusCode, ApiError> {
    input.validate().map_err(ApiError::validation)?;

    let registration = input.into_registration(id.clone());
    let country = registration.country_identifier().to_string();

    if !state.storage.registrations.replace(registration).await? {
        return Err(ApiError::not_found(format!("No registration with id {}", id)));
    }

    state.notifier.trigger(EVENT_CHANGE, &country);
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a registration
pub async fn delete_registration(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .storage
        .registrations
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No registration with id {}", id)))?;

    if !state.storage.registrations.delete(&id).await? {
        return Err(ApiError::not_found(format!("No registration with id {}", id)));
    }

    state
        .notifier
        .trigger(EVENT_DELETE, existing.country_identifier());
    Ok(StatusCode::NO_CONTENT)
}
