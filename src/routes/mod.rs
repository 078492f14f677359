use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::handlers::{
    create_notification, create_registration, delete_notification, delete_registration,
    get_dashboard, get_notification, get_registration, health_check, list_notifications,
    list_registrations, patch_notification, service_status, update_registration,
};
use crate::middleware::request_logging_middleware;
use crate::services::scheduler::AppState;

pub const API_PREFIX: &str = "/dashboard/v1";

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Registrations
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/registrations/",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/registrations/:id",
            get(get_registration)
                .put(update_registration)
                .delete(delete_registration),
        )
        // Dashboards
        .route("/dashboards/:id", get(get_dashboard))
        // Notifications
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/:id",
            get(get_notification)
                .patch(patch_notification)
                .delete(delete_notification),
        )
        // Status
        .route("/status", get(service_status))
        .route("/status/", get(service_status));

    Router::new()
        .route("/health", get(health_check))
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
