//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::metrics;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // WebSocket gateway endpoint
        .route("/gateway", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/diagnostics", diagnostics_routes())
        .nest("/sessions", session_routes())
        .nest("/users", user_routes())
        .nest("/events", event_routes())
}

/// Gateway introspection routes
fn diagnostics_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/connections",
            get(handlers::diagnostics::get_connection_stats),
        )
        .route(
            "/rooms/{session_id}",
            get(handlers::diagnostics::get_room_info),
        )
}

/// Per-session producer routes
fn session_routes() -> Router<AppState> {
    Router::new().route(
        "/{session_id}/events",
        post(handlers::events::broadcast_to_session),
    )
}

/// Per-user producer routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/{user_id}/events", post(handlers::events::send_to_user))
}

/// Global producer routes
fn event_routes() -> Router<AppState> {
    Router::new().route("/broadcast", post(handlers::events::broadcast_global))
}
