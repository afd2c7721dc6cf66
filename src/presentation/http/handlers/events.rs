//! Event Producer Handlers
//!
//! HTTP entry points for application-level producers (route handlers,
//! background simulators) to push events into the gateway. Delivery is
//! best-effort; the response carries only the point-in-time delivery
//! count.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::presentation::websocket::ServerEvent;
use crate::shared::AppError;
use crate::startup::AppState;

/// Broadcast outcome for room and global sends.
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub delivered: usize,
}

/// Outcome of a direct user send.
#[derive(Debug, Serialize)]
pub struct DirectSendResponse {
    pub delivered: bool,
}

fn reject_presence(event: &ServerEvent) -> Result<(), AppError> {
    if event.is_presence() {
        return Err(AppError::BadRequest(format!(
            "{} is emitted by the room manager and cannot be produced externally",
            event.event_name()
        )));
    }
    Ok(())
}

/// POST /api/v1/sessions/{session_id}/events
///
/// Broadcasting to a session nobody observes succeeds with zero
/// deliveries; events are dropped, never queued.
pub async fn broadcast_to_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(event): Json<ServerEvent>,
) -> Result<Json<BroadcastResponse>, AppError> {
    reject_presence(&event)?;

    let delivered = state.gateway.broadcast_to_session(&session_id, event);
    tracing::debug!(session_id = %session_id, delivered, "Session broadcast");
    Ok(Json(BroadcastResponse { delivered }))
}

/// POST /api/v1/users/{user_id}/events
pub async fn send_to_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(event): Json<ServerEvent>,
) -> Result<Json<DirectSendResponse>, AppError> {
    reject_presence(&event)?;

    let delivered = state.gateway.send_to_user(&user_id, event);
    Ok(Json(DirectSendResponse { delivered }))
}

/// POST /api/v1/events/broadcast
pub async fn broadcast_global(
    State(state): State<AppState>,
    Json(event): Json<ServerEvent>,
) -> Result<Json<BroadcastResponse>, AppError> {
    reject_presence(&event)?;

    let delivered = state.gateway.broadcast_global(event);
    Ok(Json(BroadcastResponse { delivered }))
}
