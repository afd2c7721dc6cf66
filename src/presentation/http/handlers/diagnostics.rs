//! Diagnostics Handlers
//!
//! Introspection over the gateway's connection registry and room table.
//! These are the only way to diagnose "a client believes it joined but
//! receives nothing": delivery itself carries no error channel.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::presentation::websocket::ConnectionStats;
use crate::startup::AppState;

/// Room snapshot response. An absent (or GC-ed) room reports zero members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoResponse {
    pub session_id: String,
    pub member_count: usize,
    pub member_ids: Vec<String>,
}

/// GET /api/v1/diagnostics/connections
pub async fn get_connection_stats(State(state): State<AppState>) -> Json<ConnectionStats> {
    Json(state.gateway.connection_stats())
}

/// GET /api/v1/diagnostics/rooms/{session_id}
pub async fn get_room_info(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<RoomInfoResponse> {
    let info = state.gateway.room_info(&session_id);
    let (member_count, member_ids) = match info {
        Some(info) => (info.member_count, info.member_ids),
        None => (0, Vec::new()),
    };
    Json(RoomInfoResponse {
        session_id,
        member_count,
        member_ids,
    })
}
