//! Client Message Types
//!
//! Messages a client may send over the gateway connection. Anything that
//! fails to parse is logged and ignored; a bad message never terminates
//! the connection.

use serde::{Deserialize, Serialize};

/// Incoming client message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinDiagnosisRoom(RoomRequest),
    LeaveDiagnosisRoom(RoomRequest),
}

/// Room join/leave payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    pub session_id: String,
}
