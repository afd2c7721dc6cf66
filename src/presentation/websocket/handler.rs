//! WebSocket Connection Handler
//!
//! One task per connection: upgrade, label via the auth gate, register
//! with the gateway, then pump messages until the transport closes.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::auth::{authenticate, ConnectionLabel};
use super::events::ServerEvent;
use super::messages::ClientMessage;
use crate::startup::AppState;

/// Query parameters accepted at upgrade time. Browsers cannot set
/// headers on a WebSocket handshake, so the credential may arrive as
/// `?token=` instead of `Authorization: Bearer`.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    let credential = bearer_token(&headers).or(params.token);
    let label = authenticate(credential.as_deref(), &state.settings.jwt.secret);

    ws.max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state, label))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Handle one connection from registration to cleanup.
async fn handle_socket(socket: WebSocket, state: AppState, label: ConnectionLabel) {
    let connection_id = Uuid::new_v4().to_string();

    tracing::debug!(
        connection_id = %connection_id,
        user_id = label.identity.as_deref().unwrap_or("-"),
        "New WebSocket connection"
    );

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Outgoing events go through a channel so producers never block on
    // the transport
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    state.gateway.register(
        connection_id.clone(),
        label.identity.clone(),
        label.role,
        tx,
    );

    // Read loop: join/leave requests in, everything else ignored
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => handle_message(&text, &connection_id, &state),
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "Connection closed");
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
            }
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    state.gateway.handle_disconnect(&connection_id);
    sender_task.abort();
}

/// Dispatch one incoming text frame. A frame that fails to parse is
/// logged and dropped; it never tears down the connection.
fn handle_message(text: &str, connection_id: &str, state: &AppState) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Ignoring malformed client message"
            );
            return;
        }
    };

    match message {
        ClientMessage::JoinDiagnosisRoom(req) => {
            state.gateway.join_room(&req.session_id, connection_id);
        }
        ClientMessage::LeaveDiagnosisRoom(req) => {
            state.gateway.leave_room(&req.session_id, connection_id);
        }
    }
}
