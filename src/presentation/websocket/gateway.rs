//! WebSocket Gateway
//!
//! Tracks live connections, the identity shortcut, and per-session rooms,
//! and fans typed events out to room members. All state is process-local
//! and in-memory; a restart starts from zero connections and clients are
//! expected to rejoin their rooms.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

use super::auth::Role;
use super::events::{RoomPresencePayload, ServerEvent};
use crate::metrics;

/// One live connection known to the gateway.
///
/// `rooms` is the set of sessions this connection currently observes; it
/// is consulted on disconnect so cleanup touches only the rooms that
/// actually contain the connection.
pub struct ConnectedClient {
    pub connection_id: String,
    pub identity: Option<String>,
    pub role: Role,
    pub sender: mpsc::UnboundedSender<ServerEvent>,
    rooms: Mutex<HashSet<String>>,
}

/// Point-in-time connection counts. Approximate under concurrent mutation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStats {
    pub total_connections: usize,
    pub authenticated_count: usize,
}

/// Point-in-time snapshot of one room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub member_count: usize,
    pub member_ids: Vec<String>,
}

/// Gateway managing all connections and diagnosis session rooms.
pub struct Gateway {
    /// Live connections by connection_id
    clients: DashMap<String, Arc<ConnectedClient>>,
    /// Identity to current connection_id (latest registration wins)
    identity_index: DashMap<String, String>,
    /// Session id to member connection_ids
    rooms: DashMap<String, HashSet<String>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            identity_index: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a new connection. Always succeeds; an authenticated
    /// identity silently supersedes any earlier connection mapped to it
    /// (the earlier connection stays open, it just loses the shortcut).
    pub fn register(
        &self,
        connection_id: String,
        identity: Option<String>,
        role: Role,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) {
        let client = Arc::new(ConnectedClient {
            connection_id: connection_id.clone(),
            identity: identity.clone(),
            role,
            sender,
            rooms: Mutex::new(HashSet::new()),
        });

        self.clients.insert(connection_id.clone(), client);

        if let Some(user_id) = &identity {
            self.identity_index
                .insert(user_id.clone(), connection_id.clone());
        }

        metrics::connection_opened(identity.is_some());

        tracing::info!(
            connection_id = %connection_id,
            user_id = identity.as_deref().unwrap_or("-"),
            role = ?role,
            "Connection registered"
        );
    }

    /// Remove a connection from the registry. The identity shortcut is
    /// dropped only if it still points at this connection.
    fn unregister(&self, connection_id: &str) -> Option<Arc<ConnectedClient>> {
        let (_, client) = self.clients.remove(connection_id)?;

        if let Some(user_id) = &client.identity {
            self.identity_index
                .remove_if(user_id, |_, current| current == connection_id);
        }

        metrics::connection_closed(client.identity.is_some());
        Some(client)
    }

    /// Current connection for an authenticated identity, if any.
    pub fn lookup_by_identity(&self, user_id: &str) -> Option<String> {
        self.identity_index.get(user_id).map(|c| c.value().clone())
    }

    /// Add a connection to a session room. Idempotent; the room is
    /// created lazily. Other members are notified of the arrival.
    pub fn join_room(&self, session_id: &str, connection_id: &str) {
        let Some(client) = self.clients.get(connection_id).map(|c| c.value().clone()) else {
            tracing::warn!(
                connection_id = %connection_id,
                session_id = %session_id,
                "Join from unknown connection ignored"
            );
            return;
        };

        let (inserted, others) = {
            // The room gauge tracks entry creation and removal exactly;
            // the decision must be made under the entry lock. An entry
            // that already exists (even momentarily empty, between a
            // leave draining it and its GC) is already counted.
            let mut members = match self.rooms.entry(session_id.to_string()) {
                Entry::Occupied(entry) => entry.into_ref(),
                Entry::Vacant(entry) => {
                    metrics::room_created();
                    entry.insert(HashSet::new())
                }
            };
            let inserted = members.insert(connection_id.to_string());
            let others: Vec<String> = if inserted {
                members
                    .iter()
                    .filter(|id| id.as_str() != connection_id)
                    .cloned()
                    .collect()
            } else {
                Vec::new()
            };
            (inserted, others)
        };

        if !inserted {
            return;
        }

        client.rooms.lock().insert(session_id.to_string());

        let notice = ServerEvent::UserJoinedDiagnosis(RoomPresencePayload {
            session_id: session_id.to_string(),
            connection_id: connection_id.to_string(),
            user_id: client.identity.clone(),
        });
        self.deliver_to(&others, &notice);

        tracing::debug!(
            connection_id = %connection_id,
            session_id = %session_id,
            "Joined diagnosis room"
        );
    }

    /// Remove a connection from a session room. Leaving a room the
    /// connection never joined is a no-op. An emptied room is deleted.
    pub fn leave_room(&self, session_id: &str, connection_id: &str) {
        if !self.remove_member(session_id, connection_id) {
            return;
        }

        if let Some(client) = self.clients.get(connection_id) {
            client.rooms.lock().remove(session_id);
            self.notify_left(session_id, connection_id, client.identity.clone());
        } else {
            self.notify_left(session_id, connection_id, None);
        }

        tracing::debug!(
            connection_id = %connection_id,
            session_id = %session_id,
            "Left diagnosis room"
        );
    }

    /// Drop `connection_id` from the room's member set, GC-ing the room
    /// if it empties. Returns whether the connection was a member.
    fn remove_member(&self, session_id: &str, connection_id: &str) -> bool {
        let (removed, emptied) = match self.rooms.get_mut(session_id) {
            Some(mut members) => {
                let removed = members.remove(connection_id);
                (removed, members.is_empty())
            }
            None => (false, false),
        };

        if removed && emptied {
            // Re-check under the entry lock: a concurrent join may have
            // repopulated the room since the guard above was dropped.
            if self
                .rooms
                .remove_if(session_id, |_, members| members.is_empty())
                .is_some()
            {
                metrics::room_removed();
            }
        }

        removed
    }

    fn notify_left(&self, session_id: &str, connection_id: &str, user_id: Option<String>) {
        let notice = ServerEvent::UserLeftDiagnosis(RoomPresencePayload {
            session_id: session_id.to_string(),
            connection_id: connection_id.to_string(),
            user_id,
        });
        self.broadcast_to_session(session_id, notice);
    }

    /// Full cleanup for a dead connection: evict it from the registry and
    /// from every room it had joined, notifying remaining members once
    /// per room. Terminal; nothing about the connection survives.
    pub fn handle_disconnect(&self, connection_id: &str) {
        let Some(client) = self.unregister(connection_id) else {
            return;
        };

        let joined: Vec<String> = client.rooms.lock().drain().collect();
        for session_id in &joined {
            if self.remove_member(session_id, connection_id) {
                self.notify_left(session_id, connection_id, client.identity.clone());
            }
        }

        tracing::info!(
            connection_id = %connection_id,
            user_id = client.identity.as_deref().unwrap_or("-"),
            rooms = joined.len(),
            "Connection disconnected"
        );
    }

    /// Deliver an event to every member of a session room. Broadcasting
    /// to an absent or empty room is a silent no-op. Returns the number
    /// of deliveries.
    pub fn broadcast_to_session(&self, session_id: &str, event: ServerEvent) -> usize {
        let members: Vec<String> = match self.rooms.get(session_id) {
            Some(members) => members.iter().cloned().collect(),
            None => return 0,
        };

        metrics::event_broadcast(event.event_name());
        self.deliver_to(&members, &event)
    }

    /// Deliver an event to an identity's current connection, if any.
    /// Returns whether a delivery happened; an offline user is dropped
    /// silently.
    pub fn send_to_user(&self, user_id: &str, event: ServerEvent) -> bool {
        let Some(connection_id) = self.lookup_by_identity(user_id) else {
            return false;
        };
        metrics::event_broadcast(event.event_name());
        self.deliver_to(std::slice::from_ref(&connection_id), &event) == 1
    }

    /// Deliver an event to every live connection, regardless of rooms.
    /// Returns the number of deliveries.
    pub fn broadcast_global(&self, event: ServerEvent) -> usize {
        metrics::event_broadcast(event.event_name());
        let mut delivered = 0;
        for client in self.clients.iter() {
            if client.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        metrics::events_delivered(event.event_name(), delivered);
        delivered
    }

    fn deliver_to(&self, connection_ids: &[String], event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for connection_id in connection_ids {
            if let Some(client) = self.clients.get(connection_id) {
                if client.sender.send(event.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }
        metrics::events_delivered(event.event_name(), delivered);
        delivered
    }

    /// Connection counts for the diagnostics surface.
    pub fn connection_stats(&self) -> ConnectionStats {
        let total_connections = self.clients.len();
        let authenticated_count = self
            .clients
            .iter()
            .filter(|c| c.identity.is_some())
            .count();
        ConnectionStats {
            total_connections,
            authenticated_count,
        }
    }

    /// Snapshot of one room, or `None` if the room does not exist
    /// (including rooms GC-ed after their last member left).
    pub fn room_info(&self, session_id: &str) -> Option<RoomInfo> {
        self.rooms.get(session_id).map(|members| RoomInfo {
            member_count: members.len(),
            member_ids: members.iter().cloned().collect(),
        })
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
