//! WebSocket Gateway
//!
//! Real-time diagnosis session fan-out over WebSocket connections.

pub mod auth;
pub mod events;
pub mod gateway;
pub mod handler;
pub mod messages;

pub use auth::{ConnectionLabel, Role};
pub use events::ServerEvent;
pub use gateway::{ConnectionStats, Gateway, RoomInfo};
pub use handler::ws_handler;
pub use messages::ClientMessage;
