//! HTTP Request Handlers

pub mod diagnostics;
pub mod events;
pub mod health;
