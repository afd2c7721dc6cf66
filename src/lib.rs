//! # LianXin Realtime Gateway
//!
//! Real-time event fan-out for the LianXin diagnosis demo backend:
//! - WebSocket gateway with session-scoped rooms
//! - Best-effort typed-event broadcasting (no persistence, no replay)
//! - Best-effort JWT labeling of connections (never rejects)
//! - HTTP producer and diagnostics endpoints
//!
//! ## Module Structure
//!
//! ```text
//! lianxin_gateway/
//! +-- config/        Configuration management
//! +-- metrics/       Prometheus metrics
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Prometheus metrics
pub mod metrics;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
