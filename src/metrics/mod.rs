//! Prometheus Metrics Module
//!
//! Application-wide metrics collection.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauges (connected / authenticated)
//! - Active diagnosis room gauge
//! - Event broadcast and delivery counters, labeled by event name

use once_cell::sync::Lazy;
use prometheus::{Encoder, GaugeVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WEBSOCKET_CONNECTIONS_ACTIVE: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("lianxin_gateway"),
        &["state"], // "connected", "authenticated"
    )
    .expect("Failed to create WEBSOCKET_CONNECTIONS_ACTIVE metric")
});

/// Active diagnosis rooms gauge
pub static DIAGNOSIS_ROOMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "diagnosis_rooms_active",
            "Number of diagnosis rooms with at least one observer",
        )
        .namespace("lianxin_gateway"),
    )
    .expect("Failed to create DIAGNOSIS_ROOMS_ACTIVE metric")
});

/// Broadcast attempts by event name
pub static EVENTS_BROADCAST_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_broadcast_total", "Total number of event broadcasts")
            .namespace("lianxin_gateway"),
        &["event"],
    )
    .expect("Failed to create EVENTS_BROADCAST_TOTAL metric")
});

/// Individual deliveries by event name
pub static EVENTS_DELIVERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "events_delivered_total",
            "Total number of per-connection event deliveries",
        )
        .namespace("lianxin_gateway"),
        &["event"],
    )
    .expect("Failed to create EVENTS_DELIVERED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WEBSOCKET_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WEBSOCKET_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(DIAGNOSIS_ROOMS_ACTIVE.clone()))
        .expect("Failed to register DIAGNOSIS_ROOMS_ACTIVE");
    registry
        .register(Box::new(EVENTS_BROADCAST_TOTAL.clone()))
        .expect("Failed to register EVENTS_BROADCAST_TOTAL");
    registry
        .register(Box::new(EVENTS_DELIVERED_TOTAL.clone()))
        .expect("Failed to register EVENTS_DELIVERED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

pub fn connection_opened(authenticated: bool) {
    WEBSOCKET_CONNECTIONS_ACTIVE
        .with_label_values(&["connected"])
        .inc();
    if authenticated {
        WEBSOCKET_CONNECTIONS_ACTIVE
            .with_label_values(&["authenticated"])
            .inc();
    }
}

pub fn connection_closed(authenticated: bool) {
    WEBSOCKET_CONNECTIONS_ACTIVE
        .with_label_values(&["connected"])
        .dec();
    if authenticated {
        WEBSOCKET_CONNECTIONS_ACTIVE
            .with_label_values(&["authenticated"])
            .dec();
    }
}

pub fn room_created() {
    DIAGNOSIS_ROOMS_ACTIVE.inc();
}

pub fn room_removed() {
    DIAGNOSIS_ROOMS_ACTIVE.dec();
}

pub fn event_broadcast(event: &str) {
    EVENTS_BROADCAST_TOTAL.with_label_values(&[event]).inc();
}

pub fn events_delivered(event: &str, count: usize) {
    if count > 0 {
        EVENTS_DELIVERED_TOTAL
            .with_label_values(&[event])
            .inc_by(count as u64);
    }
}
