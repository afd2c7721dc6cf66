//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use lianxin_gateway::config::{
    CorsSettings, JwtSettings, ServerSettings, Settings, WebSocketSettings,
};
use lianxin_gateway::presentation::http::routes;
use lianxin_gateway::presentation::websocket::{Gateway, Role, ServerEvent};
use lianxin_gateway::startup::AppState;

/// Settings fixture for tests; nothing binds to the configured port.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-integration".into(),
        },
        cors: CorsSettings {
            allowed_origins: vec!["http://localhost:5173".into()],
        },
        websocket: WebSocketSettings {
            max_message_size: 65536,
            max_frame_size: 16384,
        },
        environment: "test".into(),
    }
}

/// Test application wrapping the real router and its state.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState {
            gateway: Arc::new(Gateway::new()),
            settings: Arc::new(test_settings()),
        };
        let router = routes::create_router(state.clone());
        Self { router, state }
    }

    /// Register a fake observer connection directly on the gateway and
    /// return the receiving end of its outbound channel.
    pub fn connect_observer(
        &self,
        connection_id: &str,
        identity: Option<&str>,
    ) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let role = if identity.is_some() {
            Role::User
        } else {
            Role::Anonymous
        };
        self.state.gateway.register(
            connection_id.to_string(),
            identity.map(String::from),
            role,
            tx,
        );
        rx
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
