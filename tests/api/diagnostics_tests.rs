//! Diagnostics Endpoint Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn connection_stats_start_at_zero() {
    let app = TestApp::new();

    let response = app.get("/api/v1/diagnostics/connections").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalConnections"], 0);
    assert_eq!(body["authenticatedCount"], 0);
}

#[tokio::test]
async fn absent_room_reports_zero_members() {
    let app = TestApp::new();

    let response = app.get("/api/v1/diagnostics/rooms/never-joined").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "sessionId": "never-joined",
            "memberCount": 0,
            "memberIds": []
        })
    );
}

#[tokio::test]
async fn room_info_reflects_membership() {
    let app = TestApp::new();
    let _rx1 = app.connect_observer("c1", None);
    let _rx2 = app.connect_observer("c2", Some("u2"));
    app.state.gateway.join_room("s1", "c1");
    app.state.gateway.join_room("s1", "c2");

    let response = app.get("/api/v1/diagnostics/rooms/s1").await;
    let body = body_json(response).await;
    assert_eq!(body["memberCount"], 2);

    let mut ids: Vec<String> = body["memberIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["c1".to_string(), "c2".to_string()]);
}

#[tokio::test]
async fn room_info_is_empty_after_everyone_leaves() {
    let app = TestApp::new();
    let _rx = app.connect_observer("c1", None);
    app.state.gateway.join_room("s1", "c1");
    app.state.gateway.leave_room("s1", "c1");

    let response = app.get("/api/v1/diagnostics/rooms/s1").await;
    let body = body_json(response).await;
    assert_eq!(body["memberCount"], 0);
}
