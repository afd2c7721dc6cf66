//! Event Producer Endpoint Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use lianxin_gateway::presentation::websocket::ServerEvent;

use crate::common::{body_json, TestApp};

fn recv_one(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    rx.try_recv().expect("expected one delivered event")
}

#[tokio::test]
async fn broadcast_reaches_all_room_observers() {
    let app = TestApp::new();
    let mut rx_a = app.connect_observer("a", None);
    let mut rx_b = app.connect_observer("b", Some("u-b"));
    let mut rx_c = app.connect_observer("c", None);
    app.state.gateway.join_room("s1", "a");
    app.state.gateway.join_room("s1", "b");
    app.state.gateway.join_room("s2", "c");
    // Drop the join presence notice observer A received for B
    let _ = rx_a.try_recv();

    let response = app
        .post_json(
            "/api/v1/sessions/s1/events",
            r#"{"event": "diagnosis_complete", "data": {"sessionId": "s1", "report": {"risk": "low"}}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["delivered"], 2);

    assert!(matches!(recv_one(&mut rx_a), ServerEvent::DiagnosisComplete(_)));
    assert!(matches!(recv_one(&mut rx_b), ServerEvent::DiagnosisComplete(_)));
    assert!(rx_c.try_recv().is_err());
}

#[tokio::test]
async fn broadcast_to_unobserved_session_drops_silently() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/sessions/s9/events",
            r#"{"event": "analysis_progress", "data": {"sessionId": "s9", "modality": "eeg", "progress": 50}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["delivered"], 0);
}

#[tokio::test]
async fn presence_events_are_rejected_from_producers() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/sessions/s1/events",
            r#"{"event": "user_joined_diagnosis", "data": {"sessionId": "s1", "connectionId": "x"}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_event_body_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/sessions/s1/events",
            r#"{"event": "no_such_event", "data": {}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn direct_send_targets_current_connection() {
    let app = TestApp::new();
    let mut rx1 = app.connect_observer("c1", Some("u1"));
    let mut rx2 = app.connect_observer("c2", Some("u1"));

    let response = app
        .post_json(
            "/api/v1/users/u1/events",
            r#"{"event": "notification", "data": {"title": "Report", "message": "Your report is ready"}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["delivered"], true);
    assert!(rx1.try_recv().is_err());
    assert!(matches!(recv_one(&mut rx2), ServerEvent::Notification(_)));
}

#[tokio::test]
async fn direct_send_to_offline_user_is_dropped() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/users/nobody/events",
            r#"{"event": "notification", "data": {"title": "t", "message": "m"}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["delivered"], false);
}

#[tokio::test]
async fn global_broadcast_ignores_rooms() {
    let app = TestApp::new();
    let mut rx1 = app.connect_observer("c1", None);
    let mut rx2 = app.connect_observer("c2", None);
    app.state.gateway.join_room("s1", "c1");

    let response = app
        .post_json(
            "/api/v1/events/broadcast",
            r#"{"event": "system_alert", "data": {"level": "warning", "message": "maintenance"}}"#,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["delivered"], 2);
    assert!(matches!(recv_one(&mut rx1), ServerEvent::SystemAlert(_)));
    assert!(matches!(recv_one(&mut rx2), ServerEvent::SystemAlert(_)));
}
