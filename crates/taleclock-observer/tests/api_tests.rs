//! Integration tests for the control API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use taleclock_core::clock::{ClockSettings, SimulatedClock};
use taleclock_core::driver::ClockDriver;
use taleclock_observer::router::build_router;
use taleclock_observer::state::AppState;
use taleclock_types::{CampaignId, FictionalTimestamp};
use tower::ServiceExt;

type Saved = Arc<Mutex<Vec<FictionalTimestamp>>>;

fn make_test_state() -> (Arc<AppState>, Saved) {
    let saved: Saved = Arc::default();
    let sink_saved = Arc::clone(&saved);
    let clock = SimulatedClock::new(
        CampaignId::from("api"),
        ClockSettings::default(),
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        move |ts: FictionalTimestamp| sink_saved.lock().unwrap().push(ts),
    );
    let driver = ClockDriver::new(clock, Duration::from_secs(1));
    (Arc::new(AppState::new(Arc::new(driver))), saved)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_get_clock_initial_state() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(Request::get("/api/clock").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["timestamp"], "2024-01-01T08:00:00Z");
    assert_eq!(json["run_state"], "stopped");
    assert_eq!(json["running"], false);
    assert_eq!(json["face"]["date_label"], "1/1/2024");
    assert_eq!(json["face"]["time_label"], "08:00 AM");
    assert_eq!(json["face"]["time_of_day"], "morning");
}

#[tokio::test]
async fn test_index_returns_html() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("08:00 AM"));
    assert!(html.contains("Morning"));
    assert!(html.contains("Stopped"));
}

#[tokio::test(start_paused = true)]
async fn test_toggle_runs_then_pauses() {
    let (state, saved) = make_test_state();
    let router = build_router(state);

    let response = router.clone().oneshot(post("/api/clock/toggle")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["running"], true);

    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let response = router.oneshot(post("/api/clock/toggle")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["running"], false);
    assert_eq!(json["timestamp"], "2024-01-01T08:02:06Z");
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_skip_advances_and_runs() {
    let (state, saved) = make_test_state();
    let response = build_router(state)
        .oneshot(post_json("/api/clock/skip", r#"{"hours":1,"minutes":30}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["timestamp"], "2024-01-01T09:30:00Z");
    assert_eq!(json["running"], true);
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_skip_sanitizes_fields() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(post_json("/api/clock/skip", r#"{"hours":-3,"minutes":90}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["timestamp"], "2024-01-01T08:59:00Z");
}

#[tokio::test(start_paused = true)]
async fn test_skip_missing_fields_default_to_zero() {
    let (state, saved) = make_test_state();
    let response = build_router(state)
        .oneshot(post_json("/api/clock/skip", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["timestamp"], "2024-01-01T08:00:00Z");
    assert_eq!(json["running"], true);
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_skip_overflow_is_rejected() {
    let (state, saved) = make_test_state();
    let router = build_router(state);
    let body = format!(r#"{{"hours":{},"minutes":0}}"#, i64::MAX);
    let response = router
        .clone()
        .oneshot(post_json("/api/clock/skip", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 422);
    assert!(json["error"].is_string());
    assert!(saved.lock().unwrap().is_empty());

    let response = router
        .oneshot(Request::get("/api/clock").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["timestamp"], "2024-01-01T08:00:00Z");
    assert_eq!(json["running"], false);
}

#[tokio::test(start_paused = true)]
async fn test_skip_loose_field_values_are_sanitized() {
    let cases = [
        (r#"{"hours":"abc","minutes":30}"#, "2024-01-01T08:30:00Z"),
        (r#"{"hours":"1","minutes":"30"}"#, "2024-01-01T09:30:00Z"),
        (r#"{"hours":null,"minutes":30}"#, "2024-01-01T08:30:00Z"),
        (r#"{"hours":1.5,"minutes":0}"#, "2024-01-01T09:00:00Z"),
        (r#"{"hours":" 2h","minutes":false}"#, "2024-01-01T10:00:00Z"),
    ];

    for (body, expected) in cases {
        let (state, saved) = make_test_state();
        let response = build_router(state)
            .oneshot(post_json("/api/clock/skip", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "body: {body}");
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["timestamp"], expected, "body: {body}");
        assert_eq!(json["running"], true, "body: {body}");
        assert_eq!(saved.lock().unwrap().len(), 1, "body: {body}");
    }
}

#[tokio::test]
async fn test_skip_malformed_body_is_client_error() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(post_json("/api/clock/skip", "not json"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test(start_paused = true)]
async fn test_dialog_pause_resume() {
    let (state, saved) = make_test_state();
    let router = build_router(state);

    // Pausing a stopped clock persists nothing.
    let response = router.clone().oneshot(post("/api/clock/pause")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["running"], false);
    assert!(saved.lock().unwrap().is_empty());

    let response = router.clone().oneshot(post("/api/clock/resume")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["running"], true);

    let response = router.clone().oneshot(post("/api/clock/pause")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["running"], false);
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (state, _) = make_test_state();
    let response = build_router(state)
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
