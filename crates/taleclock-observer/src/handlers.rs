//! REST API endpoint handlers for the control API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML clock face |
//! | `GET` | `/api/health` | Liveness probe |
//! | `GET` | `/api/clock` | Current timestamp, run state, and display face |
//! | `POST` | `/api/clock/toggle` | Flip between running and stopped |
//! | `POST` | `/api/clock/pause` | Stop if running (skip dialog opened) |
//! | `POST` | `/api/clock/resume` | Start if stopped (skip dialog cancelled) |
//! | `POST` | `/api/clock/skip` | Advance by `{ hours, minutes }` and run |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use serde::Serialize;
use taleclock_core::skip::SkipRequest;
use taleclock_types::{ClockFace, ClockState, FictionalTimestamp, RunState};
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

/// JSON body returned by every clock endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockView {
    /// Current fictional timestamp (RFC 3339).
    pub timestamp: FictionalTimestamp,
    /// Whether the clock is running or stopped.
    pub run_state: RunState,
    /// Shorthand for `run_state == running`.
    pub running: bool,
    /// Display derivations of `timestamp`.
    pub face: ClockFace,
}

impl From<ClockState> for ClockView {
    fn from(state: ClockState) -> Self {
        Self {
            timestamp: state.timestamp,
            run_state: state.run_state,
            running: state.is_running(),
            face: state.timestamp.face(),
        }
    }
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML clock face
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the clock face.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = ClockView::from(state.driver.current_state().await);
    let status = if view.running { "Running" } else { "Stopped" };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Taleclock</title></head>
<body>
<h1>{date}</h1>
<h2>{time}</h2>
<p>{time_of_day}</p>
<p>Clock: {status}</p>
</body>
</html>"#,
        date = view.face.date_label,
        time = view.face.time_label,
        time_of_day = view.face.time_of_day.label(),
    ))
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Current state of the clock.
pub async fn get_clock(State(state): State<Arc<AppState>>) -> Json<ClockView> {
    Json(state.driver.current_state().await.into())
}

/// Toggle the clock between running and stopped.
pub async fn toggle_clock(State(state): State<Arc<AppState>>) -> Json<ClockView> {
    let clock = state.driver.toggle_run().await;
    info!(run_state = ?clock.run_state, timestamp = %clock.timestamp, "Clock toggled");
    Json(clock.into())
}

/// Stop the clock if it is running. Idempotent.
pub async fn pause_clock(State(state): State<Arc<AppState>>) -> Json<ClockView> {
    Json(state.driver.pause().await.into())
}

/// Start the clock if it is stopped. Idempotent.
pub async fn resume_clock(State(state): State<Arc<AppState>>) -> Json<ClockView> {
    Json(state.driver.resume().await.into())
}

/// Skip forward by the requested hours and minutes, then run.
///
/// Fields may be numbers, numeric strings, or `null`; anything that is
/// not a number counts as zero. Negative fields count as zero and
/// minutes are capped at 59.
pub async fn skip_clock(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SkipRequest>,
) -> Result<Json<ClockView>, ObserverError> {
    let request = request.sanitized();
    let clock = state.driver.skip_time(request).await?;
    info!(
        hours = request.hours,
        minutes = request.minutes,
        timestamp = %clock.timestamp,
        "Skipped time"
    );
    Ok(Json(clock.into()))
}
