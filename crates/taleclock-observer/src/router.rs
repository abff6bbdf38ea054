//! Axum router construction for the control API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the control API.
///
/// See [`handlers`] for the endpoint table. CORS allows any origin so a
/// dashboard served elsewhere can drive the clock.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/clock", get(handlers::get_clock))
        .route("/api/clock/toggle", post(handlers::toggle_clock))
        .route("/api/clock/pause", post(handlers::pause_clock))
        .route("/api/clock/resume", post(handlers::resume_clock))
        .route("/api/clock/skip", post(handlers::skip_clock))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
