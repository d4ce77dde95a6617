//! Axum router wiring.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route("/api/version", get(api::version::version))
        .route("/api/analyze", post(api::analyze::analyze))
        .route("/api/feedback", post(api::feedback::feedback))
        // route_layer so MatchedPath is populated.
        .route_layer(middleware::from_fn_with_state(state.clone(), api::calls::track_requests))
        .with_state(state)
}
