//! Request accounting for every routed request.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Count API calls per endpoint and time every request by method, path, and status.
///
/// Counting happens before the handler runs, so rejected calls are counted too.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let metrics = state.metrics();
    if let Some(calls) = metrics.api_calls_for(&path) {
        calls.inc(&[]);
    }

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics.http_request_duration.observe(
        &[("method", method.as_str()), ("path", path.as_str()), ("status", status.as_str())],
        start.elapsed(),
    );

    response
}
