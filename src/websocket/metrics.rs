use axum::extract::State;
use std::sync::Arc;

use crate::server::RoomOrchestrator;

use super::prometheus::render_prometheus_metrics;

/// Metrics endpoint - returns the current counters and dispatch latency
/// histogram as JSON.
pub async fn metrics_handler(
    State(server): State<Arc<RoomOrchestrator>>,
) -> axum::response::Json<crate::metrics::MetricsSnapshot> {
    axum::response::Json(server.metrics.snapshot().await)
}

/// Prometheus metrics endpoint (text format, version 0.0.4).
pub async fn prometheus_metrics_handler(
    State(server): State<Arc<RoomOrchestrator>>,
) -> axum::response::Response {
    use axum::http::header::{HeaderValue, CONTENT_TYPE};
    use axum::response::IntoResponse;

    let snapshot = server.metrics.snapshot().await;
    let body = render_prometheus_metrics(&snapshot);
    let headers = [(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    )];

    (headers, body).into_response()
}
