use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::server::RoomOrchestrator;

use super::handler::websocket_handler;
use super::metrics::{metrics_handler, prometheus_metrics_handler};

/// Builds the Axum router: `/ws` for the signaling protocol, `/health` for
/// liveness, `/metrics` and `/metrics/prom` for the metrics surface.
pub fn create_router(cors_origins: &[String]) -> axum::Router<Arc<RoomOrchestrator>> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let origins: Vec<_> = cors_origins
        .iter()
        .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
        .collect();

    let cors = if origins.is_empty() {
        tracing::warn!("no valid CORS origins configured, using permissive CORS");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/prom", get(prometheus_metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Builds the orchestrator from `config` and serves it on `addr` until the
/// process is terminated.
pub async fn run_server(addr: SocketAddr, config: &Config) -> anyhow::Result<()> {
    let orchestrator = RoomOrchestrator::new(config).await?;

    let app = create_router(&config.server.cors_origins).with_state(orchestrator);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "starting roomcast signaling server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
