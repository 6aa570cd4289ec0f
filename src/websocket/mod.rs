//! WebSocket transport: connects inbound frames to [`crate::server::RoomOrchestrator`].
//!
//! - `handler`: WebSocket upgrade entry point
//! - `connection`: per-socket send/receive task pair
//! - `sending`: outbound frame serialization
//! - `routes`: HTTP route wiring (`/ws`, `/health`, `/metrics`, `/metrics/prom`)
//! - `metrics` / `prometheus`: the metrics endpoints

mod connection;
mod handler;
mod metrics;
mod prometheus;
mod routes;
mod sending;

pub use handler::websocket_handler;
pub use metrics::{metrics_handler, prometheus_metrics_handler};
pub use routes::{create_router, run_server};
