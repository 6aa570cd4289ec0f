use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::server::RoomOrchestrator;

use super::connection::handle_socket;

/// WebSocket upgrade handler for the signaling protocol.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(server): State<Arc<RoomOrchestrator>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, server, addr))
}
