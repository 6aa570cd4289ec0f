use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ConnectionId, ServerMessage};
use crate::server::RoomOrchestrator;

use super::sending::send_server_message;

const OUTBOUND_QUEUE_CAPACITY: usize = 64;

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<RoomOrchestrator>, addr: SocketAddr) {
    let connection_id = ConnectionId::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(OUTBOUND_QUEUE_CAPACITY);

    server.register_connection(connection_id, tx);
    tracing::info!(%connection_id, client_addr = %addr, "websocket connection established");

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if send_server_message(&mut sink, connection_id, &message)
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let server_clone = Arc::clone(&server);
    let receive_task = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::warn!(%connection_id, error = %err, "websocket error");
                    break;
                }
            };

            match frame {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => server_clone.handle_client_message(connection_id, message).await,
                    Err(err) => {
                        tracing::warn!(%connection_id, error = %err, "rejected malformed client frame");
                    }
                },
                Message::Close(_) => {
                    tracing::info!(%connection_id, "websocket connection closed by client");
                    break;
                }
                _ => {
                    // Binary/ping/pong frames carry no signaling content on this protocol.
                }
            }
        }
    });

    tokio::select! {
        _ = send_task => {}
        _ = receive_task => {}
    }

    server.handle_disconnect(connection_id).await;
}
