use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;

use crate::protocol::{ConnectionId, ServerMessage};

/// Serializes `message` as JSON and writes it to `sender`. Serialization
/// failures are logged and swallowed rather than tearing down the socket —
/// a malformed outbound frame should never take the whole connection down.
pub(super) async fn send_server_message(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
    message: &ServerMessage,
) -> Result<(), ()> {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(%connection_id, error = %err, "failed to serialize server message");
            return Ok(());
        }
    };

    if sender.send(Message::Text(payload.into())).await.is_err() {
        tracing::debug!(%connection_id, "failed to send message, connection closed");
        return Err(());
    }

    Ok(())
}
