//! `{type: "error"}` helpers shared by every handler.

use crate::protocol::{ConnectionId, ServerMessage};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub(crate) async fn send_error_to_connection(&self, connection_id: ConnectionId, message: String) {
        self.send_to_connection(connection_id, ServerMessage::Error { message }).await;
    }

    pub(crate) async fn send_error_to_user(&self, user_id: &str, message: String) {
        self.send_to_user(user_id, ServerMessage::Error { message }).await;
    }
}
