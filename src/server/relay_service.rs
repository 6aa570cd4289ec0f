//! Legacy peer-to-peer WebRTC relay: the orchestrator never looks inside an
//! SDP offer/answer or ICE candidate, it only routes the opaque payload.

use uuid::Uuid;

use crate::protocol::{ConnectionId, OpaquePayload, RoomId, ServerMessage};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub(crate) async fn handle_offer(&self, connection_id: ConnectionId, to: String, offer: OpaquePayload) {
        let Ok(target) = Uuid::parse_str(&to) else {
            return;
        };
        self.send_to_connection(
            target,
            ServerMessage::Offer {
                offer,
                from: connection_id.to_string(),
            },
        )
        .await;
    }

    pub(crate) async fn handle_answer(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        answer: OpaquePayload,
    ) {
        let Some(sender_user_id) = self.registry.find_user_by_socket(connection_id) else {
            return;
        };
        self.broadcast_room(
            &room_id,
            ServerMessage::Answer {
                answer,
                from: connection_id.to_string(),
            },
            Some(&sender_user_id),
        )
        .await;
    }

    pub(crate) async fn handle_ice_candidate(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        candidate: OpaquePayload,
        to: Option<String>,
    ) {
        let message = ServerMessage::IceCandidate {
            candidate,
            from: connection_id.to_string(),
        };
        match to.and_then(|raw| Uuid::parse_str(&raw).ok()) {
            Some(target) => self.send_to_connection(target, message).await,
            None => {
                let Some(sender_user_id) = self.registry.find_user_by_socket(connection_id) else {
                    return;
                };
                self.broadcast_room(&room_id, message, Some(&sender_user_id)).await;
            }
        }
    }

    pub(crate) async fn handle_stop_sharing(&self, room_id: RoomId) {
        self.broadcast_room(&room_id, ServerMessage::StopSharing, None).await;
    }

    pub(crate) async fn handle_host_ready_to_share(&self, connection_id: ConnectionId, room_id: RoomId) {
        let Some(room) = self.registry.find_room(&room_id).await else {
            return;
        };
        let viewer_ids = room
            .viewers()
            .filter_map(|viewer| self.registry.get_user_socket(viewer))
            .map(|conn| conn.to_string())
            .collect();
        self.send_to_connection(connection_id, ServerMessage::ExistingViewers { viewer_ids })
            .await;
    }

    pub(crate) async fn handle_request_stream(&self, connection_id: ConnectionId, room_id: RoomId) {
        let Some(room) = self.registry.find_room(&room_id).await else {
            return;
        };
        self.send_to_user(
            &room.host_id,
            ServerMessage::RequestStream {
                viewer_id: connection_id.to_string(),
            },
        )
        .await;
    }
}
