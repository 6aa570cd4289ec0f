use std::time::Instant;

use crate::protocol::{ClientMessage, ConnectionId};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    /// Routes one inbound frame to its handler, recording dispatch latency
    /// regardless of which branch it takes.
    pub async fn handle_client_message(&self, connection_id: ConnectionId, message: ClientMessage) {
        let started = Instant::now();

        match message {
            ClientMessage::CreateRoom { host_id, name } => {
                self.handle_create_room(connection_id, host_id, name).await;
            }
            ClientMessage::ValidateRoom { room_id } => {
                self.handle_validate_room(connection_id, room_id).await;
            }
            ClientMessage::JoinRoom { room_id, member_id, name } => {
                self.handle_join_room(connection_id, room_id, member_id, name).await;
            }
            ClientMessage::LeaveRoom { room_id, member_id } => {
                self.handle_leave_room(room_id, member_id).await;
            }
            ClientMessage::SpinResult { room_id, result } => {
                self.broadcast_room(&room_id, crate::protocol::ServerMessage::SpinResult { result }, None)
                    .await;
            }
            ClientMessage::Offer { to, offer, .. } => {
                self.handle_offer(connection_id, to, offer).await;
            }
            ClientMessage::Answer { room_id, answer } => {
                self.handle_answer(connection_id, room_id, answer).await;
            }
            ClientMessage::IceCandidate { room_id, candidate, to } => {
                self.handle_ice_candidate(connection_id, room_id, candidate, to).await;
            }
            ClientMessage::StopSharing { room_id } => {
                self.handle_stop_sharing(room_id).await;
            }
            ClientMessage::HostReadyToShare { room_id } => {
                self.handle_host_ready_to_share(connection_id, room_id).await;
            }
            ClientMessage::RequestStream { room_id } => {
                self.handle_request_stream(connection_id, room_id).await;
            }
            ClientMessage::LivestreamReaction { room_id, user_name, emoji, user_id } => {
                self.handle_livestream_reaction(room_id, user_name, emoji, user_id).await;
            }
            ClientMessage::UpdateTheme { room_id, theme } => {
                self.handle_update_theme(room_id, theme).await;
            }
            ClientMessage::SendMessage { user_id, user_name, message, room_id } => {
                self.handle_send_message(user_id, user_name, message, room_id).await;
            }
            ClientMessage::ReactToMessage { room_id, message_id, user_id, emoji } => {
                self.handle_react_to_message(room_id, message_id, user_id, emoji).await;
            }
            ClientMessage::GetRouterRtpCapabilities { room_id } => {
                self.handle_get_router_rtp_capabilities(connection_id, room_id).await;
            }
            ClientMessage::CreateTransport { room_id, direction } => {
                self.handle_create_transport(connection_id, room_id, direction).await;
            }
            ClientMessage::ConnectTransport { room_id, transport_id, dtls_parameters } => {
                self.handle_connect_transport(connection_id, room_id, transport_id, dtls_parameters)
                    .await;
            }
            ClientMessage::Produce { room_id, transport_id, kind, rtp_parameters } => {
                self.handle_produce(connection_id, room_id, transport_id, kind, rtp_parameters)
                    .await;
            }
            ClientMessage::Consume { room_id, transport_id, producer_id, rtp_capabilities } => {
                self.handle_consume(connection_id, room_id, transport_id, producer_id, rtp_capabilities)
                    .await;
            }
            ClientMessage::ResumeConsumer { room_id, consumer_id } => {
                self.handle_resume_consumer(connection_id, room_id, consumer_id).await;
            }
            ClientMessage::GetProducers { room_id } => {
                self.handle_get_producers(connection_id, room_id).await;
            }
            ClientMessage::CloseProducer { room_id, producer_id } => {
                self.handle_close_producer(room_id, producer_id).await;
            }
        }

        self.metrics.record_dispatch_latency(started.elapsed()).await;
    }
}
