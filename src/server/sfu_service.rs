//! mediasoup-style SFU signaling: router/transport/producer/consumer
//! lifecycle against the Media Engine Facade.

use crate::protocol::{ConnectionId, OpaquePayload, RoomId, ServerMessage, TransportDirection};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub(crate) async fn handle_get_router_rtp_capabilities(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) {
        let is_new_router = self.media.router_rtp_capabilities(&room_id).is_none();
        if let Err(err) = self.media.create_router(&room_id).await {
            self.send_error_to_connection(connection_id, err.to_string()).await;
            return;
        }
        if is_new_router {
            self.metrics.increment_media_routers_created();
        }
        let rtp_capabilities = self
            .media
            .router_rtp_capabilities(&room_id)
            .unwrap_or_else(|| serde_json::json!({}));
        self.send_to_connection(connection_id, ServerMessage::RouterRtpCapabilities { rtp_capabilities })
            .await;
    }

    pub(crate) async fn handle_create_transport(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        direction: TransportDirection,
    ) {
        let transport_id = format!(
            "{connection_id}-{}",
            match direction {
                TransportDirection::Send => "send",
                TransportDirection::Recv => "recv",
            }
        );
        match self.media.create_webrtc_transport(&room_id, transport_id, direction) {
            Some(params) => {
                self.send_to_connection(
                    connection_id,
                    ServerMessage::TransportCreated {
                        direction,
                        transport_id: params.id.clone(),
                        id: params.id,
                        ice_parameters: params.ice_parameters,
                        ice_candidates: params.ice_candidates,
                        dtls_parameters: params.dtls_parameters,
                    },
                )
                .await;
            }
            None => {
                self.send_error_to_connection(connection_id, format!("no media room is open for {room_id}"))
                    .await;
            }
        }
    }

    pub(crate) async fn handle_connect_transport(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        transport_id: String,
        _dtls_parameters: OpaquePayload,
    ) {
        if self.media.connect_transport(&room_id, &transport_id) {
            self.send_to_connection(connection_id, ServerMessage::TransportConnected { transport_id })
                .await;
        } else {
            self.send_error_to_connection(connection_id, format!("transport {transport_id} not found"))
                .await;
        }
    }

    pub(crate) async fn handle_produce(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        transport_id: String,
        kind: String,
        _rtp_parameters: OpaquePayload,
    ) {
        let Some(producer) = self.media.produce(&room_id, &transport_id, &kind) else {
            self.send_error_to_connection(connection_id, format!("transport {transport_id} not found"))
                .await;
            return;
        };
        self.metrics.increment_producers_created();

        self.send_to_connection(
            connection_id,
            ServerMessage::Produced {
                kind: producer.kind.clone(),
                id: producer.id.clone(),
            },
        )
        .await;

        let Some(sender_user_id) = self.registry.find_user_by_socket(connection_id) else {
            return;
        };
        self.broadcast_room(
            &room_id,
            ServerMessage::NewProducer {
                producer_id: producer.id,
                kind: producer.kind,
            },
            Some(&sender_user_id),
        )
        .await;
    }

    pub(crate) async fn handle_consume(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        transport_id: String,
        producer_id: String,
        _rtp_capabilities: OpaquePayload,
    ) {
        match self.media.consume(&room_id, &transport_id, &producer_id) {
            Some(consumer) => {
                self.send_to_connection(
                    connection_id,
                    ServerMessage::Consumed {
                        id: consumer.id,
                        producer_id: consumer.producer_id,
                        kind: consumer.kind,
                        rtp_parameters: consumer.rtp_parameters,
                    },
                )
                .await;
            }
            None => {
                self.send_error_to_connection(connection_id, format!("producer {producer_id} not found"))
                    .await;
            }
        }
    }

    pub(crate) async fn handle_resume_consumer(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        consumer_id: String,
    ) {
        if self.media.resume_consumer(&room_id, &consumer_id) {
            self.send_to_connection(connection_id, ServerMessage::ConsumerResumed { consumer_id })
                .await;
        } else {
            self.send_error_to_connection(connection_id, format!("consumer {consumer_id} not found"))
                .await;
        }
    }

    pub(crate) async fn handle_get_producers(&self, connection_id: ConnectionId, room_id: RoomId) {
        let producers = self.media.producers(&room_id);
        self.send_to_connection(connection_id, ServerMessage::Producers { producers }).await;
    }

    pub(crate) async fn handle_close_producer(&self, room_id: RoomId, producer_id: String) {
        if self.media.close_producer(&room_id, &producer_id) {
            self.metrics.increment_producers_closed();
            self.broadcast_room(&room_id, ServerMessage::ProducerClosed { producer_id }, None)
                .await;
        }
    }
}
