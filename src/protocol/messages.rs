use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, OpaquePayload, Reaction, RoomId, Theme, UserId};

/// Every event the client may send. Tagged on `type`, payload under `data`.
/// Event names use kebab-case for room/chat/relay events and camelCase for
/// the SFU signaling surface, matching the two distinct naming conventions
/// of the event set.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename = "create-room")]
    CreateRoom { host_id: UserId, name: String },

    #[serde(rename = "validate-room")]
    ValidateRoom { room_id: RoomId },

    #[serde(rename = "join-room")]
    JoinRoom {
        room_id: RoomId,
        member_id: UserId,
        name: String,
    },

    #[serde(rename = "leave-room")]
    LeaveRoom {
        room_id: RoomId,
        member_id: UserId,
    },

    #[serde(rename = "spin-result")]
    SpinResult {
        room_id: RoomId,
        result: OpaquePayload,
    },

    #[serde(rename = "offer")]
    Offer {
        room_id: RoomId,
        offer: OpaquePayload,
        to: String,
    },

    #[serde(rename = "answer")]
    Answer {
        room_id: RoomId,
        answer: OpaquePayload,
    },

    #[serde(rename = "ice-candidate")]
    IceCandidate {
        room_id: RoomId,
        candidate: OpaquePayload,
        #[serde(default)]
        to: Option<String>,
    },

    #[serde(rename = "stop-sharing")]
    StopSharing { room_id: RoomId },

    #[serde(rename = "host-ready-to-share")]
    HostReadyToShare { room_id: RoomId },

    #[serde(rename = "request-stream")]
    RequestStream { room_id: RoomId },

    #[serde(rename = "livestream-reaction")]
    LivestreamReaction {
        room_id: RoomId,
        user_name: String,
        emoji: String,
        user_id: UserId,
    },

    #[serde(rename = "update-theme")]
    UpdateTheme { room_id: RoomId, theme: Theme },

    #[serde(rename = "send-message")]
    SendMessage {
        user_id: UserId,
        user_name: String,
        message: String,
        room_id: RoomId,
    },

    #[serde(rename = "react-to-message")]
    ReactToMessage {
        room_id: RoomId,
        message_id: String,
        user_id: UserId,
        emoji: String,
    },

    #[serde(rename = "getRouterRtpCapabilities")]
    GetRouterRtpCapabilities { room_id: RoomId },

    #[serde(rename = "createTransport")]
    CreateTransport { room_id: RoomId, direction: TransportDirection },

    #[serde(rename = "connectTransport")]
    ConnectTransport {
        room_id: RoomId,
        transport_id: String,
        dtls_parameters: OpaquePayload,
    },

    #[serde(rename = "produce")]
    Produce {
        room_id: RoomId,
        transport_id: String,
        kind: String,
        rtp_parameters: OpaquePayload,
    },

    #[serde(rename = "consume")]
    Consume {
        room_id: RoomId,
        transport_id: String,
        producer_id: String,
        rtp_capabilities: OpaquePayload,
    },

    #[serde(rename = "resumeConsumer")]
    ResumeConsumer {
        room_id: RoomId,
        consumer_id: String,
    },

    #[serde(rename = "getProducers")]
    GetProducers { room_id: RoomId },

    #[serde(rename = "closeProducer")]
    CloseProducer {
        room_id: RoomId,
        producer_id: String,
    },
}

/// Send or receive direction for a WebRTC transport, relative to the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportDirection {
    Send,
    Recv,
}

/// Every event the server may emit, tagged the same way as [`ClientMessage`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename = "room-created")]
    RoomCreated {
        room_id: RoomId,
        members: Vec<UserId>,
        theme: Theme,
    },

    #[serde(rename = "room-validated")]
    RoomValidated {
        exists: bool,
        room_id: RoomId,
        #[serde(skip_serializing_if = "Option::is_none")]
        member_count: Option<usize>,
    },

    #[serde(rename = "room-joined")]
    RoomJoined {
        room_id: RoomId,
        members: Vec<UserId>,
        theme: Theme,
    },

    #[serde(rename = "room-deleted")]
    RoomDeleted { message: String },

    #[serde(rename = "member-joined")]
    MemberJoined { members: Vec<UserId> },

    #[serde(rename = "member-left")]
    MemberLeft {
        user_id: UserId,
        members: Vec<UserId>,
    },

    #[serde(rename = "host-reconnected")]
    HostReconnected {
        host_id: UserId,
        host_socket_id: String,
    },

    #[serde(rename = "theme-updated")]
    ThemeUpdated { theme: Theme },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "offer")]
    Offer {
        offer: OpaquePayload,
        from: String,
    },

    #[serde(rename = "answer")]
    Answer {
        answer: OpaquePayload,
        from: String,
    },

    #[serde(rename = "ice-candidate")]
    IceCandidate {
        candidate: OpaquePayload,
        from: String,
    },

    #[serde(rename = "stop-sharing")]
    StopSharing,

    #[serde(rename = "existing-viewers")]
    ExistingViewers { viewer_ids: Vec<String> },

    #[serde(rename = "request-stream")]
    RequestStream { viewer_id: String },

    #[serde(rename = "viewer-joined")]
    ViewerJoined { viewer_id: String },

    #[serde(rename = "livestream-reaction")]
    LivestreamReaction {
        id: String,
        user_name: String,
        emoji: String,
        user_id: UserId,
    },

    #[serde(rename = "spin-result")]
    SpinResult { result: OpaquePayload },

    #[serde(rename = "chat-message")]
    ChatMessageEvent {
        #[serde(flatten)]
        message: ChatMessage,
    },

    #[serde(rename = "chat-history")]
    ChatHistory { messages: Vec<ChatMessage> },

    #[serde(rename = "message-reaction-updated")]
    MessageReactionUpdated {
        message_id: String,
        reactions: Vec<Reaction>,
    },

    #[serde(rename = "routerRtpCapabilities")]
    RouterRtpCapabilities {
        rtp_capabilities: OpaquePayload,
    },

    #[serde(rename = "transportCreated")]
    TransportCreated {
        direction: TransportDirection,
        transport_id: String,
        id: String,
        ice_parameters: OpaquePayload,
        ice_candidates: OpaquePayload,
        dtls_parameters: OpaquePayload,
    },

    #[serde(rename = "transportConnected")]
    TransportConnected { transport_id: String },

    #[serde(rename = "produced")]
    Produced { kind: String, id: String },

    #[serde(rename = "newProducer")]
    NewProducer { producer_id: String, kind: String },

    #[serde(rename = "consumed")]
    Consumed {
        id: String,
        producer_id: String,
        kind: String,
        rtp_parameters: OpaquePayload,
    },

    #[serde(rename = "consumerResumed")]
    ConsumerResumed { consumer_id: String },

    #[serde(rename = "producers")]
    Producers { producers: Vec<String> },

    #[serde(rename = "producerClosed")]
    ProducerClosed { producer_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_tag_matches_event_name() {
        let json = serde_json::json!({
            "type": "create-room",
            "data": { "hostId": "host-1", "name": "Alice" }
        });
        let msg: ClientMessage = serde_json::from_value(json).unwrap();
        match msg {
            ClientMessage::CreateRoom { host_id, name } => {
                assert_eq!(host_id, "host-1");
                assert_eq!(name, "Alice");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn server_message_room_deleted_serializes_with_message() {
        let msg = ServerMessage::RoomDeleted {
            message: "Host has left the room".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "room-deleted");
        assert_eq!(value["data"]["message"], "Host has left the room");
    }

    #[test]
    fn member_left_carries_user_and_remaining_members() {
        let msg = ServerMessage::MemberLeft {
            user_id: "H".to_string(),
            members: vec!["V".to_string()],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["data"]["userId"], "H");
        assert_eq!(value["data"]["members"][0], "V");
    }
}
