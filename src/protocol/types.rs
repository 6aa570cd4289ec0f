use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-supplied opaque identity. The core never authenticates this value;
/// it is whatever the client hands over on `create-room`/`join-room`.
pub type UserId = String;

/// Opaque id assigned by the transport to a single connection.
pub type ConnectionId = Uuid;

/// Deterministic room identifier, derived from the host's [`UserId`] (see
/// [`crate::registry::derive_room_id`]). Always of the form `room-{12 hex}`.
pub type RoomId = String;

/// A chat message's server-minted id.
pub type MessageId = Uuid;

/// Visual theme applied to a room, broadcast to all members on change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    None,
    Christmas,
    LunarNewYear,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Christmas => "christmas",
            Self::LunarNewYear => "lunar-new-year",
        };
        write!(f, "{s}")
    }
}

/// A single emoji reaction and the set of users who placed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub user_ids: Vec<UserId>,
}

/// A persisted or in-flight chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub user_name: String,
    pub message: String,
    /// Server wall-clock time the message was accepted, in epoch milliseconds.
    pub timestamp: i64,
    pub room_id: RoomId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

/// WebRTC/mediasoup payloads are opaque to the orchestrator: SDP blobs, ICE
/// candidates, DTLS parameters and RTP capabilities are produced and consumed
/// entirely by clients and the media engine. The core only relays or stores
/// them without interpreting their contents.
pub type OpaquePayload = serde_json::Value;

/// A viewer's connection, as seen from the signaling layer.
pub type ViewerId = ConnectionId;
