//! Protocol module: wire message types, validation, and room state.

pub mod messages;
pub mod room_state;
pub mod types;
pub mod validation;

pub use messages::{ClientMessage, ServerMessage, TransportDirection};
pub use room_state::Room;
pub use types::{
    ChatMessage, ConnectionId, MessageId, OpaquePayload, Reaction, RoomId, Theme, UserId,
    ViewerId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_round_trips_membership() {
        let mut room = Room::new("room-abc123".to_string(), "host-1".to_string());
        assert!(room.add_member("viewer-1".to_string()));
        assert!(room.contains_member("viewer-1"));
        assert!(room.remove_member("viewer-1"));
        assert!(!room.contains_member("viewer-1"));
    }

    #[test]
    fn validation_rejects_blank_and_overlong() {
        assert!(validation::validate_name("Alice").is_ok());
        assert!(validation::validate_name("").is_err());
        assert!(validation::validate_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn theme_round_trips_through_json() {
        let value = serde_json::to_value(Theme::LunarNewYear).unwrap();
        assert_eq!(value, serde_json::json!("lunar-new-year"));
        let back: Theme = serde_json::from_value(value).unwrap();
        assert_eq!(back, Theme::LunarNewYear);
    }
}
