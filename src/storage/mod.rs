pub mod json_file;
pub mod memory;

use async_trait::async_trait;

use crate::protocol::{ChatMessage, Reaction, RoomId};

/// Persistence boundary for chat history and reactions. Chosen at startup
/// from config (`firebase | json`); `json` is implemented concretely as a
/// local snapshot file, `memory` backs tests and ephemeral deployments.
///
/// A real Firebase-backed implementation is out of scope here: it would
/// require a dependency (a Firestore/Realtime Database client) not actually
/// available, and fabricating one is worse than not having it.
/// `StorageKind::Firebase` in config is accepted and documented, but
/// resolves to the JSON file backend at startup (see DESIGN.md).
#[async_trait]
pub trait ChatStorage: Send + Sync {
    async fn save_message(&self, message: ChatMessage) -> anyhow::Result<()>;

    /// Most recent messages for a room, oldest first, capped at `limit`.
    async fn get_messages(&self, room_id: &RoomId, limit: usize) -> anyhow::Result<Vec<ChatMessage>>;

    async fn delete_room_messages(&self, room_id: &RoomId) -> anyhow::Result<()>;

    /// Toggles `user_id`'s reaction with `emoji` on `message_id`: removes it
    /// if already present, adds it otherwise, and drops the reaction entry
    /// entirely once its user set is empty. Returns the message's reactions
    /// after the toggle.
    async fn add_reaction(
        &self,
        room_id: &RoomId,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> anyhow::Result<Vec<Reaction>>;
}

/// Applies the toggle semantics shared by every `ChatStorage` impl against an
/// in-memory message list, so each backend only needs to supply the
/// load/save primitives.
pub(crate) fn toggle_reaction(
    reactions: &mut Vec<Reaction>,
    user_id: &str,
    emoji: &str,
) -> Vec<Reaction> {
    if let Some(reaction) = reactions.iter_mut().find(|r| r.emoji == emoji) {
        if let Some(pos) = reaction.user_ids.iter().position(|u| u == user_id) {
            reaction.user_ids.remove(pos);
        } else {
            reaction.user_ids.push(user_id.to_string());
        }
    } else {
        reactions.push(Reaction {
            emoji: emoji.to_string(),
            user_ids: vec![user_id.to_string()],
        });
    }
    reactions.retain(|r| !r.user_ids.is_empty());
    reactions.clone()
}
