use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::{ChatMessage, Reaction, RoomId};

use super::{toggle_reaction, ChatStorage};

/// In-memory `ChatStorage`, used by default for ephemeral deployments and in
/// tests. History does not survive a process restart.
#[derive(Default)]
pub struct InMemoryChatStorage {
    rooms: RwLock<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl InMemoryChatStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStorage for InMemoryChatStorage {
    async fn save_message(&self, message: ChatMessage) -> anyhow::Result<()> {
        self.rooms
            .write()
            .await
            .entry(message.room_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn get_messages(&self, room_id: &RoomId, limit: usize) -> anyhow::Result<Vec<ChatMessage>> {
        let rooms = self.rooms.read().await;
        let messages = rooms.get(room_id).cloned().unwrap_or_default();
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn delete_room_messages(&self, room_id: &RoomId) -> anyhow::Result<()> {
        self.rooms.write().await.remove(room_id);
        Ok(())
    }

    async fn add_reaction(
        &self,
        room_id: &RoomId,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> anyhow::Result<Vec<Reaction>> {
        let mut rooms = self.rooms.write().await;
        let messages = rooms
            .get_mut(room_id)
            .ok_or_else(|| anyhow::anyhow!("room {room_id} has no message history"))?;
        let message = messages
            .iter_mut()
            .find(|m| m.id.to_string() == message_id)
            .ok_or_else(|| anyhow::anyhow!("message {message_id} not found"))?;
        Ok(toggle_reaction(&mut message.reactions, user_id, emoji))
    }
}
