use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::{ChatMessage, Reaction, RoomId};

use super::{toggle_reaction, ChatStorage};

/// `ChatStorage` backed by a single local JSON snapshot file: the whole
/// `room_id → messages` map is read at startup and rewritten on every
/// mutation. Adequate for the single-instance deployment this core targets;
/// not a substitute for a real database under concurrent multi-process load.
pub struct JsonFileChatStorage {
    path: PathBuf,
    rooms: RwLock<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl JsonFileChatStorage {
    pub async fn open(path: PathBuf) -> anyhow::Result<Self> {
        let rooms = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            rooms: RwLock::new(rooms),
        })
    }

    async fn flush(&self, rooms: &HashMap<RoomId, Vec<ChatMessage>>) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(rooms)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatStorage for JsonFileChatStorage {
    async fn save_message(&self, message: ChatMessage) -> anyhow::Result<()> {
        let mut rooms = self.rooms.write().await;
        rooms.entry(message.room_id.clone()).or_default().push(message);
        self.flush(&rooms).await
    }

    async fn get_messages(&self, room_id: &RoomId, limit: usize) -> anyhow::Result<Vec<ChatMessage>> {
        let rooms = self.rooms.read().await;
        let messages = rooms.get(room_id).cloned().unwrap_or_default();
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn delete_room_messages(&self, room_id: &RoomId) -> anyhow::Result<()> {
        let mut rooms = self.rooms.write().await;
        rooms.remove(room_id);
        self.flush(&rooms).await
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
        let reactions = toggle_reaction(&mut message.reactions, user_id, emoji);
        self.flush(&rooms).await?;
        Ok(reactions)
    }
}
