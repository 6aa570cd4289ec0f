use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::RoomRegistryError;
use crate::protocol::{ConnectionId, Room, RoomId, UserId};

/// Derives the stable, reload-surviving room id for a host identity.
///
/// `roomId = "room-" + first-12-hex(sha256("room-" + hostId))`. Deterministic
/// so that a host who reloads and re-creates the room lands on the same id,
/// keeping chat history (keyed by room id) intact.
pub fn derive_room_id(host_id: &str) -> RoomId {
    let mut hasher = Sha256::new();
    hasher.update(b"room-");
    hasher.update(host_id.as_bytes());
    let digest = hasher.finalize();
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    format!("room-{}", &hex[..12])
}

/// A user identity's presence state, maintained by the Presence & Reconnection
/// Controller and consulted by the orchestrator when a grace timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Present,
    Grace,
}

#[derive(Debug, Clone)]
struct Presence {
    state: PresenceState,
    /// Bumped every time the user rebinds to a new connection; a grace timer
    /// captures the generation at arm time and only acts if it still matches
    /// at fire time, closing the race between disconnect and reconnect.
    generation: u64,
}

/// Pure in-memory room/membership/presence store.
///
/// Rooms and presence are behind a single `RwLock` each: both are read-modify-
/// write under the orchestrator's per-room exclusion regime, so a `RwLock`
/// guarding a plain `HashMap` is simpler than per-entry sharding. The
/// connection-keyed reverse maps (`socket → user`, `user → socket`,
/// `user → room`) are hot on every inbound frame and involve no multi-key
/// invariant, so they live in `DashMap`s instead.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, Room>>,
    presence: RwLock<HashMap<UserId, Presence>>,
    user_socket: DashMap<UserId, ConnectionId>,
    socket_user: DashMap<ConnectionId, UserId>,
    user_room: DashMap<UserId, RoomId>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            presence: RwLock::new(HashMap::new()),
            user_socket: DashMap::new(),
            socket_user: DashMap::new(),
            user_room: DashMap::new(),
        }
    }

    /// Creates the room owned by `host_id`, or returns the existing one with
    /// the host re-added if it had been removed (idempotent-for-host).
    pub async fn create_room(&self, host_id: &str) -> Room {
        let room_id = derive_room_id(host_id);
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, host_id.to_string()));
        room.add_member(host_id.to_string());
        room.clone()
    }

    pub async fn find_room(&self, room_id: &str) -> Option<Room> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn delete_room(&self, room_id: &str) -> Option<Room> {
        self.rooms.write().await.remove(room_id)
    }

    pub async fn add_member_to_room(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<Room, RoomRegistryError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomRegistryError::RoomNotFound(room_id.to_string()))?;
        room.add_member(user_id.to_string());
        Ok(room.clone())
    }

    /// Removes `user_id` from `room_id`. Returns the room's state after
    /// removal, or `None` if the room no longer exists.
    pub async fn remove_member_from_room(&self, room_id: &str, user_id: &str) -> Option<Room> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id)?;
        room.remove_member(user_id);
        Some(room.clone())
    }

    /// Updates `room_id`'s theme, returning the updated room, or `None` if
    /// the room no longer exists.
    pub async fn set_room_theme(&self, room_id: &str, theme: crate::protocol::Theme) -> Option<Room> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id)?;
        room.theme = theme;
        Some(room.clone())
    }

    pub fn set_user_socket(&self, user_id: &str, connection_id: ConnectionId) {
        if let Some(old) = self.user_socket.insert(user_id.to_string(), connection_id) {
            self.socket_user.remove(&old);
        }
        self.socket_user.insert(connection_id, user_id.to_string());
    }

    pub fn get_user_socket(&self, user_id: &str) -> Option<ConnectionId> {
        self.user_socket.get(user_id).map(|v| *v)
    }

    pub fn delete_user_socket(&self, user_id: &str) {
        if let Some((_, connection_id)) = self.user_socket.remove(user_id) {
            self.socket_user.remove(&connection_id);
        }
    }

    pub fn find_user_by_socket(&self, connection_id: ConnectionId) -> Option<UserId> {
        self.socket_user.get(&connection_id).map(|v| v.clone())
    }

    pub fn set_user_room(&self, user_id: &str, room_id: RoomId) {
        self.user_room.insert(user_id.to_string(), room_id);
    }

    pub fn get_user_room(&self, user_id: &str) -> Option<RoomId> {
        self.user_room.get(user_id).map(|v| v.clone())
    }

    pub fn delete_user_room(&self, user_id: &str) {
        self.user_room.remove(user_id);
    }

    /// Rebinds `user_id` to `connection_id` atomically, closing the window in
    /// which a stale `connectionId → userId` entry could be picked up by a
    /// disconnect handler racing the reconnect.
    pub fn rebind_socket(&self, user_id: &str, connection_id: ConnectionId) -> Option<ConnectionId> {
        let previous = self.user_socket.insert(user_id.to_string(), connection_id);
        if let Some(old) = previous {
            self.socket_user.remove(&old);
        }
        self.socket_user.insert(connection_id, user_id.to_string());
        previous
    }

    /// Marks `user_id` present and returns the generation to use if a grace
    /// timer needs to be armed later.
    pub async fn mark_present(&self, user_id: &str) -> u64 {
        let mut presence = self.presence.write().await;
        let entry = presence
            .entry(user_id.to_string())
            .or_insert(Presence {
                state: PresenceState::Present,
                generation: 0,
            });
        entry.state = PresenceState::Present;
        entry.generation += 1;
        entry.generation
    }

    /// Marks `user_id` in the grace window and returns the generation the
    /// caller must present unchanged at fire time for the expiry to apply.
    pub async fn mark_grace(&self, user_id: &str) -> u64 {
        let mut presence = self.presence.write().await;
        let entry = presence
            .entry(user_id.to_string())
            .or_insert(Presence {
                state: PresenceState::Grace,
                generation: 0,
            });
        entry.state = PresenceState::Grace;
        entry.generation
    }

    /// Evaluates a grace timer firing for `user_id` at `generation`. Returns
    /// `true` if the user should transition to `absent` (the captured
    /// generation is still current and the state is still `grace`); `false`
    /// if a reconnect already raced ahead of the timer.
    pub async fn grace_expires(&self, user_id: &str, generation: u64) -> bool {
        let presence = self.presence.read().await;
        match presence.get(user_id) {
            Some(p) => p.state == PresenceState::Grace && p.generation == generation,
            None => false,
        }
    }

    pub async fn mark_absent(&self, user_id: &str) {
        self.presence.write().await.remove(user_id);
    }

    pub async fn presence_state(&self, user_id: &str) -> Option<PresenceState> {
        self.presence.read().await.get(user_id).map(|p| p.state)
    }
}
