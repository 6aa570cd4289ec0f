//! Signaling Orchestrator: owns every collaborator (room registry, presence
//! controller, media engine, storage, profanity filter), tracks live
//! connections, and dispatches inbound client events to the handlers in
//! [`server::room_service`], [`server::relay_service`], [`server::sfu_service`]
//! and [`server::chat_service`].

pub mod chat_service;
pub mod disconnect;
pub mod dispatch;
pub mod messaging;
pub mod relay_service;
pub mod room_service;
pub mod sfu_service;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::{Config, StorageKind};
use crate::media::pool::PoolConfig;
use crate::media::MediaEngine;
use crate::metrics::ServerMetrics;
use crate::presence::PresenceController;
use crate::profanity::{ProfanityFilter, WordListFilter};
use crate::protocol::{ConnectionId, Room, RoomId, ServerMessage, UserId};
use crate::registry::RoomRegistry;
use crate::storage::json_file::JsonFileChatStorage;
use crate::storage::memory::InMemoryChatStorage;
use crate::storage::ChatStorage;

/// The full signaling core, shared behind an `Arc` by every connection task.
pub struct RoomOrchestrator {
    pub(crate) registry: Arc<RoomRegistry>,
    pub(crate) presence: PresenceController,
    pub(crate) media: Arc<MediaEngine>,
    pub(crate) storage: Arc<dyn ChatStorage>,
    pub(crate) profanity: Arc<dyn ProfanityFilter>,
    pub(crate) connections: DashMap<ConnectionId, mpsc::Sender<Arc<ServerMessage>>>,
    pub(crate) display_names: DashMap<UserId, String>,
    pub(crate) chat_history_limit: usize,
    pub metrics: Arc<ServerMetrics>,
}

impl RoomOrchestrator {
    pub async fn new(config: &Config) -> anyhow::Result<Arc<Self>> {
        let registry = Arc::new(RoomRegistry::new());
        let presence = PresenceController::new(
            Arc::clone(&registry),
            Duration::from_secs(config.server.grace_period_secs),
        );

        let pool_config = PoolConfig {
            min_workers: config.media.min_workers,
            max_workers: config.media.max_workers,
            scale_up_cpu: config.media.scale_up_cpu,
            scale_down_cpu: config.media.scale_down_cpu,
            ..PoolConfig::default()
        };
        let media = Arc::new(MediaEngine::startup(pool_config, config.media.announced_ip.clone()).await);

        let storage: Arc<dyn ChatStorage> = match config.storage.kind {
            StorageKind::Memory => Arc::new(InMemoryChatStorage::new()),
            StorageKind::Json | StorageKind::Firebase => {
                if config.storage.kind == StorageKind::Firebase {
                    warn!("storage.kind=firebase has no concrete client available, falling back to json");
                }
                Arc::new(JsonFileChatStorage::open(config.storage.path.clone().into()).await?)
            }
        };

        Ok(Arc::new(Self {
            registry,
            presence,
            media,
            storage,
            profanity: Arc::new(WordListFilter::default_list()),
            connections: DashMap::new(),
            display_names: DashMap::new(),
            chat_history_limit: config.server.chat_history_limit,
            metrics: Arc::new(ServerMetrics::new()),
        }))
    }

    pub fn register_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<Arc<ServerMessage>>,
    ) {
        self.connections.insert(connection_id, sender);
        self.metrics.increment_connections();
    }

    pub fn unregister_connection(&self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
        self.metrics.decrement_active_connections();
    }

    /// Forces a stale connection closed by dropping its outbound sender: the
    /// websocket send loop observes the channel close and tears the socket
    /// down, which in turn drives the transport layer's own disconnect path.
    /// Used when a reconnect rebinds a user to a new connection while an old
    /// one is still technically live.
    pub(crate) fn force_close_connection(&self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
    }

    pub(crate) async fn send_to_connection(&self, connection_id: ConnectionId, message: ServerMessage) {
        if let Some(sender) = self.connections.get(&connection_id) {
            let _ = sender.send(Arc::new(message)).await;
        }
    }

    pub(crate) async fn send_to_user(&self, user_id: &str, message: ServerMessage) {
        if let Some(connection_id) = self.registry.get_user_socket(user_id) {
            self.send_to_connection(connection_id, message).await;
        }
    }

    /// Fans `message` out to `members`, optionally skipping `except`. Callers
    /// pass an already-read membership snapshot rather than a room id so that
    /// fan-out never races a concurrent membership mutation.
    pub(crate) async fn broadcast_to_members(
        &self,
        members: &[UserId],
        message: ServerMessage,
        except: Option<&UserId>,
    ) {
        let message = Arc::new(message);
        for member in members {
            if except.is_some_and(|e| e == member) {
                continue;
            }
            if let Some(connection_id) = self.registry.get_user_socket(member) {
                if let Some(sender) = self.connections.get(&connection_id) {
                    let _ = sender.send(Arc::clone(&message)).await;
                }
            }
        }
    }

    pub(crate) async fn broadcast_room(
        &self,
        room_id: &RoomId,
        message: ServerMessage,
        except: Option<&UserId>,
    ) {
        if let Some(room) = self.registry.find_room(room_id).await {
            self.broadcast_to_members(&room.members, message, except).await;
        }
    }

    /// Snapshot of every currently-registered display name, used for
    /// in-room uniqueness checks. Cheap enough to rebuild per join: display
    /// names change only on join, and rooms are small.
    pub(crate) fn display_name_snapshot(&self) -> HashMap<UserId, String> {
        self.display_names
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub(crate) async fn load_chat_history(&self, room_id: &RoomId) -> Vec<crate::protocol::ChatMessage> {
        match self.storage.get_messages(room_id, self.chat_history_limit).await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(%room_id, error = %err, "failed to load chat history");
                Vec::new()
            }
        }
    }

    /// Shared departure path for both explicit `leave-room` and grace-timer
    /// expiry. Removes `user_id` from its room and broadcasts `member-left`
    /// unconditionally, then additionally tears the room down (every
    /// `producerClosed` followed by `room-deleted`) if the departing user was
    /// the host.
    pub(crate) async fn commit_departure(&self, room_id: &RoomId, user_id: &UserId) {
        let Some(room) = self.registry.remove_member_from_room(room_id, user_id).await else {
            return;
        };
        self.registry.delete_user_socket(user_id);
        self.registry.delete_user_room(user_id);
        self.display_names.remove(user_id);
        self.metrics.increment_members_left();

        self.broadcast_to_members(
            &room.members,
            ServerMessage::MemberLeft {
                user_id: user_id.clone(),
                members: room.members.clone(),
            },
            None,
        )
        .await;

        if room.host_id == *user_id {
            self.destroy_room(room_id, &room).await;
        }
    }

    /// Tears down a room whose host has left: closes every open producer
    /// first (so viewers can react to `producerClosed` before the room
    /// disappears from under them), then the router, then the room entry.
    pub(crate) async fn destroy_room(&self, room_id: &RoomId, room_after_host_removed: &Room) {
        let closed_producers = self.media.cleanup_user_media(room_id, "");
        for producer_id in closed_producers {
            self.broadcast_to_members(
                &room_after_host_removed.members,
                ServerMessage::ProducerClosed { producer_id },
                None,
            )
            .await;
            self.metrics.increment_producers_closed();
        }
        self.media.close_room(room_id).await;
        self.metrics.increment_media_routers_closed();

        self.registry.delete_room(room_id).await;
        self.metrics.increment_rooms_deleted();

        self.broadcast_to_members(
            &room_after_host_removed.members,
            ServerMessage::RoomDeleted {
                message: "Host has left the room".to_string(),
            },
            None,
        )
        .await;
    }
}
