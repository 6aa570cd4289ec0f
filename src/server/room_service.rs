//! Room lifecycle handlers: `create-room`, `join-room`, `leave-room`,
//! `validate-room`.

use crate::protocol::{ConnectionId, RoomId, ServerMessage, UserId};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub(crate) async fn handle_create_room(
        &self,
        connection_id: ConnectionId,
        host_id: UserId,
        name: String,
    ) {
        self.presence.mark_present(&host_id).await;

        let existing_room_id = self.registry.get_user_room(&host_id);
        let mut rejoin_with_viewers = false;

        if let Some(room_id) = existing_room_id {
            if let Some(existing_room) = self.registry.find_room(&room_id).await {
                let old_connection = self.registry.get_user_socket(&host_id);
                if old_connection != Some(connection_id) {
                    if let Some(old_conn) = old_connection {
                        let closed = self.media.cleanup_user_media(&room_id, &old_conn.to_string());
                        for producer_id in closed {
                            self.broadcast_room(&room_id, ServerMessage::ProducerClosed { producer_id }, None)
                                .await;
                            self.metrics.increment_producers_closed();
                        }
                    }

                    if existing_room.has_only_host() {
                        self.registry.remove_member_from_room(&room_id, &host_id).await;
                    } else {
                        rejoin_with_viewers = true;
                    }

                    self.registry.rebind_socket(&host_id, connection_id);
                    if let Some(old_conn) = old_connection {
                        self.force_close_connection(old_conn);
                    }
                }
            }
        } else {
            self.registry.rebind_socket(&host_id, connection_id);
        }

        let room = self.registry.create_room(&host_id).await;
        self.registry.set_user_room(&host_id, room.id.clone());
        self.display_names.insert(host_id.clone(), name);
        self.metrics.increment_rooms_created();

        self.send_to_connection(
            connection_id,
            ServerMessage::RoomCreated {
                room_id: room.id.clone(),
                members: room.members.clone(),
                theme: room.theme,
            },
        )
        .await;

        if rejoin_with_viewers {
            self.broadcast_to_members(
                &room.members,
                ServerMessage::HostReconnected {
                    host_id: host_id.clone(),
                    host_socket_id: connection_id.to_string(),
                },
                Some(&host_id),
            )
            .await;
        }

        let history = self.load_chat_history(&room.id).await;
        self.send_to_connection(connection_id, ServerMessage::ChatHistory { messages: history })
            .await;
    }

    pub(crate) async fn handle_join_room(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        member_id: UserId,
        name: String,
    ) {
        let Some(room) = self.registry.find_room(&room_id).await else {
            self.send_error_to_connection(connection_id, "This room no longer exists.".to_string())
                .await;
            return;
        };

        let is_reconnect = room.contains_member(&member_id)
            || self.registry.get_user_room(&member_id).as_deref() == Some(room_id.as_str());

        if !is_reconnect {
            let names = self.display_name_snapshot();
            if room.name_taken_by_other(&name, &member_id, &names) {
                self.metrics.increment_name_conflicts_rejected();
                self.send_error_to_connection(
                    connection_id,
                    format!("The name \"{name}\" is already taken in this room."),
                )
                .await;
                return;
            }
        }

        self.presence.mark_present(&member_id).await;

        let old_connection = self.registry.get_user_socket(&member_id);
        if is_reconnect {
            if old_connection.is_some_and(|c| c != connection_id) {
                self.registry.rebind_socket(&member_id, connection_id);
                if let Some(old_conn) = old_connection {
                    self.force_close_connection(old_conn);
                }
            } else {
                self.registry.rebind_socket(&member_id, connection_id);
            }
        } else {
            if let Some(previous_room_id) = self.registry.get_user_room(&member_id) {
                if previous_room_id != room_id {
                    self.commit_departure(&previous_room_id, &member_id).await;
                }
            }
            self.registry.rebind_socket(&member_id, connection_id);
        }

        let room = match self.registry.add_member_to_room(&room_id, &member_id).await {
            Ok(room) => room,
            Err(err) => {
                self.send_error_to_connection(connection_id, err.to_string()).await;
                return;
            }
        };
        self.registry.set_user_room(&member_id, room_id.clone());
        self.display_names.insert(member_id.clone(), name);
        if !is_reconnect {
            self.metrics.increment_members_joined();
        }

        self.send_to_connection(
            connection_id,
            ServerMessage::RoomJoined {
                room_id: room.id.clone(),
                members: room.members.clone(),
                theme: room.theme,
            },
        )
        .await;

        self.broadcast_to_members(
            &room.members,
            ServerMessage::MemberJoined {
                members: room.members.clone(),
            },
            Some(&member_id),
        )
        .await;

        if member_id != room.host_id {
            self.send_to_user(
                &room.host_id,
                ServerMessage::ViewerJoined {
                    viewer_id: connection_id.to_string(),
                },
            )
            .await;
        }

        let history = self.load_chat_history(&room.id).await;
        self.send_to_connection(connection_id, ServerMessage::ChatHistory { messages: history })
            .await;
    }

    pub(crate) async fn handle_leave_room(&self, room_id: RoomId, member_id: UserId) {
        self.commit_departure(&room_id, &member_id).await;
    }

    pub(crate) async fn handle_validate_room(&self, connection_id: ConnectionId, room_id: RoomId) {
        let room = self.registry.find_room(&room_id).await;
        self.send_to_connection(
            connection_id,
            ServerMessage::RoomValidated {
                exists: room.is_some(),
                room_id,
                member_count: room.map(|r| r.members.len()),
            },
        )
        .await;
    }
}
