//! Chat, reactions, theme, and the ephemeral livestream reaction stream.

use uuid::Uuid;

use crate::protocol::{ChatMessage, RoomId, ServerMessage, Theme, UserId};

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub(crate) async fn handle_send_message(
        &self,
        user_id: UserId,
        user_name: String,
        message: String,
        room_id: RoomId,
    ) {
        let check = self.profanity.validate(&message);
        let chat_message = ChatMessage {
            id: Uuid::new_v4(),
            user_id,
            user_name,
            message: check.cleaned_text,
            timestamp: chrono::Utc::now().timestamp_millis(),
            room_id: room_id.clone(),
            reactions: Vec::new(),
        };

        if let Err(err) = self.storage.save_message(chat_message.clone()).await {
            tracing::warn!(%room_id, error = %err, "failed to persist chat message");
            self.metrics.increment_chat_persistence_failures();
        }
        self.metrics.increment_chat_messages_sent();

        self.broadcast_room(
            &room_id,
            ServerMessage::ChatMessageEvent { message: chat_message },
            None,
        )
        .await;
    }

    pub(crate) async fn handle_react_to_message(
        &self,
        room_id: RoomId,
        message_id: String,
        user_id: UserId,
        emoji: String,
    ) {
        match self.storage.add_reaction(&room_id, &message_id, &user_id, &emoji).await {
            Ok(reactions) => {
                self.metrics.increment_reactions_toggled();
                self.broadcast_room(
                    &room_id,
                    ServerMessage::MessageReactionUpdated { message_id, reactions },
                    None,
                )
                .await;
            }
            Err(err) => {
                self.send_error_to_user(&user_id, err.to_string()).await;
            }
        }
    }

    pub(crate) async fn handle_update_theme(&self, room_id: RoomId, theme: Theme) {
        if self.registry.set_room_theme(&room_id, theme).await.is_some() {
            self.broadcast_room(&room_id, ServerMessage::ThemeUpdated { theme }, None).await;
        }
    }

    pub(crate) async fn handle_livestream_reaction(
        &self,
        room_id: RoomId,
        user_name: String,
        emoji: String,
        user_id: UserId,
    ) {
        self.broadcast_room(
            &room_id,
            ServerMessage::LivestreamReaction {
                id: Uuid::new_v4().to_string(),
                user_name,
                emoji,
                user_id,
            },
            None,
        )
        .await;
    }
}
