//! Transport-level disconnect handling: arms the grace timer and commits a
//! departure if the user has not reconnected by the time it fires.

use crate::protocol::ConnectionId;

use super::RoomOrchestrator;

impl RoomOrchestrator {
    pub async fn handle_disconnect(self: &std::sync::Arc<Self>, connection_id: ConnectionId) {
        self.unregister_connection(connection_id);

        let Some(user_id) = self.registry.find_user_by_socket(connection_id) else {
            return;
        };

        let Some(room_id) = self.registry.get_user_room(&user_id) else {
            return;
        };

        self.metrics.increment_grace_timers_armed();
        let orchestrator = std::sync::Arc::clone(self);
        self.presence.arm_grace_timer(user_id, move |user_id| async move {
            orchestrator.metrics.increment_grace_timers_expired();
            orchestrator.commit_departure(&room_id, &user_id).await;
        });
    }
}
