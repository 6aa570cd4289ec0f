use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::protocol::UserId;
use crate::registry::RoomRegistry;

/// Arms and resolves the grace-period timers that separate a transport-level
/// disconnect from a user's logical departure.
///
/// Timers are plain `tokio::spawn` tasks rather than `JoinHandle`s kept around
/// for `abort()`: the registry's generation counter already has to be
/// consulted at fire time (a reconnect may have raced the timer), so a
/// cancellation handle would only save a wakeup, not the liveness check
/// itself.
pub struct PresenceController {
    registry: Arc<RoomRegistry>,
    grace_period: Duration,
}

impl PresenceController {
    pub fn new(registry: Arc<RoomRegistry>, grace_period: Duration) -> Self {
        Self {
            registry,
            grace_period,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Marks `user_id` present, cancelling any grace timer currently in
    /// flight for it (the generation bump makes the old timer's eventual
    /// fire-time check fail).
    pub async fn mark_present(&self, user_id: &str) {
        self.registry.mark_present(user_id).await;
    }

    /// Arms a grace timer for `user_id`. If no reconnect arrives before
    /// `grace_period` elapses, `on_expire` runs with the user id moved in.
    pub fn arm_grace_timer<F, Fut>(&self, user_id: UserId, on_expire: F)
    where
        F: FnOnce(UserId) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        let grace_period = self.grace_period;
        tokio::spawn(async move {
            let generation = registry.mark_grace(&user_id).await;
            tokio::time::sleep(grace_period).await;
            if registry.grace_expires(&user_id, generation).await {
                registry.mark_absent(&user_id).await;
                on_expire(user_id).await;
            }
        });
    }
}
