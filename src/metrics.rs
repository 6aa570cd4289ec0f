use hdrhistogram::Histogram;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Counters and a latency histogram for the orchestrator, exported via
/// `/metrics` (JSON) and `/metrics/prom` (Prometheus text).
#[derive(Debug)]
pub struct ServerMetrics {
    pub total_connections: AtomicU64,
    pub active_connections: AtomicU64,
    pub disconnections: AtomicU64,

    pub rooms_created: AtomicU64,
    pub rooms_deleted: AtomicU64,
    pub members_joined: AtomicU64,
    pub members_left: AtomicU64,
    pub name_conflicts_rejected: AtomicU64,

    pub grace_timers_armed: AtomicU64,
    pub grace_timers_expired: AtomicU64,

    pub chat_messages_sent: AtomicU64,
    pub chat_persistence_failures: AtomicU64,
    pub reactions_toggled: AtomicU64,

    pub media_routers_created: AtomicU64,
    pub media_routers_closed: AtomicU64,
    pub producers_created: AtomicU64,
    pub producers_closed: AtomicU64,
    pub worker_pool_size: AtomicU64,
    pub autoscale_events: AtomicU64,

    dispatch_latency: RwLock<Histogram<u64>>,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            disconnections: AtomicU64::new(0),
            rooms_created: AtomicU64::new(0),
            rooms_deleted: AtomicU64::new(0),
            members_joined: AtomicU64::new(0),
            members_left: AtomicU64::new(0),
            name_conflicts_rejected: AtomicU64::new(0),
            grace_timers_armed: AtomicU64::new(0),
            grace_timers_expired: AtomicU64::new(0),
            chat_messages_sent: AtomicU64::new(0),
            chat_persistence_failures: AtomicU64::new(0),
            reactions_toggled: AtomicU64::new(0),
            media_routers_created: AtomicU64::new(0),
            media_routers_closed: AtomicU64::new(0),
            producers_created: AtomicU64::new(0),
            producers_closed: AtomicU64::new(0),
            worker_pool_size: AtomicU64::new(0),
            autoscale_events: AtomicU64::new(0),
            // 1us..60s range, 2 significant figures; matches the scale of a
            // single dispatch handler call.
            dispatch_latency: RwLock::new(
                Histogram::new_with_bounds(1, 60_000_000, 2).expect("valid histogram bounds"),
            ),
        }
    }

    pub fn increment_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_sub(1)
            });
        self.disconnections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_deleted(&self) {
        self.rooms_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_members_joined(&self) {
        self.members_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_members_left(&self) {
        self.members_left.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_name_conflicts_rejected(&self) {
        self.name_conflicts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_grace_timers_armed(&self) {
        self.grace_timers_armed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_grace_timers_expired(&self) {
        self.grace_timers_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_chat_messages_sent(&self) {
        self.chat_messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_chat_persistence_failures(&self) {
        self.chat_persistence_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reactions_toggled(&self) {
        self.reactions_toggled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_media_routers_created(&self) {
        self.media_routers_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_media_routers_closed(&self) {
        self.media_routers_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_producers_created(&self) {
        self.producers_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_producers_closed(&self) {
        self.producers_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_worker_pool_size(&self, size: usize) {
        self.worker_pool_size.store(size as u64, Ordering::Relaxed);
    }

    pub fn increment_autoscale_events(&self) {
        self.autoscale_events.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn record_dispatch_latency(&self, elapsed: Duration) {
        let micros = elapsed.as_micros().min(u128::from(u64::MAX)) as u64;
        let mut hist = self.dispatch_latency.write().await;
        let _ = hist.record(micros.max(1));
    }

    pub async fn dispatch_latency_snapshot(&self) -> LatencySnapshot {
        let hist = self.dispatch_latency.read().await;
        LatencySnapshot {
            count: hist.len(),
            p50_micros: hist.value_at_quantile(0.5),
            p95_micros: hist.value_at_quantile(0.95),
            p99_micros: hist.value_at_quantile(0.99),
            max_micros: hist.max(),
        }
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            disconnections: self.disconnections.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_deleted: self.rooms_deleted.load(Ordering::Relaxed),
            members_joined: self.members_joined.load(Ordering::Relaxed),
            members_left: self.members_left.load(Ordering::Relaxed),
            name_conflicts_rejected: self.name_conflicts_rejected.load(Ordering::Relaxed),
            grace_timers_armed: self.grace_timers_armed.load(Ordering::Relaxed),
            grace_timers_expired: self.grace_timers_expired.load(Ordering::Relaxed),
            chat_messages_sent: self.chat_messages_sent.load(Ordering::Relaxed),
            chat_persistence_failures: self.chat_persistence_failures.load(Ordering::Relaxed),
            reactions_toggled: self.reactions_toggled.load(Ordering::Relaxed),
            media_routers_created: self.media_routers_created.load(Ordering::Relaxed),
            media_routers_closed: self.media_routers_closed.load(Ordering::Relaxed),
            producers_created: self.producers_created.load(Ordering::Relaxed),
            producers_closed: self.producers_closed.load(Ordering::Relaxed),
            worker_pool_size: self.worker_pool_size.load(Ordering::Relaxed),
            autoscale_events: self.autoscale_events.load(Ordering::Relaxed),
            dispatch_latency: self.dispatch_latency_snapshot().await,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LatencySnapshot {
    pub count: u64,
    pub p50_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_connections: u64,
    pub active_connections: u64,
    pub disconnections: u64,
    pub rooms_created: u64,
    pub rooms_deleted: u64,
    pub members_joined: u64,
    pub members_left: u64,
    pub name_conflicts_rejected: u64,
    pub grace_timers_armed: u64,
    pub grace_timers_expired: u64,
    pub chat_messages_sent: u64,
    pub chat_persistence_failures: u64,
    pub reactions_toggled: u64,
    pub media_routers_created: u64,
    pub media_routers_closed: u64,
    pub producers_created: u64,
    pub producers_closed: u64,
    pub worker_pool_size: u64,
    pub autoscale_events: u64,
    pub dispatch_latency: LatencySnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn decrement_active_connections_does_not_underflow() {
        let metrics = ServerMetrics::new();
        for _ in 0..10 {
            metrics.decrement_active_connections();
        }
        assert_eq!(metrics.active_connections.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.disconnections.load(Ordering::Relaxed), 10);
    }

    #[tokio::test]
    async fn concurrent_increment_decrement_settles_correctly() {
        let metrics = Arc::new(ServerMetrics::new());
        let barrier = Arc::new(tokio::sync::Barrier::new(100));
        let mut handles = Vec::with_capacity(100);
        for _ in 0..100 {
            let metrics = Arc::clone(&metrics);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                metrics.increment_connections();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(metrics.active_connections.load(Ordering::Relaxed), 100);
        assert_eq!(metrics.total_connections.load(Ordering::Relaxed), 100);
    }

    #[tokio::test]
    async fn dispatch_latency_snapshot_reflects_recorded_samples() {
        let metrics = ServerMetrics::new();
        metrics
            .record_dispatch_latency(Duration::from_micros(500))
            .await;
        metrics
            .record_dispatch_latency(Duration::from_micros(1500))
            .await;
        let snapshot = metrics.dispatch_latency_snapshot().await;
        assert_eq!(snapshot.count, 2);
        assert!(snapshot.max_micros >= 1500);
    }
}
