pub mod pool;
pub mod router;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::error::MediaEngineError;
use crate::protocol::{OpaquePayload, RoomId, TransportDirection};
use pool::{CpuSampler, PoolConfig, SysinfoCpuSampler, WorkerPool};
use router::RouterBundle;

pub use router::{Consumer, Producer, Transport};

/// Result shape for `createWebRtcTransport`, matching the wire event's data.
pub struct TransportParams {
    pub id: String,
    pub ice_parameters: OpaquePayload,
    pub ice_candidates: OpaquePayload,
    pub dtls_parameters: OpaquePayload,
}

/// Result shape for `consume`.
pub struct ConsumerParams {
    pub id: String,
    pub producer_id: String,
    pub kind: String,
    pub rtp_parameters: OpaquePayload,
}

/// Encapsulates the SFU runtime: a worker pool and a `roomId → router`
/// map. Every operation is idempotent on a missing room, returning `None`
/// rather than an error, matching the facade's "never raise" contract.
pub struct MediaEngine {
    pool: Arc<WorkerPool>,
    routers: DashMap<RoomId, RouterBundle>,
    announced_ip: Option<String>,
}

impl MediaEngine {
    pub async fn startup(config: PoolConfig, announced_ip: Option<String>) -> Self {
        let sampler: Arc<dyn CpuSampler> = Arc::new(SysinfoCpuSampler::new());
        let pool = Arc::new(WorkerPool::startup(config, sampler).await);
        Self {
            pool,
            routers: DashMap::new(),
            announced_ip,
        }
    }

    #[cfg(test)]
    pub async fn startup_with_sampler(config: PoolConfig, sampler: Arc<dyn CpuSampler>) -> Self {
        let pool = Arc::new(WorkerPool::startup(config, sampler).await);
        Self {
            pool,
            routers: DashMap::new(),
            announced_ip: None,
        }
    }

    pub fn active_rooms(&self) -> usize {
        self.routers.len()
    }

    /// Returns the existing router bundle for `room_id`, or creates one on
    /// a round-robin worker and triggers an auto-scale pass.
    pub async fn create_router(&self, room_id: &RoomId) -> Result<(), MediaEngineError> {
        if self.routers.contains_key(room_id) {
            return Ok(());
        }
        let worker_id = self
            .pool
            .next_worker()
            .await
            .ok_or(MediaEngineError::NoWorkerAvailable)?;
        self.routers
            .insert(room_id.clone(), RouterBundle::new(worker_id));
        info!(%room_id, worker_id, "media router created");
        self.pool.autoscale(self.active_rooms()).await;
        Ok(())
    }

    pub fn router_rtp_capabilities(&self, room_id: &RoomId) -> Option<OpaquePayload> {
        self.routers.get(room_id).map(|r| r.rtp_capabilities.clone())
    }

    /// `transport_id` is caller-supplied (`"{connectionId}-{direction}"`),
    /// so `cleanup_user_media`'s prefix match can find it later.
    pub fn create_webrtc_transport(
        &self,
        room_id: &RoomId,
        transport_id: String,
        direction: TransportDirection,
    ) -> Option<TransportParams> {
        let mut bundle = self.routers.get_mut(room_id)?;
        let transport = bundle.create_transport(transport_id, direction);
        Some(TransportParams {
            id: transport.id,
            ice_parameters: serde_json::json!({ "usernameFragment": uuid::Uuid::new_v4().to_string() }),
            ice_candidates: serde_json::json!([]),
            dtls_parameters: serde_json::json!({
                "fingerprints": [],
                "announcedIp": self.announced_ip,
            }),
        })
    }

    pub fn connect_transport(&self, room_id: &RoomId, transport_id: &str) -> bool {
        self.routers
            .get_mut(room_id)
            .is_some_and(|mut b| b.connect_transport(transport_id))
    }

    pub fn produce(&self, room_id: &RoomId, transport_id: &str, kind: &str) -> Option<Producer> {
        self.routers.get_mut(room_id)?.produce(transport_id, kind)
    }

    pub fn consume(
        &self,
        room_id: &RoomId,
        transport_id: &str,
        producer_id: &str,
    ) -> Option<ConsumerParams> {
        let consumer = self
            .routers
            .get_mut(room_id)?
            .consume(transport_id, producer_id)?;
        Some(ConsumerParams {
            id: consumer.id,
            producer_id: consumer.producer_id,
            kind: consumer.kind,
            rtp_parameters: serde_json::json!({}),
        })
    }

    pub fn resume_consumer(&self, room_id: &RoomId, consumer_id: &str) -> bool {
        self.routers
            .get_mut(room_id)
            .is_some_and(|mut b| b.resume_consumer(consumer_id))
    }

    pub fn producers(&self, room_id: &RoomId) -> Vec<String> {
        self.routers
            .get(room_id)
            .map(|b| b.producer_ids())
            .unwrap_or_default()
    }

    pub fn close_producer(&self, room_id: &RoomId, producer_id: &str) -> bool {
        self.routers
            .get_mut(room_id)
            .is_some_and(|mut b| b.close_producer(producer_id))
    }

    pub fn close_transport(&self, room_id: &RoomId, transport_id: &str) -> bool {
        self.routers
            .get_mut(room_id)
            .is_some_and(|mut b| b.close_transport(transport_id))
    }

    pub fn cleanup_user_media(&self, room_id: &RoomId, connection_id_prefix: &str) -> Vec<String> {
        self.routers
            .get_mut(room_id)
            .map(|mut b| b.cleanup_connection(connection_id_prefix))
            .unwrap_or_default()
    }

    /// Closes and removes the room's router bundle entirely, then triggers
    /// an auto-scale pass (a room closing may free capacity to scale down).
    pub async fn close_room(&self, room_id: &RoomId) {
        self.routers.remove(room_id);
        self.pool.autoscale(self.active_rooms()).await;
    }
}
