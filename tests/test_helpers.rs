use roomcast_server::config::{Config, StorageConfig, StorageKind};
use roomcast_server::protocol::{ConnectionId, ServerMessage};
use roomcast_server::server::RoomOrchestrator;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builds an orchestrator with the in-memory chat backend, so tests never
/// touch the filesystem.
#[allow(dead_code)]
pub async fn create_test_server() -> Arc<RoomOrchestrator> {
    let config = Config {
        storage: StorageConfig {
            kind: StorageKind::Memory,
            ..StorageConfig::default()
        },
        ..Config::default()
    };
    RoomOrchestrator::new(&config)
        .await
        .expect("failed to build test orchestrator")
}

/// Registers a fresh connection and returns its id plus the receiver end of
/// its outbound channel.
#[allow(dead_code)]
pub fn connect(server: &Arc<RoomOrchestrator>) -> (ConnectionId, mpsc::Receiver<Arc<ServerMessage>>) {
    let connection_id = ConnectionId::new_v4();
    let (tx, rx) = mpsc::channel(64);
    server.register_connection(connection_id, tx);
    (connection_id, rx)
}

/// Drains and discards any messages currently queued for a receiver.
#[allow(dead_code)]
pub fn drain(rx: &mut mpsc::Receiver<Arc<ServerMessage>>) {
    while rx.try_recv().is_ok() {}
}
