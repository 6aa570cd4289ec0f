use thiserror::Error;

/// Errors surfaced by the [`crate::registry::RoomRegistry`].
#[derive(Debug, Error)]
pub enum RoomRegistryError {
    #[error("room {0} does not exist")]
    RoomNotFound(String),
    #[error("user {0} is not a member of this room")]
    NotAMember(String),
    #[error("name {0:?} is already taken in this room")]
    NameTaken(String),
}

/// Errors surfaced by the [`crate::media`] Media Engine Facade.
#[derive(Debug, Error)]
pub enum MediaEngineError {
    #[error("no media room is open for {0}")]
    RoomNotOpen(String),
    #[error("transport {0} not found")]
    TransportNotFound(String),
    #[error("producer {0} not found")]
    ProducerNotFound(String),
    #[error("consumer {0} not found")]
    ConsumerNotFound(String),
    #[error("worker pool exhausted")]
    NoWorkerAvailable,
}

/// Errors surfaced while dispatching a client message, always reported back
/// to the originating connection as a `{type: "error", data: {message}}`
/// frame rather than propagated to the transport layer.
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error(transparent)]
    Registry(#[from] RoomRegistryError),
    #[error(transparent)]
    Media(#[from] MediaEngineError),
    #[error("{0}")]
    InvalidRequest(String),
}

impl SignalingError {
    /// The text sent to the client in a `{type: "error"}` frame. Never
    /// leaks internal detail beyond what the domain error already says.
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}
