//! Server behavior configuration types.

use super::defaults::{
    default_chat_history_limit, default_cors_origins, default_grace_period_secs,
    default_ping_timeout_secs,
};
use serde::{Deserialize, Serialize};

/// Server-facing knobs: how long a disconnected member is given to
/// reconnect, how the WebSocket endpoint is exposed, and how much chat
/// history is replayed to a joining member.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Grace period (seconds) a member has to reconnect before being marked
    /// permanently absent and cleaned up.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    /// Idle timeout (seconds) before a connection is considered dead absent
    /// a ping response.
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,
    /// Allowed CORS origins for the WebSocket and HTTP endpoints.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Number of past chat messages replayed to a member on join.
    #[serde(default = "default_chat_history_limit")]
    pub chat_history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            ping_timeout_secs: default_ping_timeout_secs(),
            cors_origins: default_cors_origins(),
            chat_history_limit: default_chat_history_limit(),
        }
    }
}
