//! Default value functions for configuration fields, used by serde's
//! `#[serde(default = "...")]` attributes.

use super::logging::LogFormat;

pub const fn default_port() -> u16 {
    3536
}

pub fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

pub const fn default_grace_period_secs() -> u64 {
    7
}

pub const fn default_ping_timeout_secs() -> u64 {
    30
}

pub const fn default_chat_history_limit() -> usize {
    50
}

/// Worker pool ceiling: the host's logical CPU count, or `1` if it cannot
/// be determined.
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Worker pool floor: `min(2, max_workers)`, so a single-core host still
/// gets a pool of 1 rather than an unreachable floor of 2.
pub fn default_min_workers() -> usize {
    default_max_workers().min(2)
}

pub const fn default_scale_up_cpu() -> f64 {
    0.75
}

pub const fn default_scale_down_cpu() -> f64 {
    0.30
}

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    true
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

pub fn default_storage_path() -> String {
    "data/chat-history.json".to_string()
}
