//! Configuration management.
//!
//! This module provides configuration loading with support for:
//! - JSON configuration files
//! - Environment variable overrides
//! - Stdin input
//! - Sensible defaults
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`server`]: Reconnection grace period, CORS, chat history depth
//! - [`media`]: Media engine worker pool sizing and auto-scale thresholds
//! - [`storage`]: Chat storage backend selection
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod media;
pub mod server;
pub mod storage;
pub mod types;
pub mod validation;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use media::MediaConfig;
pub use server::ServerConfig;
pub use storage::{StorageConfig, StorageKind};
pub use types::Config;
pub use validation::validate_config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 3536);
        assert_eq!(config.server.grace_period_secs, 7);
        assert_eq!(config.server.ping_timeout_secs, 30);
        assert!(config.media.max_workers >= 1);
        assert_eq!(config.media.min_workers, config.media.max_workers.min(2));
        assert_eq!(config.storage.kind, StorageKind::Json);
        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "server.log");
        assert_eq!(config.logging.rotation, "daily");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(
            config.server.grace_period_secs,
            deserialized.server.grace_period_secs
        );
        assert_eq!(config.media.max_workers, deserialized.media.max_workers);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_storage_kind_defaults_to_json() {
        assert_eq!(StorageConfig::default().kind, StorageKind::Json);
    }
}
