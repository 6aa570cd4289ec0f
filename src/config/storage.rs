//! Chat storage backend configuration.

use super::defaults::default_storage_path;
use serde::{Deserialize, Serialize};

/// Which [`crate::storage::ChatStorage`] implementation to construct at
/// startup.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Accepted for forward compatibility; no Firebase client exists in this
    /// deployment, so this resolves to the [`StorageKind::Json`] backend.
    Firebase,
    #[default]
    Json,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    /// File path used by the `json` backend.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            path: default_storage_path(),
        }
    }
}
