//! Media engine (SFU) configuration types.

use super::defaults::{
    default_max_workers, default_min_workers, default_scale_down_cpu, default_scale_up_cpu,
};
use serde::{Deserialize, Serialize};

/// Worker pool sizing and auto-scaling thresholds for the media engine.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MediaConfig {
    /// Worker pool floor; never scaled below this.
    #[serde(default = "default_min_workers")]
    pub min_workers: usize,
    /// Worker pool ceiling; never scaled above this.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Scale up when the busiest worker's CPU usage exceeds this fraction.
    #[serde(default = "default_scale_up_cpu")]
    pub scale_up_cpu: f64,
    /// Scale down when average worker CPU usage falls below this fraction.
    #[serde(default = "default_scale_down_cpu")]
    pub scale_down_cpu: f64,
    /// Public IP to announce for ICE candidates; unset lets the transport
    /// layer infer it.
    #[serde(default)]
    pub announced_ip: Option<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            min_workers: default_min_workers(),
            max_workers: default_max_workers(),
            scale_up_cpu: default_scale_up_cpu(),
            scale_down_cpu: default_scale_down_cpu(),
            announced_ip: None,
        }
    }
}
