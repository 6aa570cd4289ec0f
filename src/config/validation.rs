//! Configuration validation functions.

use super::Config;

/// Sanity-check a loaded configuration. `load()` only warns on failure here;
/// callers that need a hard failure (the CLI's `--validate-config` path)
/// call this directly and propagate the error.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.server.grace_period_secs == 0 {
        anyhow::bail!("server.grace_period_secs must be greater than zero");
    }

    if config.media.min_workers == 0 {
        anyhow::bail!("media.min_workers must be greater than zero");
    }
    if config.media.max_workers < config.media.min_workers {
        anyhow::bail!("media.max_workers must be >= media.min_workers");
    }
    if !(0.0..=1.0).contains(&config.media.scale_up_cpu) {
        anyhow::bail!("media.scale_up_cpu must be between 0.0 and 1.0");
    }
    if !(0.0..=1.0).contains(&config.media.scale_down_cpu) {
        anyhow::bail!("media.scale_down_cpu must be between 0.0 and 1.0");
    }
    if config.media.scale_down_cpu >= config.media.scale_up_cpu {
        anyhow::bail!("media.scale_down_cpu must be less than media.scale_up_cpu");
    }

    for origin in &config.server.cors_origins {
        if url::Url::parse(origin).is_err() {
            anyhow::bail!("server.cors_origins entry {origin:?} is not a valid URL");
        }
    }

    if config.storage.kind == super::storage::StorageKind::Json && config.storage.path.trim().is_empty() {
        anyhow::bail!("storage.path must not be empty when storage.kind is \"json\"");
    }

    Ok(())
}
