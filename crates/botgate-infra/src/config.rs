//! Global configuration loader for Botgate.
//!
//! Reads `config.toml` from the data directory (`~/.botgate/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use botgate_types::config::{GlobalConfig, ListingConfig};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "BOTGATE_DATA_DIR";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
///   An unusable `[listing]` section is replaced by its defaults.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    let mut config = match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    if let Err(reason) = config.listing.check() {
        tracing::warn!(
            "Invalid [listing] in {}: {reason}, using listing defaults",
            config_path.display()
        );
        config.listing = ListingConfig::default();
    }

    config
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BOTGATE_DATA_DIR` environment variable
/// 2. `~/.botgate`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botgate");
    }

    // Last resort: current directory
    PathBuf::from(".botgate")
}

/// Storage call bound, with zero treated as the 3 second default.
pub fn storage_timeout(config: &GlobalConfig) -> Duration {
    match config.storage.timeout_ms {
        0 => Duration::from_secs(3),
        ms => Duration::from_millis(ms),
    }
}
