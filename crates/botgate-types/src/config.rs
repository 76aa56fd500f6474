//! Global configuration types for Botgate.
//!
//! `GlobalConfig` represents the top-level `config.toml`. Every section and
//! field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Botgate service.
///
/// Loaded from `~/.botgate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// Upper bound for any single repository call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_database_file() -> String {
    "botgate.db".to_string()
}

fn default_timeout_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Largest `max_page_size` accepted from configuration.
pub const PAGE_SIZE_CEILING: i64 = 10_000;

impl ListingConfig {
    /// Reject page-size settings the query planner cannot honor.
    pub fn check(&self) -> Result<(), String> {
        if !(1..=PAGE_SIZE_CEILING).contains(&self.max_page_size) {
            return Err(format!(
                "max_page_size must be between 1 and {PAGE_SIZE_CEILING}, got {}",
                self.max_page_size
            ));
        }
        if !(1..=self.max_page_size).contains(&self.default_page_size) {
            return Err(format!(
                "default_page_size must be between 1 and max_page_size ({}), got {}",
                self.max_page_size, self.default_page_size
            ));
        }
        Ok(())
    }
}

fn default_page_size() -> i64 {
    20
}

fn default_max_page_size() -> i64 {
    100
}

/// How a confirmation response body is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationRule {
    /// Confirmed when any top-level boolean field is `true`.
    #[default]
    AnyTrueField,
    /// Confirmed only when the top-level `ok` field is `true`.
    OkField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Base URL of the bot platform API; requests go to `{base_url}/bot{credential}/getMe`.
    #[serde(default = "default_confirmation_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub rule: ConfirmationRule,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            base_url: default_confirmation_url(),
            timeout_ms: default_timeout_ms(),
            rule: ConfirmationRule::default(),
        }
    }
}

fn default_confirmation_url() -> String {
    "https://api.telegram.org".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Report another caller's bot as "not found" instead of "forbidden".
    #[serde(default)]
    pub conceal_foreign_bots: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.storage.timeout_ms, 3_000);
        assert_eq!(config.listing.default_page_size, 20);
        assert_eq!(config.listing.max_page_size, 100);
        assert_eq!(config.confirmation.rule, ConfirmationRule::AnyTrueField);
        assert!(!config.access.conceal_foreign_bots);
    }

    #[test]
    fn test_listing_check() {
        assert!(ListingConfig::default().check().is_ok());

        let listing = |default_page_size, max_page_size| ListingConfig {
            default_page_size,
            max_page_size,
        };
        assert!(listing(20, 0).check().is_err());
        assert!(listing(20, -5).check().is_err());
        assert!(listing(20, i64::MAX / 2).check().is_err());
        assert!(listing(50, 10).check().is_err());
        assert!(listing(0, 10).check().is_err());
        assert!(listing(10, PAGE_SIZE_CEILING).check().is_ok());
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 4080);
        assert_eq!(config.confirmation.base_url, "https://api.telegram.org");
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 9000

[confirmation]
rule = "ok_field"
timeout_ms = 1500

[access]
conceal_foreign_bots = true
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.confirmation.rule, ConfirmationRule::OkField);
        assert_eq!(config.confirmation.timeout_ms, 1500);
        assert!(config.access.conceal_foreign_bots);
    }
}
