use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Remote photo API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the wallpaper aggregation function.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Page size used when the caller does not ask for one.
    pub per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pixelwall-api.netlify.app/.netlify/functions/wallpapers".to_string(),
            timeout_secs: 10,
            per_page: 20,
        }
    }
}

/// Durable key-value storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the settings and favorites blobs.
    /// Defaults to `<data_dir>/storage` when unset.
    pub directory: Option<PathBuf>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_backfills_defaults() {
        let config: AppConfig = toml::from_str("[api]\nper_page = 30\n").unwrap();
        assert_eq!(config.api.per_page, 30);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.directory.is_none());
    }
}
