use std::path::PathBuf;

use crate::domain::{AppConfig, DomainError};

/// Where the app keeps its configuration file and well-known directories.
pub trait ConfigStore: Send + Sync {
    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable as TOML.
    fn load(&self) -> Result<AppConfig, DomainError>;

    /// Save configuration to persistent storage.
    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    /// Get the path to the configuration file.
    fn config_path(&self) -> PathBuf;

    /// Get the path to the application data directory.
    fn data_dir(&self) -> PathBuf;

    /// Get the path to the logs directory.
    fn logs_dir(&self) -> PathBuf;

    /// Get the directory for downloaded wallpapers.
    fn downloads_dir(&self) -> PathBuf;
}
