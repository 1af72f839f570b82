use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

const APP_DIR_NAME: &str = "PixelWall";
const CONFIG_FILE: &str = "config.toml";
const DOWNLOADS_DIR_NAME: &str = "Pixel Wall";

/// Directories the app reads from and writes to.
#[derive(Debug, Clone)]
struct AppDirs {
    data: PathBuf,
    logs: PathBuf,
    downloads: PathBuf,
}

impl AppDirs {
    /// Platform locations:
    /// - data: `~/Library/Application Support/PixelWall` (macOS),
    ///   `%APPDATA%\PixelWall` (Windows), `~/.config/PixelWall` (Linux)
    /// - logs: `<data>/logs` on macOS, the local data dir elsewhere
    /// - downloads: `<Pictures>/Pixel Wall`
    fn resolve() -> Result<Self, DomainError> {
        #[cfg(target_os = "macos")]
        let base = dirs::data_dir();
        #[cfg(not(target_os = "macos"))]
        let base = dirs::config_dir();

        let data = base.map(|p| p.join(APP_DIR_NAME)).ok_or_else(|| {
            DomainError::Config("Could not find application data directory".to_string())
        })?;

        #[cfg(target_os = "macos")]
        let logs = data.join("logs");
        #[cfg(not(target_os = "macos"))]
        let logs = dirs::data_local_dir()
            .map(|p| p.join(APP_DIR_NAME).join("logs"))
            .unwrap_or_else(|| data.join("logs"));

        let downloads = dirs::picture_dir()
            .map(|p| p.join(DOWNLOADS_DIR_NAME))
            .unwrap_or_else(|| data.join("downloads"));

        Ok(Self {
            data,
            logs,
            downloads,
        })
    }

    /// Everything under one root, used for portable installs and tests.
    fn rooted(root: PathBuf) -> Self {
        Self {
            logs: root.join("logs"),
            downloads: root.join("downloads"),
            data: root,
        }
    }
}

/// TOML configuration file plus the app's well-known directories.
pub struct TomlConfigStore {
    dirs: AppDirs,
}

impl TomlConfigStore {
    /// Use the OS-specific application directories.
    pub fn new() -> Result<Self, DomainError> {
        Self::open(AppDirs::resolve()?)
    }

    /// Keep config, logs and downloads under `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, DomainError> {
        Self::open(AppDirs::rooted(data_dir))
    }

    fn open(dirs: AppDirs) -> Result<Self, DomainError> {
        fs::create_dir_all(&dirs.data)?;
        info!(data_dir = ?dirs.data, "ConfigStore initialized");
        Ok(Self { dirs })
    }
}

impl ConfigStore for TomlConfigStore {
    /// A missing file is created with defaults. A file that no longer parses
    /// is left alone for the user to fix and defaults are used for this run.
    fn load(&self) -> Result<AppConfig, DomainError> {
        let path = self.config_path();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?path, "No configuration file, writing defaults");
                let config = AppConfig::new();
                self.save(&config)?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = ?path, "Configuration loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Configuration file is invalid, using defaults");
                Ok(AppConfig::new())
            }
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let path = self.config_path();
        write_atomic(&path, &toml::to_string_pretty(config)?)?;

        info!(path = ?path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.dirs.data.join(CONFIG_FILE)
    }

    fn data_dir(&self) -> PathBuf {
        self.dirs.data.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.dirs.logs.clone()
    }

    fn downloads_dir(&self) -> PathBuf {
        self.dirs.downloads.clone()
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), DomainError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("toml.tmp");
    fs::write(&temp, content)?;
    fs::rename(&temp, path)?;
    Ok(())
}
