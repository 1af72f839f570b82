use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::DomainError;
use crate::ports::KeyValueStore;

/// One-file-per-key store under a directory.
///
/// Writes land in a uniquely named temp file which is then renamed over the
/// target, so a reader never sees a half-written value.
pub struct FileKeyValueStore {
    dir: PathBuf,
    temp_counter: AtomicU64,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        info!(dir = ?dir, "Key-value store initialized");

        Ok(Self {
            dir,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a storage key onto a safe file name.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(key = key, bytes = content.len(), "Read key");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Storage(format!("read {}: {}", key, e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.path_for(key);
        let seq = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.tmp", seq));

        if let Err(e) = tokio::fs::write(&temp_path, value).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(DomainError::Storage(format!("write {}: {}", key, e)));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(DomainError::Storage(format!("commit {}: {}", key, e)));
        }

        debug!(key = key, bytes = value.len(), "Wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("remove {}: {}", key, e))),
        }
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, as if written by an earlier run.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.write().insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = env::temp_dir().join("pixelwall_kv_roundtrip_test");
        let _ = std::fs::remove_dir_all(&dir);
        let store = FileKeyValueStore::new(&dir).unwrap();

        assert_eq!(store.get("@pixelwall_settings").await.unwrap(), None);

        store.set("@pixelwall_settings", r#"{"themeMode":"dark"}"#).await.unwrap();
        assert_eq!(
            store.get("@pixelwall_settings").await.unwrap().as_deref(),
            Some(r#"{"themeMode":"dark"}"#)
        );

        store.set("@pixelwall_settings", "{}").await.unwrap();
        assert_eq!(store.get("@pixelwall_settings").await.unwrap().as_deref(), Some("{}"));

        store.remove("@pixelwall_settings").await.unwrap();
        store.remove("@pixelwall_settings").await.unwrap();
        assert_eq!(store.get("@pixelwall_settings").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_file_store_leaves_no_temp_files() {
        let dir = env::temp_dir().join("pixelwall_kv_temp_test");
        let _ = std::fs::remove_dir_all(&dir);
        let store = FileKeyValueStore::new(&dir).unwrap();

        for i in 0..5 {
            store.set("@pixelwall_favorites", &i.to_string()).await.unwrap();
        }

        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["_pixelwall_favorites.json".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryKeyValueStore::new().with_entry("a", "1");
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
