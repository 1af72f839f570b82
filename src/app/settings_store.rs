use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::app::{EventBus, PersistWriter};
use crate::domain::{
    resolve_theme, AppEvent, Polarity, SettingsEnvelope, SettingsRecord, ThemeDefinition,
    ThemeMode, SETTINGS_KEY,
};
use crate::ports::KeyValueStore;

/// Single source of truth for theme mode and user preferences.
///
/// Reads are synchronous; every mutation updates memory first and then
/// queues a write of the whole envelope.
pub struct SettingsStore {
    state: RwLock<SettingsEnvelope>,
    writer: PersistWriter,
    events: EventBus,
}

impl SettingsStore {
    /// Create a store holding defaults. Call [`load`](Self::load) once at boot.
    pub fn new(storage: Arc<dyn KeyValueStore>, events: EventBus) -> Self {
        Self {
            state: RwLock::new(SettingsEnvelope::default()),
            writer: PersistWriter::spawn(storage, SETTINGS_KEY),
            events,
        }
    }

    /// Load the envelope from storage.
    ///
    /// Absent, unreadable, or malformed data leaves defaults in place and
    /// writes nothing.
    pub async fn load(&self) {
        let envelope = match self.writer.read().await {
            Ok(Some(raw)) => match SettingsEnvelope::from_json(&raw) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(error = %e, "Stored settings are malformed, using defaults");
                    SettingsEnvelope::default()
                }
            },
            Ok(None) => {
                debug!("No stored settings, using defaults");
                SettingsEnvelope::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                SettingsEnvelope::default()
            }
        };

        info!(
            theme_mode = envelope.theme_mode.as_str(),
            quality = envelope.settings.wallpaper_quality.as_str(),
            long_press_download = envelope.settings.long_press_download,
            "Settings loaded"
        );
        *self.state.write() = envelope;
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.state.read().theme_mode
    }

    pub fn settings(&self) -> SettingsRecord {
        self.state.read().settings.clone()
    }

    pub fn envelope(&self) -> SettingsEnvelope {
        self.state.read().clone()
    }

    /// Resolve the current mode against the host's colour scheme.
    pub fn resolved_theme(&self, host: Option<Polarity>) -> &'static ThemeDefinition {
        resolve_theme(self.theme_mode(), host)
    }

    /// Change the theme mode. Memory is updated before this returns; the
    /// durable write happens in the background.
    pub fn set_theme_mode(&self, mode: ThemeMode) {
        let snapshot = {
            let mut state = self.state.write();
            state.theme_mode = mode;
            state.to_json()
        };
        self.persist(snapshot);

        info!(mode = mode.as_str(), "Theme mode changed");
        self.events.publish(AppEvent::ThemeModeChanged { mode });
    }

    /// Replace the whole settings record.
    pub fn save_settings(&self, record: SettingsRecord) {
        let snapshot = {
            let mut state = self.state.write();
            state.settings = record;
            state.to_json()
        };
        self.persist(snapshot);

        debug!("Settings saved");
        self.events.publish(AppEvent::SettingsChanged);
    }

    fn persist(&self, snapshot: Result<String, crate::domain::DomainError>) {
        match snapshot {
            Ok(json) => self.writer.persist(json),
            Err(e) => error!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Wait for queued writes to settle.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use crate::app::persist::test_support::FlakyStore;
    use crate::domain::{WallpaperQuality, DARK_THEME, LIGHT_THEME};

    async fn loaded(storage: Arc<dyn KeyValueStore>) -> SettingsStore {
        let store = SettingsStore::new(storage, EventBus::new());
        store.load().await;
        store
    }

    #[tokio::test]
    async fn test_load_empty_storage_yields_defaults() {
        let storage = Arc::new(FlakyStore::default());
        let store = loaded(storage.clone()).await;

        assert_eq!(store.theme_mode(), ThemeMode::System);
        assert_eq!(
            store.settings(),
            SettingsRecord {
                wallpaper_quality: WallpaperQuality::Original,
                long_press_download: true,
            }
        );

        store.flush().await;
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_theme_mode_only_envelope() {
        let storage = Arc::new(
            MemoryKeyValueStore::new().with_entry(SETTINGS_KEY, r#"{"themeMode":"dark"}"#),
        );
        let store = loaded(storage).await;

        assert_eq!(store.theme_mode(), ThemeMode::Dark);
        assert_eq!(store.settings(), SettingsRecord::default());
    }

    #[tokio::test]
    async fn test_load_malformed_or_failing_storage() {
        let storage =
            Arc::new(MemoryKeyValueStore::new().with_entry(SETTINGS_KEY, "{\"settings\":"));
        let store = loaded(storage).await;
        assert_eq!(store.envelope(), SettingsEnvelope::default());

        let failing = Arc::new(FlakyStore::default());
        failing.fail_reads.store(true, Ordering::SeqCst);
        let store = loaded(failing).await;
        assert_eq!(store.envelope(), SettingsEnvelope::default());
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let storage = Arc::new(
            MemoryKeyValueStore::new()
                .with_entry(SETTINGS_KEY, r#"{"settings":{"wallpaperQuality":"low"},"themeMode":"light"}"#),
        );
        let store = loaded(storage).await;
        let first = store.envelope();
        store.load().await;
        assert_eq!(store.envelope(), first);
        assert_eq!(first.settings.wallpaper_quality, WallpaperQuality::Low);
    }

    #[tokio::test]
    async fn test_rapid_theme_changes_settle_on_last() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let store = loaded(storage.clone()).await;

        store.set_theme_mode(ThemeMode::Dark);
        store.set_theme_mode(ThemeMode::Light);
        assert_eq!(store.theme_mode(), ThemeMode::Light);

        store.flush().await;
        let persisted = storage.get(SETTINGS_KEY).await.unwrap().unwrap();
        let envelope = SettingsEnvelope::from_json(&persisted).unwrap();
        assert_eq!(envelope.theme_mode, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_save_settings_roundtrip_across_restart() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let record = SettingsRecord {
            wallpaper_quality: WallpaperQuality::Medium,
            long_press_download: false,
        };

        let store = loaded(storage.clone()).await;
        store.set_theme_mode(ThemeMode::Dark);
        store.save_settings(record.clone());
        store.flush().await;

        let restarted = loaded(storage).await;
        assert_eq!(restarted.settings(), record);
        assert_eq!(restarted.theme_mode(), ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let storage = Arc::new(FlakyStore::default());
        storage.fail_writes.store(true, Ordering::SeqCst);
        let store = loaded(storage.clone()).await;

        store.set_theme_mode(ThemeMode::Dark);
        store.flush().await;

        assert_eq!(store.theme_mode(), ThemeMode::Dark);
        assert_eq!(storage.inner.get(SETTINGS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolved_theme() {
        let store = loaded(Arc::new(MemoryKeyValueStore::new())).await;
        assert_eq!(store.resolved_theme(Some(Polarity::Dark)), &DARK_THEME);

        store.set_theme_mode(ThemeMode::Light);
        assert_eq!(store.resolved_theme(Some(Polarity::Dark)), &LIGHT_THEME);
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let store = SettingsStore::new(Arc::new(MemoryKeyValueStore::new()), events);

        store.set_theme_mode(ThemeMode::Dark);
        store.save_settings(SettingsRecord::default());

        assert!(matches!(
            rx.recv().await.unwrap(),
            AppEvent::ThemeModeChanged { mode: ThemeMode::Dark }
        ));
        assert!(matches!(rx.recv().await.unwrap(), AppEvent::SettingsChanged));
    }
}
