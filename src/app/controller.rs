use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    FileKeyValueStore, MemoryKeyValueStore, ReqwestHttpClient, TomlConfigStore,
};
use crate::app::{
    AnimationDriver, EventBus, FavoritesStore, FeedQuery, PhotoApi, SettingsStore,
    ThemeController,
};
use crate::domain::{
    select_image_url, AppConfig, AppEvent, DomainError, ImageRequest, Photo, Polarity,
};
use crate::infrastructure::init_logging;
use crate::ports::{ConfigStore, HttpClient, KeyValueStore};

/// External collaborators the controller is assembled from.
pub struct AppParts {
    pub config: AppConfig,
    pub config_store: Arc<dyn ConfigStore>,
    pub storage: Arc<dyn KeyValueStore>,
    pub http: Arc<dyn HttpClient>,
    pub host_scheme: Option<Polarity>,
    pub driver: AnimationDriver,
}

/// Application controller that owns one shared instance of every component
/// and hands explicit references to whoever needs them.
pub struct AppController {
    config: RwLock<AppConfig>,
    config_store: Arc<dyn ConfigStore>,
    settings: Arc<SettingsStore>,
    favorites: Arc<FavoritesStore>,
    theme: ThemeController,
    photos: PhotoApi,
    feed: RwLock<FeedQuery>,
    events: EventBus,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Boot with OS paths, file-backed storage, and the real HTTP client.
    pub async fn boot(host_scheme: Option<Polarity>) -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration
        let config = config_store.load()?;

        // Step 3: Initialize logging
        let log_guard = init_logging(&config_store.logs_dir(), &config.logging)?;

        info!("PixelWall starting up");

        // Step 4: Storage and network adapters
        let storage_dir = config
            .storage
            .directory
            .clone()
            .unwrap_or_else(|| config_store.data_dir().join("storage"));
        let storage: Arc<dyn KeyValueStore> = match FileKeyValueStore::new(&storage_dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(dir = ?storage_dir, error = %e, "Storage unavailable, changes will not persist");
                Arc::new(MemoryKeyValueStore::new())
            }
        };
        let http = Arc::new(ReqwestHttpClient::new(Duration::from_secs(
            config.api.timeout_secs,
        ))?);

        let mut controller = Self::assemble(AppParts {
            config,
            config_store,
            storage,
            http,
            host_scheme,
            driver: AnimationDriver::default(),
        })
        .await;
        controller._log_guard = log_guard;
        Ok(controller)
    }

    /// Build the controller from explicit parts and load both stores.
    pub async fn assemble(parts: AppParts) -> Self {
        let events = EventBus::new();

        let settings = Arc::new(SettingsStore::new(
            Arc::clone(&parts.storage),
            events.clone(),
        ));
        let favorites = Arc::new(FavoritesStore::new(
            Arc::clone(&parts.storage),
            events.clone(),
        ));

        // Both stores load in parallel; neither can fail
        tokio::join!(settings.load(), favorites.load());

        let theme = ThemeController::new(
            Arc::clone(&settings),
            parts.host_scheme,
            events.clone(),
            parts.driver,
        );
        let photos = PhotoApi::new(parts.http, &parts.config.api);

        info!(
            favorites = favorites.len(),
            theme = theme.active_theme().name,
            "AppController initialized"
        );

        Self {
            config: RwLock::new(parts.config),
            config_store: parts.config_store,
            settings,
            favorites,
            theme,
            photos,
            feed: RwLock::new(FeedQuery::random_category()),
            events,
            _log_guard: None,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Update the configuration. Takes effect for API paging on next boot.
    pub fn update_config(&self, config: AppConfig) -> Result<(), DomainError> {
        self.config_store.save(&config)?;
        *self.config.write() = config;

        info!("Configuration updated");
        Ok(())
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn photos(&self) -> &PhotoApi {
        &self.photos
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// URL to render `photo` with, honouring the quality preference.
    pub fn image_url(&self, photo: &Photo, request: ImageRequest) -> Option<String> {
        let quality = self.settings.settings().wallpaper_quality;
        select_image_url(&photo.urls(), quality, request).map(str::to_string)
    }

    /// Whether grid cards should arm the long-press download gesture.
    pub fn long_press_enabled(&self) -> bool {
        self.settings.settings().long_press_download
    }

    /// The feed the home screen is showing.
    pub fn feed_query(&self) -> FeedQuery {
        self.feed.read().clone()
    }

    /// Switch the home feed to a user search. Blank queries are ignored.
    pub fn start_search(&self, query: &str) -> FeedQuery {
        if !query.trim().is_empty() {
            *self.feed.write() = FeedQuery::search(query);
        }
        self.feed_query()
    }

    /// Leave search mode; the home feed picks a fresh random category.
    pub fn clear_search(&self) -> FeedQuery {
        let feed = FeedQuery::random_category();
        debug!(query = feed.query(), "Home feed reset");
        *self.feed.write() = feed.clone();
        feed
    }

    /// Page `page` of the current home feed.
    pub async fn fetch_feed(&self, page: u32) -> Result<Vec<Photo>, DomainError> {
        let feed = self.feed_query();
        self.photos.fetch_feed(&feed, page).await
    }

    /// Download the full-resolution wallpaper into the downloads directory.
    pub async fn save_wallpaper(&self, photo: &Photo) -> Result<PathBuf, DomainError> {
        let dir = self.config_store.downloads_dir();
        self.photos.download_wallpaper(photo, &dir).await
    }

    /// Home tab re-selected; listeners scroll back to the top.
    pub fn notify_home_tab_pressed(&self) {
        self.events.publish(AppEvent::HomeTabPressed);
    }

    /// Wait for queued writes of both stores to settle.
    pub async fn flush(&self) {
        tokio::join!(self.settings.flush(), self.favorites.flush());
    }

    pub fn data_dir(&self) -> String {
        self.config_store.data_dir().to_string_lossy().to_string()
    }

    pub fn logs_dir(&self) -> String {
        self.config_store.logs_dir().to_string_lossy().to_string()
    }

    pub fn config_path(&self) -> String {
        self.config_store.config_path().to_string_lossy().to_string()
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_support::{memory_storage, offline_controller};
    use super::*;
    use crate::domain::{
        SettingsRecord, ThemeMode, WallpaperQuality, DARK_THEME, SETTINGS_KEY,
    };

    #[tokio::test]
    async fn test_boot_restores_both_stores() {
        let storage = memory_storage();
        storage
            .set(SETTINGS_KEY, r#"{"settings":{"wallpaperQuality":"low"},"themeMode":"dark"}"#)
            .await
            .unwrap();
        storage
            .set(crate::app::FAVORITES_KEY, r#"{"p2":{"id":"p2"},"p1":{"id":"p1"}}"#)
            .await
            .unwrap();

        let controller = offline_controller(storage).await;

        assert_eq!(controller.settings().theme_mode(), ThemeMode::Dark);
        assert_eq!(controller.theme().active_theme(), &DARK_THEME);
        assert!(!controller.theme().is_animating());
        assert_eq!(controller.favorites().len(), 2);
    }

    #[tokio::test]
    async fn test_image_url_follows_quality() {
        let controller = offline_controller(memory_storage()).await;
        let photo = Photo::new(json!({
            "id": "p",
            "urls": {"thumb": "t", "small": "s", "regular": "r", "full": "f", "raw": "x"}
        }));

        // Default quality keeps the multi-megabyte raw upload out of previews
        assert_eq!(controller.image_url(&photo, ImageRequest::Preview).as_deref(), Some("f"));
        assert_eq!(controller.image_url(&photo, ImageRequest::Grid).as_deref(), Some("s"));

        controller.settings().save_settings(SettingsRecord {
            wallpaper_quality: WallpaperQuality::Low,
            long_press_download: false,
        });
        assert_eq!(controller.image_url(&photo, ImageRequest::Grid).as_deref(), Some("t"));
        assert_eq!(controller.image_url(&photo, ImageRequest::Download).as_deref(), Some("x"));
        assert!(!controller.long_press_enabled());
    }

    #[tokio::test]
    async fn test_home_tab_event_reaches_subscriber() {
        let controller = offline_controller(memory_storage()).await;
        let mut home = controller.events().subscribe_topic("homeTabPressed");

        controller.notify_home_tab_pressed();
        assert!(matches!(home.recv().await, Some(AppEvent::HomeTabPressed)));
    }

    #[tokio::test]
    async fn test_search_mode_switches_feed() {
        let controller = offline_controller(memory_storage()).await;
        assert!(!controller.feed_query().is_user_search());

        let feed = controller.start_search("  ");
        assert!(!feed.is_user_search());

        let feed = controller.start_search("ocean");
        assert_eq!(feed.query(), "ocean");
        assert!(controller.feed_query().is_user_search());

        let feed = controller.clear_search();
        assert!(crate::app::HOME_CATEGORIES.contains(&feed.query()));
        assert!(!controller.feed_query().is_user_search());
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let storage = memory_storage();
        let controller = offline_controller(Arc::clone(&storage)).await;
        controller.theme().set_theme_mode(ThemeMode::Dark);
        controller
            .favorites()
            .add(Photo::new(json!({"id": "keep"})))
            .unwrap();
        controller.flush().await;

        let restarted = offline_controller(storage).await;
        assert_eq!(restarted.settings().theme_mode(), ThemeMode::Dark);
        assert!(restarted.favorites().is_favorite(&"keep".into()));
    }
}
