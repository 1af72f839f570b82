use serde::Serialize;
use serde_json::Value;

use crate::app::{AppController, ThemeSnapshot};
use crate::domain::{
    AppConfig, ImageRequest, Photo, PhotoId, Polarity, RequestOutcome, SettingsRecord, ThemeMode,
    WallpaperQuality,
};

/// Get the current application configuration.
pub fn get_config(controller: &AppController) -> AppConfig {
    controller.config()
}

/// Update the application configuration.
pub fn update_config(controller: &AppController, config: AppConfig) -> Result<(), String> {
    controller
        .update_config(config)
        .map_err(|e| e.to_string())
}

/// Get application paths information.
pub fn get_paths(controller: &AppController) -> AppPaths {
    AppPaths {
        data_dir: controller.data_dir(),
        logs_dir: controller.logs_dir(),
        config_path: controller.config_path(),
    }
}

/// Application paths information.
#[derive(Debug, Serialize)]
pub struct AppPaths {
    pub data_dir: String,
    pub logs_dir: String,
    pub config_path: String,
}

// ==================== Theme Commands ====================

/// What the shell needs to paint right now.
pub fn get_theme(controller: &AppController) -> ThemeSnapshot {
    controller.theme().snapshot()
}

/// Switch theme mode. Accepts `light`, `dark` or `system`.
pub fn set_theme_mode(controller: &AppController, mode: &str) -> Result<ThemeChange, String> {
    let mode = ThemeMode::parse(mode).ok_or_else(|| format!("Unknown theme mode: {}", mode))?;
    let outcome = controller.theme().set_theme_mode(mode);

    Ok(ThemeChange {
        outcome,
        snapshot: controller.theme().snapshot(),
    })
}

/// Forward an OS colour scheme change. `None` means the host reports nothing.
pub fn set_host_scheme(controller: &AppController, scheme: Option<Polarity>) -> ThemeSnapshot {
    controller.theme().set_host_scheme(scheme);
    controller.theme().snapshot()
}

/// Result of a theme mode change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChange {
    pub outcome: RequestOutcome,
    pub snapshot: ThemeSnapshot,
}

// ==================== Settings Commands ====================

pub fn get_settings(controller: &AppController) -> SettingsRecord {
    controller.settings().settings()
}

pub fn save_settings(controller: &AppController, record: SettingsRecord) {
    controller.settings().save_settings(record);
}

/// Change only the wallpaper quality, keeping other preferences.
pub fn set_wallpaper_quality(
    controller: &AppController,
    quality: &str,
) -> Result<SettingsRecord, String> {
    let quality = WallpaperQuality::parse(quality)
        .ok_or_else(|| format!("Unknown wallpaper quality: {}", quality))?;

    let mut record = controller.settings().settings();
    record.wallpaper_quality = quality;
    controller.settings().save_settings(record.clone());
    Ok(record)
}

/// Selectable quality options with their display labels.
pub fn list_wallpaper_qualities() -> Vec<QualityOption> {
    WallpaperQuality::ALL
        .iter()
        .map(|q| QualityOption {
            value: *q,
            label: q.label(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct QualityOption {
    pub value: WallpaperQuality,
    pub label: &'static str,
}

// ==================== Favorites Commands ====================

pub fn list_favorites(controller: &AppController) -> Vec<Value> {
    controller
        .favorites()
        .list()
        .into_iter()
        .map(Photo::into_json)
        .collect()
}

pub fn is_favorite(controller: &AppController, id: &str) -> bool {
    controller.favorites().is_favorite(&PhotoId::from(id))
}

pub fn add_favorite(controller: &AppController, photo: Value) -> Result<(), String> {
    controller
        .favorites()
        .add(Photo::new(photo))
        .map_err(|e| e.to_string())
}

pub fn remove_favorite(controller: &AppController, id: &str) {
    controller.favorites().remove(&PhotoId::from(id));
}

/// Flip membership. Returns whether the photo is now a favorite.
pub fn toggle_favorite(controller: &AppController, photo: Value) -> Result<bool, String> {
    controller
        .favorites()
        .toggle(Photo::new(photo))
        .map_err(|e| e.to_string())
}

// ==================== Photo Commands ====================

/// One page of the home feed with per-card URLs resolved for the current
/// quality.
pub async fn fetch_feed(controller: &AppController, page: u32) -> Result<Vec<FeedItem>, String> {
    let photos = controller.fetch_feed(page).await.map_err(|e| e.to_string())?;
    Ok(photos.iter().map(|p| feed_item(controller, p)).collect())
}

/// Enter search mode and load the first page of results.
pub async fn search_feed(controller: &AppController, query: &str) -> Result<Vec<FeedItem>, String> {
    controller.start_search(query);
    fetch_feed(controller, 1).await
}

/// Leave search mode and load a fresh random category.
pub async fn clear_search(controller: &AppController) -> Result<Vec<FeedItem>, String> {
    controller.clear_search();
    fetch_feed(controller, 1).await
}

/// Browsable collections, premium ones excluded.
pub async fn list_collections(
    controller: &AppController,
    page: u32,
) -> Result<Vec<CollectionItem>, String> {
    let collections = controller
        .photos()
        .fetch_collections(page)
        .await
        .map_err(|e| e.to_string())?;

    Ok(collections
        .iter()
        .filter_map(|c| {
            Some(CollectionItem {
                id: c.id()?.to_string(),
                title: c.title().to_string(),
                total_photos: c.total_photos(),
            })
        })
        .collect())
}

pub async fn fetch_collection_feed(
    controller: &AppController,
    collection_id: &str,
    page: u32,
) -> Result<Vec<FeedItem>, String> {
    let photos = controller
        .photos()
        .fetch_collection_photos(collection_id, page, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(photos.iter().map(|p| feed_item(controller, p)).collect())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: String,
    pub title: String,
    pub total_photos: u64,
}

/// Download the wallpaper and return where it was saved.
pub async fn download_wallpaper(controller: &AppController, photo: Value) -> Result<String, String> {
    controller
        .save_wallpaper(&Photo::new(photo))
        .await
        .map(|path| path.to_string_lossy().to_string())
        .map_err(|e| e.to_string())
}

/// Home tab pressed while already selected.
pub fn home_tab_pressed(controller: &AppController) {
    controller.notify_home_tab_pressed();
}

/// A photo card as the grid renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub grid_url: Option<String>,
    pub preview_url: Option<String>,
    pub is_favorite: bool,
    pub long_press_download: bool,
}

fn feed_item(controller: &AppController, photo: &Photo) -> FeedItem {
    let id = photo.id();
    FeedItem {
        is_favorite: id
            .as_ref()
            .map(|id| controller.favorites().is_favorite(id))
            .unwrap_or(false),
        id: id.map(|id| id.to_string()),
        description: photo.description().map(str::to_string),
        author: photo.author().map(str::to_string),
        grid_url: controller.image_url(photo, ImageRequest::Grid),
        preview_url: controller.image_url(photo, ImageRequest::Preview),
        long_press_download: controller.long_press_enabled(),
    }
}
