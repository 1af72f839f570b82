use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::config::ApiConfig;
use crate::domain::{
    select_image_url, Collection, DomainError, ImageRequest, Photo, WallpaperQuality,
};
use crate::ports::HttpClient;

/// Search terms the home feed rotates through.
pub const HOME_CATEGORIES: [&str; 8] = [
    "Nature",
    "Landscape",
    "Mountains",
    "Minimal",
    "Space",
    "Trees",
    "Patterns",
    "Abstract",
];

/// Highest page a fresh home feed may start on.
const HOME_START_PAGES: u32 = 50;
/// Highest page a fresh user search may start on.
const SEARCH_START_PAGES: u32 = 10;

/// A search-backed feed whose first page is randomized so repeated visits
/// show different wallpapers. Later pages are fetched as requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    query: String,
    first_page: u32,
    user_search: bool,
}

impl FeedQuery {
    pub fn new(query: impl Into<String>, first_page: u32, user_search: bool) -> Self {
        Self {
            query: query.into(),
            first_page: first_page.max(1),
            user_search,
        }
    }

    /// Home feed: a random category starting on a random page.
    pub fn random_category() -> Self {
        let mut rng = rand::thread_rng();
        let query = HOME_CATEGORIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(HOME_CATEGORIES[0]);
        Self::new(query, rng.gen_range(1..=HOME_START_PAGES), false)
    }

    /// A user search, starting on one of its first few pages.
    pub fn search(query: &str) -> Self {
        let first_page = rand::thread_rng().gen_range(1..=SEARCH_START_PAGES);
        Self::new(query.trim(), first_page, true)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_user_search(&self) -> bool {
        self.user_search
    }

    /// Upstream page to request for feed page `page` (1-based).
    pub fn page_to_fetch(&self, page: u32) -> u32 {
        if page <= 1 {
            self.first_page
        } else {
            page
        }
    }
}

/// Client for the wallpaper aggregation service.
///
/// The service is a single function endpoint; the upstream route is chosen
/// with the `endpoint` query parameter.
pub struct PhotoApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
    per_page: u32,
}

impl PhotoApi {
    pub fn new(http: Arc<dyn HttpClient>, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            per_page: config.per_page,
        }
    }

    /// Latest wallpapers, newest first.
    pub async fn fetch_wallpapers(
        &self,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Vec<Photo>, DomainError> {
        self.fetch("photos".to_string(), None, page, per_page).await
    }

    pub async fn fetch_collection_photos(
        &self,
        collection_id: &str,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Vec<Photo>, DomainError> {
        let endpoint = format!("collections/{}/photos", collection_id);
        self.fetch(endpoint, None, page, per_page).await
    }

    pub async fn search_wallpapers(
        &self,
        query: &str,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Vec<Photo>, DomainError> {
        self.fetch("search".to_string(), Some(query), page, per_page).await
    }

    /// Photos for `page` of a randomized feed.
    pub async fn fetch_feed(&self, feed: &FeedQuery, page: u32) -> Result<Vec<Photo>, DomainError> {
        self.search_wallpapers(feed.query(), feed.page_to_fetch(page), None)
            .await
    }

    /// Browsable collections. Premium collections are left out.
    pub async fn fetch_collections(&self, page: u32) -> Result<Vec<Collection>, DomainError> {
        let params = [
            ("endpoint", "collections".to_string()),
            ("page", page.max(1).to_string()),
        ];
        let body = self.http.get_json(&self.base_url, &params).await?;

        let listed = items_from_body(body)?;
        let total = listed.len();
        let collections: Vec<Collection> = listed
            .into_iter()
            .map(Collection::new)
            .filter(|c| !c.is_premium())
            .collect();

        debug!(
            page,
            count = collections.len(),
            premium = total - collections.len(),
            "Fetched collections"
        );
        Ok(collections)
    }

    async fn fetch(
        &self,
        endpoint: String,
        query: Option<&str>,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Vec<Photo>, DomainError> {
        let per_page = per_page.unwrap_or(self.per_page);
        let mut params = vec![("endpoint", endpoint.clone())];
        if let Some(query) = query {
            params.push(("query", query.to_string()));
        }
        params.push(("page", page.max(1).to_string()));
        params.push(("per_page", per_page.to_string()));

        let body = self.http.get_json(&self.base_url, &params).await?;
        let photos = photos_from_body(body)?;

        debug!(endpoint = %endpoint, page, count = photos.len(), "Fetched photos");
        Ok(photos)
    }

    /// Save the full-resolution variant of `photo` into `dir`.
    ///
    /// Downloads always use the largest variant regardless of the quality
    /// preference.
    pub async fn download_wallpaper(&self, photo: &Photo, dir: &Path) -> Result<PathBuf, DomainError> {
        let id = photo.require_id()?;
        let urls = photo.urls();
        let url = select_image_url(&urls, WallpaperQuality::Original, ImageRequest::Download)
            .ok_or(DomainError::NoImageUrl {
                request: ImageRequest::Download,
            })?;

        let path = dir.join(download_file_name(id.as_str()));
        let bytes = self.http.download_file(url, &path, None).await?;

        info!(photo_id = %id, path = ?path, bytes, "Wallpaper saved");
        Ok(path)
    }
}

/// `pixelwall_<id>.jpg`, with anything path-like in the id neutralized.
pub fn download_file_name(id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("pixelwall_{}.jpg", safe)
}

/// Listing endpoints return a bare array; search wraps it in `results`.
/// An object without `results` is an empty page.
fn items_from_body(body: Value) -> Result<Vec<Value>, DomainError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        },
        _ => Err(DomainError::Serialization(
            "unexpected photo response shape".to_string(),
        )),
    }
}

fn photos_from_body(body: Value) -> Result<Vec<Photo>, DomainError> {
    Ok(items_from_body(body)?.into_iter().map(Photo::new).collect())
}
