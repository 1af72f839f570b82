use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::app::{EventBus, PersistWriter};
use crate::domain::{AppEvent, DomainError, Photo, PhotoId};
use crate::ports::KeyValueStore;

/// Storage key holding the favorites mapping.
pub const FAVORITES_KEY: &str = "@pixelwall_favorites";

/// Favorited photos, most recently added first.
///
/// Persisted as one JSON object whose key order is the display order.
pub struct FavoritesStore {
    entries: RwLock<Vec<(PhotoId, Photo)>>,
    writer: PersistWriter,
    events: EventBus,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, events: EventBus) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            writer: PersistWriter::spawn(storage, FAVORITES_KEY),
            events,
        }
    }

    /// Load the mapping from storage. Anything unreadable yields an empty set.
    pub async fn load(&self) {
        let entries = match self.writer.read().await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Stored favorites are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = %e, "Failed to load favorites");
                Vec::new()
            }
        };

        info!(count = entries.len(), "Favorites loaded");
        *self.entries.write() = entries;
    }

    /// Add (or refresh) a favorite and move it to the front.
    ///
    /// Rejects photos without a usable id instead of storing a bogus key.
    pub fn add(&self, photo: Photo) -> Result<(), DomainError> {
        let id = photo.require_id()?;
        let (snapshot, count) = {
            let mut entries = self.entries.write();
            entries.retain(|(existing, _)| existing != &id);
            entries.insert(0, (id.clone(), photo));
            (encode(&entries), entries.len())
        };

        debug!(photo_id = %id, count, "Favorite added");
        self.commit(snapshot, count);
        Ok(())
    }

    /// Remove a favorite. Removing an unknown id is a no-op but still persists.
    pub fn remove(&self, id: &PhotoId) {
        let (snapshot, count) = {
            let mut entries = self.entries.write();
            entries.retain(|(existing, _)| existing != id);
            (encode(&entries), entries.len())
        };

        debug!(photo_id = %id, count, "Favorite removed");
        self.commit(snapshot, count);
    }

    /// Add the photo if absent, remove it if present. Returns the new membership.
    pub fn toggle(&self, photo: Photo) -> Result<bool, DomainError> {
        let id = photo.require_id()?;
        if self.is_favorite(&id) {
            self.remove(&id);
            Ok(false)
        } else {
            self.add(photo)?;
            Ok(true)
        }
    }

    pub fn is_favorite(&self, id: &PhotoId) -> bool {
        self.entries.read().iter().any(|(existing, _)| existing == id)
    }

    /// Favorites in display order.
    pub fn list(&self) -> Vec<Photo> {
        self.entries.read().iter().map(|(_, photo)| photo.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Wait for queued writes to settle.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn commit(&self, snapshot: Result<String, DomainError>, count: usize) {
        match snapshot {
            Ok(json) => self.writer.persist(json),
            Err(e) => error!(error = %e, "Failed to serialize favorites"),
        }
        self.events.publish(AppEvent::FavoritesChanged { count });
    }
}

fn encode(entries: &[(PhotoId, Photo)]) -> Result<String, DomainError> {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(id, photo)| (id.to_string(), photo.as_json().clone()))
        .collect();
    Ok(serde_json::to_string(&map)?)
}

fn decode(raw: &str) -> Result<Vec<(PhotoId, Photo)>, DomainError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (PhotoId::from(key), Photo::new(value)))
            .collect()),
        _ => Err(DomainError::Serialization(
            "favorites blob is not a JSON object".to_string(),
        )),
    }
}
