use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Opaque photo identifier.
///
/// Numeric ids from the API are normalized to their decimal string form so
/// `123` and `"123"` address the same favorite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract an id from a JSON value. Only non-empty strings and numbers qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for PhotoId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Resolution variants published for a photo. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoUrls {
    pub raw: Option<String>,
    pub full: Option<String>,
    pub regular: Option<String>,
    pub small: Option<String>,
    pub thumb: Option<String>,
}

/// A photo record exactly as received from the remote API.
///
/// Only `id` and `urls` are interpreted; every other field is carried through
/// untouched so favorites round-trip the full API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(Value);

impl Photo {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The photo's id, if it carries a usable one.
    pub fn id(&self) -> Option<PhotoId> {
        self.0.get("id").and_then(PhotoId::from_json)
    }

    /// The photo's id, or `InvalidPhoto` when it has none.
    pub fn require_id(&self) -> Result<PhotoId, DomainError> {
        self.id().ok_or_else(|| DomainError::InvalidPhoto {
            reason: "photo has no usable `id` field".to_string(),
        })
    }

    pub fn urls(&self) -> PhotoUrls {
        self.0
            .get("urls")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0
            .get("description")
            .and_then(Value::as_str)
            .or_else(|| self.0.get("alt_description").and_then(Value::as_str))
    }

    pub fn author(&self) -> Option<&str> {
        self.0.pointer("/user/name").and_then(Value::as_str)
    }

    pub fn dimensions(&self) -> Option<(u64, u64)> {
        let width = self.0.get("width").and_then(Value::as_u64)?;
        let height = self.0.get("height").and_then(Value::as_u64)?;
        Some((width, height))
    }

    pub fn likes(&self) -> u64 {
        self.0.get("likes").and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for Photo {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A curated collection as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection(Value);

impl Collection {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Collection id, used to page through its photos.
    pub fn id(&self) -> Option<PhotoId> {
        self.0.get("id").and_then(PhotoId::from_json)
    }

    pub fn title(&self) -> &str {
        self.0.get("title").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn total_photos(&self) -> u64 {
        self.0.get("total_photos").and_then(Value::as_u64).unwrap_or(0)
    }

    /// Paid Unsplash+ collections cannot be browsed with a free key.
    pub fn is_premium(&self) -> bool {
        let title = self.title().to_lowercase();
        title.contains("unsplash+") || title.contains("unsplash plus")
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}
