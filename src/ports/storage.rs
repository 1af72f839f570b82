use async_trait::async_trait;

use crate::domain::DomainError;

/// Durable string key-value storage.
///
/// Each store in the app owns exactly one key; values are JSON text.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
