use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// HTTP client port for all network requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request with query parameters and return the JSON body.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, DomainError>;

    /// Download a file to a specified path.
    ///
    /// The file only appears at `path` once the body has been fully written.
    async fn download_file(
        &self,
        url: &str,
        path: &std::path::Path,
        progress_callback: Option<Box<dyn Fn(u64, u64) + Send + Sync>>,
    ) -> Result<u64, DomainError>;
}
