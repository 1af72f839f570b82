use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::DomainError;
use crate::ports::HttpClient;

/// Downloads of full-resolution originals can be far slower than API calls.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// reqwest-backed HTTP client used for the photo API and wallpaper downloads.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client whose API requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent(format!("PixelWall/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        info!(timeout_secs = timeout.as_secs(), "HTTP client initialized");

        Ok(Self { client })
    }

    /// Only plain web URLs may leave the process.
    fn parse_web_url(url: &str) -> Result<Url, DomainError> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => {
                warn!(url = url, scheme = other, "Rejected non-HTTP URL");
                Err(DomainError::InvalidUrl(format!(
                    "unsupported scheme '{}' in {}",
                    other, url
                )))
            }
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, DomainError> {
        let parsed = Self::parse_web_url(url)?;
        debug!(url = url, params = query.len(), "GET");

        let response = self.client.get(parsed).query(query).send().await;
        ensure_success(response, url)?
            .json()
            .await
            .map_err(|e| DomainError::HttpRequest(e.to_string()))
    }

    async fn download_file(
        &self,
        url: &str,
        path: &Path,
        progress_callback: Option<Box<dyn Fn(u64, u64) + Send + Sync>>,
    ) -> Result<u64, DomainError> {
        let parsed = Self::parse_web_url(url)?;

        let response = self
            .client
            .get(parsed)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await;
        let response = ensure_success(response, url)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Partial downloads never appear under the final name
        let partial = path.with_extension("part");
        let written = match stream_to_file(response, &partial, progress_callback.as_deref()).await
        {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        info!(path = ?path, bytes = written, "Download complete");
        Ok(written)
    }
}

fn ensure_success(
    response: Result<Response, reqwest::Error>,
    url: &str,
) -> Result<Response, DomainError> {
    let response = response.map_err(|e| DomainError::HttpRequest(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DomainError::HttpRequest(format!("HTTP {} for {}", status, url)))
    }
}

async fn stream_to_file(
    response: Response,
    path: &Path,
    progress: Option<&(dyn Fn(u64, u64) + Send + Sync)>,
) -> Result<u64, DomainError> {
    let total = response.content_length().unwrap_or(0);
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DomainError::HttpRequest(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        if let Some(progress) = progress {
            progress(written, total);
        }
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_urls_accepted() {
        assert!(ReqwestHttpClient::parse_web_url("https://images.example.com/a.jpg").is_ok());
        assert!(ReqwestHttpClient::parse_web_url("http://localhost:8080/photos").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            ReqwestHttpClient::parse_web_url("file:///etc/passwd"),
            Err(DomainError::InvalidUrl(_))
        ));
        assert!(matches!(
            ReqwestHttpClient::parse_web_url("not a url"),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_get_json_rejects_bad_url_before_sending() {
        let client = ReqwestHttpClient::new(Duration::from_secs(1)).unwrap();
        let result = client.get_json("ftp://example.com/feed", &[]).await;
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }
}
