use thiserror::Error;

/// Domain-level errors for PixelWall.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid photo record: {reason}")]
    InvalidPhoto { reason: String },

    #[error("No image URL available for {request:?} request")]
    NoImageUrl { request: crate::domain::ImageRequest },
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for DomainError {
    fn from(err: url::ParseError) -> Self {
        DomainError::InvalidUrl(err.to_string())
    }
}
