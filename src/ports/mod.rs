pub mod config;
pub mod http;
pub mod storage;

pub use config::ConfigStore;
pub use http::HttpClient;
pub use storage::KeyValueStore;
