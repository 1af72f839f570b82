pub mod config_store;
pub mod http_client;
pub mod kv_store;

pub use config_store::TomlConfigStore;
pub use http_client::ReqwestHttpClient;
pub use kv_store::{FileKeyValueStore, MemoryKeyValueStore};
