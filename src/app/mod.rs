pub mod controller;
pub mod event_bus;
pub mod favorites_store;
pub mod persist;
pub mod photo_api;
pub mod settings_store;
pub mod theme_controller;

pub use controller::{AppController, AppParts};
pub use event_bus::{EventBus, TopicSubscription};
pub use favorites_store::{FavoritesStore, FAVORITES_KEY};
pub use persist::PersistWriter;
pub use photo_api::{FeedQuery, PhotoApi, HOME_CATEGORIES};
pub use settings_store::SettingsStore;
pub use theme_controller::{AnimationDriver, ThemeController, ThemeSnapshot};
