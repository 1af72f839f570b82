pub mod config;
pub mod error;
pub mod event;
pub mod gesture;
pub mod image;
pub mod photo;
pub mod settings;
pub mod theme;
pub mod transition;

pub use config::AppConfig;
pub use error::DomainError;
pub use event::AppEvent;
pub use gesture::{GestureEvent, GestureState, LongPressGesture, ReleaseOutcome};
pub use image::{select_image_url, ImageRequest};
pub use photo::{Collection, Photo, PhotoId, PhotoUrls};
pub use settings::{SettingsEnvelope, SettingsRecord, ThemeMode, WallpaperQuality, SETTINGS_KEY};
pub use theme::{
    resolve_theme, theme_for, Color, Polarity, ThemeColors, ThemeDefinition, DARK_THEME,
    LIGHT_THEME,
};
pub use transition::{Overlay, RequestOutcome, ThemeEvent, ThemeTransition, TransitionPhase};
