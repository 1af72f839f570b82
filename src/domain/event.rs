use serde::Serialize;

use crate::domain::{ThemeEvent, ThemeMode};

/// Events published on the application event bus.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "topic", content = "data")]
pub enum AppEvent {
    /// The home tab was pressed while already selected (scroll to top).
    HomeTabPressed,
    /// Theme mode preference changed.
    ThemeModeChanged { mode: ThemeMode },
    /// Overlay transition progress.
    Theme(ThemeEvent),
    /// Settings record replaced.
    SettingsChanged,
    /// Favorites mapping mutated.
    FavoritesChanged { count: usize },
}

impl AppEvent {
    /// Stable topic name, used for filtering subscriptions.
    pub fn topic(&self) -> &'static str {
        match self {
            AppEvent::HomeTabPressed => "homeTabPressed",
            AppEvent::ThemeModeChanged { .. } => "themeModeChanged",
            AppEvent::Theme(_) => "theme",
            AppEvent::SettingsChanged => "settingsChanged",
            AppEvent::FavoritesChanged { .. } => "favoritesChanged",
        }
    }
}
