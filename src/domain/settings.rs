use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Storage key holding the settings envelope.
pub const SETTINGS_KEY: &str = "@pixelwall_settings";

/// Image quality preference for grid and preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperQuality {
    Low,
    Medium,
    High,
    #[default]
    Original,
    /// Written by older builds; selects the raw upload for previews.
    /// Not offered as a choice any more.
    Raw,
}

impl WallpaperQuality {
    pub const ALL: [WallpaperQuality; 4] = [
        WallpaperQuality::Low,
        WallpaperQuality::Medium,
        WallpaperQuality::High,
        WallpaperQuality::Original,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WallpaperQuality::Low => "low",
            WallpaperQuality::Medium => "medium",
            WallpaperQuality::High => "high",
            WallpaperQuality::Original => "original",
            WallpaperQuality::Raw => "raw",
        }
    }

    /// Human-readable label used by the settings screen.
    pub fn label(&self) -> &'static str {
        match self {
            WallpaperQuality::Low => "Low",
            WallpaperQuality::Medium => "Medium",
            WallpaperQuality::High => "High",
            WallpaperQuality::Original => "Original",
            WallpaperQuality::Raw => "Raw",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(WallpaperQuality::Low),
            "medium" => Some(WallpaperQuality::Medium),
            "high" => Some(WallpaperQuality::High),
            "original" => Some(WallpaperQuality::Original),
            "raw" => Some(WallpaperQuality::Raw),
            _ => None,
        }
    }
}

/// User preference for light, dark, or follow-the-host theming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "system" => Some(ThemeMode::System),
            _ => None,
        }
    }
}

/// User preferences. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsRecord {
    pub wallpaper_quality: WallpaperQuality,
    pub long_press_download: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            wallpaper_quality: WallpaperQuality::Original,
            long_press_download: true,
        }
    }
}

impl SettingsRecord {
    /// Merge a stored settings object over the defaults.
    ///
    /// Stored values win; missing or unreadable keys keep their default.
    pub fn merged_over_defaults(stored: Option<&Value>) -> Self {
        let mut record = Self::default();
        let Some(Value::Object(map)) = stored else {
            return record;
        };

        if let Some(quality) = map
            .get("wallpaperQuality")
            .and_then(|v| serde_json::from_value::<WallpaperQuality>(v.clone()).ok())
        {
            record.wallpaper_quality = quality;
        }
        if let Some(enabled) = map.get("longPressDownload").and_then(Value::as_bool) {
            record.long_press_download = enabled;
        }
        record
    }
}

/// The single persisted blob holding settings and theme mode together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsEnvelope {
    pub settings: SettingsRecord,
    pub theme_mode: ThemeMode,
}

impl SettingsEnvelope {
    /// Decode a stored envelope, backfilling every missing piece.
    ///
    /// Fails only when the blob is not a JSON object at all.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(DomainError::Serialization(
                "settings envelope is not a JSON object".to_string(),
            ));
        };

        let settings = SettingsRecord::merged_over_defaults(map.get("settings"));
        let theme_mode = map
            .get("themeMode")
            .and_then(Value::as_str)
            .and_then(ThemeMode::parse)
            .unwrap_or_default();

        Ok(Self {
            settings,
            theme_mode,
        })
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let record = SettingsRecord::default();
        assert_eq!(record.wallpaper_quality, WallpaperQuality::Original);
        assert!(record.long_press_download);
        assert_eq!(ThemeMode::default(), ThemeMode::System);
    }

    #[test]
    fn test_envelope_with_only_theme_mode() {
        let envelope = SettingsEnvelope::from_json(r#"{"themeMode":"dark"}"#).unwrap();
        assert_eq!(envelope.theme_mode, ThemeMode::Dark);
        assert_eq!(envelope.settings, SettingsRecord::default());
    }

    #[test]
    fn test_envelope_partial_settings_merge() {
        let envelope =
            SettingsEnvelope::from_json(r#"{"settings":{"longPressDownload":false}}"#).unwrap();
        assert_eq!(envelope.theme_mode, ThemeMode::System);
        assert!(!envelope.settings.long_press_download);
        assert_eq!(envelope.settings.wallpaper_quality, WallpaperQuality::Original);
    }

    #[test]
    fn test_envelope_tolerates_bad_fields() {
        let envelope = SettingsEnvelope::from_json(
            r#"{"settings":{"wallpaperQuality":"ultra","longPressDownload":"yes"},"themeMode":null}"#,
        )
        .unwrap();
        assert_eq!(envelope, SettingsEnvelope::default());
    }

    #[test]
    fn test_envelope_rejects_non_object() {
        assert!(SettingsEnvelope::from_json("[1,2,3]").is_err());
        assert!(SettingsEnvelope::from_json("{not json").is_err());
    }

    #[test]
    fn test_legacy_raw_quality() {
        let envelope =
            SettingsEnvelope::from_json(r#"{"settings":{"wallpaperQuality":"raw"}}"#).unwrap();
        assert_eq!(envelope.settings.wallpaper_quality, WallpaperQuality::Raw);
        assert!(!WallpaperQuality::ALL.contains(&WallpaperQuality::Raw));
    }

    #[test]
    fn test_envelope_wire_format() {
        let envelope = SettingsEnvelope {
            settings: SettingsRecord {
                wallpaper_quality: WallpaperQuality::Medium,
                long_press_download: false,
            },
            theme_mode: ThemeMode::Light,
        };
        let json = envelope.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"settings":{"wallpaperQuality":"medium","longPressDownload":false},"themeMode":"light"}"#
        );
        assert_eq!(SettingsEnvelope::from_json(&json).unwrap(), envelope);
    }

    #[test]
    fn test_quality_parse() {
        for quality in WallpaperQuality::ALL {
            assert_eq!(WallpaperQuality::parse(quality.as_str()), Some(quality));
        }
        assert_eq!(WallpaperQuality::parse("RAW"), Some(WallpaperQuality::Raw));
        assert_eq!(WallpaperQuality::parse("4k"), None);
    }
}
