use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::ThemeMode;

/// Light-vs-dark classification of a theme or of the host's colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Light,
    Dark,
}

impl Polarity {
    pub fn is_dark(&self) -> bool {
        matches!(self, Polarity::Dark)
    }
}

/// An opaque sRGB colour, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a packed `0xRRGGBB` value.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid colour '{}'", raw)))
    }
}

/// Surface tints from flat (level0) to most raised (level5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elevation {
    pub level0: Color,
    pub level1: Color,
    pub level2: Color,
    pub level3: Color,
    pub level4: Color,
    pub level5: Color,
}

/// Colour table keyed by semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub surface: Color,
    pub on_surface: Color,
    pub outline: Color,
    pub tab_icon: Color,
    pub tab_icon_active: Color,
    pub elevation: Elevation,
}

/// A complete, immutable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeDefinition {
    pub name: &'static str,
    pub polarity: Polarity,
    pub colors: ThemeColors,
}

impl ThemeDefinition {
    pub fn is_dark(&self) -> bool {
        self.polarity.is_dark()
    }
}

pub const LIGHT_THEME: ThemeDefinition = ThemeDefinition {
    name: "Light",
    polarity: Polarity::Light,
    colors: ThemeColors {
        primary: Color::hex(0x000000),
        secondary: Color::hex(0x666666),
        background: Color::hex(0xFFFFFF),
        surface: Color::hex(0xF8F8F8),
        on_surface: Color::hex(0x000000),
        outline: Color::hex(0xE5E5E5),
        tab_icon: Color::hex(0x666666),
        tab_icon_active: Color::hex(0x000000),
        elevation: Elevation {
            level0: Color::hex(0xFFFFFF),
            level1: Color::hex(0xF8F8F8),
            level2: Color::hex(0xF3F3F3),
            level3: Color::hex(0xEDEDED),
            level4: Color::hex(0xE8E8E8),
            level5: Color::hex(0xE3E3E3),
        },
    },
};

pub const DARK_THEME: ThemeDefinition = ThemeDefinition {
    name: "Dark",
    polarity: Polarity::Dark,
    colors: ThemeColors {
        primary: Color::hex(0xFFFFFF),
        secondary: Color::hex(0xAAAAAA),
        background: Color::hex(0x000000),
        surface: Color::hex(0x121212),
        on_surface: Color::hex(0xFFFFFF),
        outline: Color::hex(0x2A2A2A),
        tab_icon: Color::hex(0xAAAAAA),
        tab_icon_active: Color::hex(0xFFFFFF),
        elevation: Elevation {
            level0: Color::hex(0x000000),
            level1: Color::hex(0x1A1A1A),
            level2: Color::hex(0x222222),
            level3: Color::hex(0x2A2A2A),
            level4: Color::hex(0x333333),
            level5: Color::hex(0x383838),
        },
    },
};

/// Resolve a theme mode against the host's colour scheme.
///
/// An unknown host scheme is treated as light.
pub fn resolve_theme(mode: ThemeMode, host: Option<Polarity>) -> &'static ThemeDefinition {
    let polarity = match mode {
        ThemeMode::Light => Polarity::Light,
        ThemeMode::Dark => Polarity::Dark,
        ThemeMode::System => host.unwrap_or(Polarity::Light),
    };
    theme_for(polarity)
}

pub fn theme_for(polarity: Polarity) -> &'static ThemeDefinition {
    match polarity {
        Polarity::Light => &LIGHT_THEME,
        Polarity::Dark => &DARK_THEME,
    }
}
