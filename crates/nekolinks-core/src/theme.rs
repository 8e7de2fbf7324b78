//! Color themes
//!
//! A fixed set of built-in palettes plus the resolution rule that turns
//! the user's settings into the theme actually shown:
//!
//! 1. Look up `settings.theme` by name (unknown names use the first palette)
//! 2. Replace the accent slot with `settings.accent_color`
//! 3. Overlay every slot present in `settings.custom_colors`
//!
//! The resolved theme is derived on demand and never persisted.

use serde::{Deserialize, Serialize};

use crate::models::Settings;

/// Name of the theme used by default settings
pub const DEFAULT_THEME: &str = "Midnight Neko";

/// Accent color used by default settings
pub const DEFAULT_ACCENT: &str = "#F472B6";

/// The seven color slots of a theme, as hex strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_secondary: String,
}

/// Optional replacement for any palette slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_secondary: Option<String>,
}

/// Slot names accepted by [`ColorOverrides::slot_mut`]
pub const COLOR_SLOTS: [&str; 7] = [
    "primary",
    "secondary",
    "accent",
    "background",
    "surface",
    "text",
    "text_secondary",
];

impl ColorOverrides {
    /// Whether no slot is overridden
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Mutable access to a slot by name (`text_secondary` or `textSecondary`)
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "primary" => Some(&mut self.primary),
            "secondary" => Some(&mut self.secondary),
            "accent" => Some(&mut self.accent),
            "background" => Some(&mut self.background),
            "surface" => Some(&mut self.surface),
            "text" => Some(&mut self.text),
            "text_secondary" | "textSecondary" => Some(&mut self.text_secondary),
            _ => None,
        }
    }

    /// Set slots in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            &self.primary,
            &self.secondary,
            &self.accent,
            &self.background,
            &self.surface,
            &self.text,
            &self.text_secondary,
        ]
        .into_iter()
        .zip(COLOR_SLOTS)
        .filter_map(|(value, name)| value.as_deref().map(|v| (name, v)))
    }
}

impl Palette {
    /// Replace every slot that `overrides` sets
    pub fn overlay(&mut self, overrides: &ColorOverrides) {
        let pairs = [
            (&mut self.primary, &overrides.primary),
            (&mut self.secondary, &overrides.secondary),
            (&mut self.accent, &overrides.accent),
            (&mut self.background, &overrides.background),
            (&mut self.surface, &overrides.surface),
            (&mut self.text, &overrides.text),
            (&mut self.text_secondary, &overrides.text_secondary),
        ];
        for (slot, value) in pairs {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
    }
}

/// A named palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: Palette,
}

struct BuiltinTheme {
    name: &'static str,
    colors: [&'static str; 7],
}

// Slot order: primary, secondary, accent, background, surface, text, text_secondary
const BUILTIN_THEMES: [BuiltinTheme; 3] = [
    BuiltinTheme {
        name: "Midnight Neko",
        colors: [
            "#8B5CF6", "#A78BFA", "#F472B6", "#0F0F23", "#1A1A2E", "#E5E7EB", "#9CA3AF",
        ],
    },
    BuiltinTheme {
        name: "Purple Dream",
        colors: [
            "#9333EA", "#A855F7", "#EC4899", "#1E1B4B", "#312E81", "#F3F4F6", "#D1D5DB",
        ],
    },
    BuiltinTheme {
        name: "Sakura Night",
        colors: [
            "#EC4899", "#F472B6", "#8B5CF6", "#0F0F0F", "#262626", "#FAFAFA", "#A3A3A3",
        ],
    },
];

impl BuiltinTheme {
    fn to_theme(&self) -> Theme {
        let [primary, secondary, accent, background, surface, text, text_secondary] =
            self.colors.map(String::from);
        Theme {
            name: self.name.to_string(),
            colors: Palette {
                primary,
                secondary,
                accent,
                background,
                surface,
                text,
                text_secondary,
            },
        }
    }
}

/// All built-in themes, in display order
pub fn builtin_themes() -> Vec<Theme> {
    BUILTIN_THEMES.iter().map(BuiltinTheme::to_theme).collect()
}

/// Look up a built-in theme by exact name
pub fn find_theme(name: &str) -> Option<Theme> {
    BUILTIN_THEMES
        .iter()
        .find(|t| t.name == name)
        .map(BuiltinTheme::to_theme)
}

/// Resolve the theme described by `settings`
pub fn resolve_theme(settings: &Settings) -> Theme {
    let mut theme = find_theme(&settings.theme).unwrap_or_else(|| BUILTIN_THEMES[0].to_theme());
    theme.colors.accent.clone_from(&settings.accent_color);
    if let Some(ref custom) = settings.custom_colors {
        theme.colors.overlay(custom);
    }
    theme
}
