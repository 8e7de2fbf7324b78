//! Settings command handlers

use anyhow::{bail, Context, Result};

use nekolinks_core::forms::{parse_hex_color, parse_theme_name};
use nekolinks_core::theme::COLOR_SLOTS;
use nekolinks_core::{builtin_themes, Settings, SettingsPatch, Store};

use crate::output::Output;

/// Show stored settings and the resolved theme
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let repo = store.settings();
    output.print_settings(repo.settings(), &repo.current_theme());
    Ok(())
}

/// Set one settings value
pub fn set(store: &mut Store, key: String, value: String, output: &Output) -> Result<()> {
    let patch = patch_for(store.settings().settings(), &key, &value)?;
    store.settings_mut().update(patch);

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// List the built-in themes, marking the current one
pub fn themes(store: &Store, output: &Output) -> Result<()> {
    output.print_themes(&builtin_themes(), &store.settings().current_theme().name);
    Ok(())
}

/// Restore default settings
pub fn reset(store: &mut Store, output: &Output) -> Result<()> {
    store.settings_mut().reset();
    output.success("Settings reset to defaults");
    Ok(())
}

/// Build the patch for `key = value`
///
/// `color.<slot>` sets one palette override; `none` or an empty value
/// removes it.
fn patch_for(current: &Settings, key: &str, value: &str) -> Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();

    match key {
        "theme" => patch.theme = Some(parse_theme_name(value)?),
        "accent_color" | "accent" => patch.accent_color = Some(parse_hex_color(value)?),
        "animations" => {
            patch.animations = Some(
                value
                    .trim()
                    .parse()
                    .context("Invalid value for animations. Use 'true' or 'false'.")?,
            );
        }
        "compact_mode" => {
            patch.compact_mode = Some(
                value
                    .trim()
                    .parse()
                    .context("Invalid value for compact_mode. Use 'true' or 'false'.")?,
            );
        }
        _ => {
            let Some(slot) = key.strip_prefix("color.") else {
                bail!(
                    "Unknown settings key: '{}'\n\
                     Valid keys: theme, accent_color, animations, compact_mode, color.<slot>",
                    key
                );
            };

            let color = match value.trim() {
                "" | "none" => None,
                other => Some(parse_hex_color(other)?),
            };

            let mut overrides = current.custom_colors.clone().unwrap_or_default();
            let Some(target) = overrides.slot_mut(slot) else {
                bail!(
                    "Unknown color slot: '{}'\nValid slots: {}",
                    slot,
                    COLOR_SLOTS.join(", ")
                );
            };
            *target = color;

            patch.custom_colors = Some(if overrides.is_empty() {
                None
            } else {
                Some(overrides)
            });
        }
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use nekolinks_core::{Config, LocalStorage};

    #[test]
    fn test_patch_theme_and_accent() {
        let settings = Settings::default();

        let patch = patch_for(&settings, "theme", "Sakura Night").unwrap();
        assert_eq!(patch.theme.as_deref(), Some("Sakura Night"));

        let patch = patch_for(&settings, "accent", "#abc").unwrap();
        assert_eq!(patch.accent_color.as_deref(), Some("#ABC"));

        assert!(patch_for(&settings, "theme", "Unknown").is_err());
        assert!(patch_for(&settings, "accent_color", "pink").is_err());
    }

    #[test]
    fn test_patch_booleans() {
        let settings = Settings::default();
        let patch = patch_for(&settings, "compact_mode", "true").unwrap();
        assert_eq!(patch.compact_mode, Some(true));
        assert!(patch_for(&settings, "animations", "yes").is_err());
    }

    #[test]
    fn test_patch_color_slot_set_and_clear() {
        let mut settings = Settings::default();

        let patch = patch_for(&settings, "color.textSecondary", "#101010").unwrap();
        settings.apply(patch);
        let overrides = settings.custom_colors.clone().unwrap();
        assert_eq!(overrides.text_secondary.as_deref(), Some("#101010"));

        // Clearing the last override drops the whole record
        let patch = patch_for(&settings, "color.text_secondary", "none").unwrap();
        assert_eq!(patch.custom_colors, Some(None));
    }

    #[test]
    fn test_patch_unknown_keys() {
        let settings = Settings::default();
        assert!(patch_for(&settings, "font", "mono").is_err());
        assert!(patch_for(&settings, "color.border", "#000000").is_err());
    }

    #[test]
    fn test_set_and_reset() {
        let mut store = Store::with_storage(LocalStorage::in_memory(), Config::default());
        let output = Output::new(OutputFormat::Quiet);

        set(&mut store, "theme".into(), "Purple Dream".into(), &output).unwrap();
        assert_eq!(store.settings().current_theme().name, "Purple Dream");

        reset(&mut store, &output).unwrap();
        assert_eq!(store.settings().settings(), &Settings::default());
    }
}
