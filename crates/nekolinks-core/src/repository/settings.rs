//! Settings repository
//!
//! Holds the single preferences record. The current theme is resolved from
//! it on every call, so it can never go stale.

use crate::models::{Settings, SettingsPatch};
use crate::storage::LocalStorage;
use crate::theme::{resolve_theme, Theme};

#[derive(Debug)]
pub struct SettingsRepository {
    settings: Settings,
    storage: LocalStorage,
    revision: u64,
}

impl SettingsRepository {
    /// Storage key holding the JSON settings record
    pub const STORAGE_KEY: &'static str = "nekolinks-settings";

    /// Load stored settings, or defaults if none are usable
    pub fn load(storage: LocalStorage) -> Self {
        let settings = storage.read(Self::STORAGE_KEY, Settings::default());
        Self {
            settings,
            storage,
            revision: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge `patch` into the settings and persist
    pub fn update(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
        self.persist();
    }

    /// Restore default settings and persist
    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    /// Theme derived from the current settings
    pub fn current_theme(&self) -> Theme {
        resolve_theme(&self.settings)
    }

    fn persist(&mut self) {
        self.revision += 1;
        self.storage.write(Self::STORAGE_KEY, &self.settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{builtin_themes, ColorOverrides};

    #[test]
    fn test_load_defaults() {
        let repo = SettingsRepository::load(LocalStorage::in_memory());
        assert_eq!(repo.settings(), &Settings::default());
        assert_eq!(repo.current_theme(), builtin_themes()[0]);
    }

    #[test]
    fn test_update_persists_and_changes_theme() {
        let storage = LocalStorage::in_memory();
        let mut repo = SettingsRepository::load(storage.clone());

        repo.update(SettingsPatch {
            theme: Some("Sakura Night".to_string()),
            accent_color: Some("#00FF00".to_string()),
            ..SettingsPatch::default()
        });

        let theme = repo.current_theme();
        assert_eq!(theme.name, "Sakura Night");
        assert_eq!(theme.colors.accent, "#00FF00");
        assert_eq!(repo.revision(), 1);

        let reloaded = SettingsRepository::load(storage);
        assert_eq!(reloaded.settings(), repo.settings());
    }

    #[test]
    fn test_custom_colors_roundtrip() {
        let storage = LocalStorage::in_memory();
        let mut repo = SettingsRepository::load(storage.clone());
        repo.update(SettingsPatch {
            custom_colors: Some(Some(ColorOverrides {
                background: Some("#101010".to_string()),
                ..ColorOverrides::default()
            })),
            ..SettingsPatch::default()
        });

        let reloaded = SettingsRepository::load(storage);
        assert_eq!(reloaded.current_theme().colors.background, "#101010");
    }

    #[test]
    fn test_reset() {
        let storage = LocalStorage::in_memory();
        let mut repo = SettingsRepository::load(storage.clone());
        repo.update(SettingsPatch {
            compact_mode: Some(true),
            ..SettingsPatch::default()
        });

        repo.reset();
        assert_eq!(repo.settings(), &Settings::default());
        assert_eq!(
            SettingsRepository::load(storage).settings(),
            &Settings::default()
        );
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let storage = LocalStorage::in_memory();
        storage
            .backend()
            .set(SettingsRepository::STORAGE_KEY, "undefined")
            .unwrap();

        let repo = SettingsRepository::load(storage.clone());
        assert_eq!(repo.settings(), &Settings::default());
        assert!(storage
            .backend()
            .get(SettingsRepository::STORAGE_KEY)
            .unwrap()
            .is_none());
    }
}
