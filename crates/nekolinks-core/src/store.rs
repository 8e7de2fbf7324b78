//! Unified storage interface
//!
//! The `Store` opens the key-value namespace once and hands the same
//! handle to every repository:
//! - Links (`nekolinks-links`)
//! - Anime (`nekolinks-anime`)
//! - Settings (`nekolinks-settings`)
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let link = store.links_mut().add(LinkDraft::new(url, title));
//! store.anime_mut().increment_episode(id);
//!
//! let theme = store.settings().current_theme();
//! ```

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::repository::{AnimeRepository, LinkRepository, SettingsRepository};
use crate::storage::LocalStorage;

/// All repositories over one storage namespace
#[derive(Debug)]
pub struct Store {
    links: LinkRepository,
    anime: AnimeRepository,
    settings: SettingsRepository,
    storage: LocalStorage,
    config: Config,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the file-backed store in `config.data_dir`
    pub fn open_with_config(config: Config) -> Result<Self> {
        let storage = LocalStorage::open(&config)
            .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))?;
        Ok(Self::with_storage(storage, config))
    }

    /// Build a store over an existing storage handle
    pub fn with_storage(storage: LocalStorage, config: Config) -> Self {
        let links = LinkRepository::load(storage.clone());
        let anime = AnimeRepository::load(storage.clone());
        let settings = SettingsRepository::load(storage.clone());
        debug!(
            "Store opened: {} link(s), {} anime",
            links.len(),
            anime.len()
        );

        Self {
            links,
            anime,
            settings,
            storage,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared storage handle
    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Check if nothing has been saved yet
    pub fn is_new(&self) -> bool {
        self.links.is_empty() && self.anime.is_empty()
    }

    // ==================== Repositories ====================

    pub fn links(&self) -> &LinkRepository {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut LinkRepository {
        &mut self.links
    }

    pub fn anime(&self) -> &AnimeRepository {
        &self.anime
    }

    pub fn anime_mut(&mut self) -> &mut AnimeRepository {
        &mut self.anime
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRepository {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnimeDraft, LinkDraft, SettingsPatch};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_file: None,
            fetch_metadata: false,
        }
    }

    #[test]
    fn test_open_new_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.is_new());
        assert_eq!(store.config().data_dir, temp_dir.path());
        assert_eq!(store.settings().current_theme().name, "Midnight Neko");
    }

    #[test]
    fn test_three_documents_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        store
            .links_mut()
            .add(LinkDraft::new("https://example.com", "Example"));
        store.anime_mut().add(AnimeDraft::new("Frieren"));
        store.settings_mut().update(SettingsPatch {
            compact_mode: Some(true),
            ..SettingsPatch::default()
        });

        for key in ["nekolinks-links", "nekolinks-anime", "nekolinks-settings"] {
            assert!(
                temp_dir.path().join(format!("{}.json", key)).exists(),
                "missing document for {}",
                key
            );
        }
    }

    #[test]
    fn test_reopen_preserves_data() {
        let temp_dir = TempDir::new().unwrap();

        let (link_id, anime_id) = {
            let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
            let link = store
                .links_mut()
                .add(LinkDraft::new("https://rust-lang.org", "Rust"));
            let anime = store.anime_mut().add(AnimeDraft::new("Mushishi"));
            store.links_mut().toggle_favorite(link.id);
            (link.id, anime.id)
        };

        let store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        assert!(!store.is_new());
        assert!(store.links().get(link_id).unwrap().is_favorite);
        assert_eq!(store.anime().get(anime_id).unwrap().title, "Mushishi");
    }

    #[test]
    fn test_corrupt_document_only_resets_its_collection() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
            store
                .links_mut()
                .add(LinkDraft::new("https://example.com", "Example"));
            store.anime_mut().add(AnimeDraft::new("Monster"));
        }
        std::fs::write(temp_dir.path().join("nekolinks-anime.json"), "not json").unwrap();

        let store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        assert_eq!(store.links().len(), 1);
        assert!(store.anime().is_empty());
        assert!(!temp_dir.path().join("nekolinks-anime.json").exists());
    }

    #[test]
    fn test_in_memory_store() {
        let mut store = Store::with_storage(LocalStorage::in_memory(), Config::default());
        store
            .links_mut()
            .add(LinkDraft::new("https://example.com", "Example"));
        assert_eq!(store.links().len(), 1);
    }
}
