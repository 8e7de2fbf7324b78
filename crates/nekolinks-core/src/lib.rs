//! NekoLinks Core Library
//!
//! This crate provides the core functionality for NekoLinks, a local
//! bookmark collection and anime watch tracker.
//!
//! # Architecture
//!
//! - **Storage**: one JSON document per key in a local key-value namespace
//! - **Repositories**: in-memory collections that write themselves back
//!   after every mutation
//! - **Projections**: pure filter/sort views over a collection
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let storage = LocalStorage::open(&config)?;
//!
//! let mut links = LinkRepository::load(storage.clone());
//! let link = links.add(LinkDraft::new("https://example.com", "Example"));
//! links.toggle_favorite(link.id);
//!
//! let shown = project_links(links.all(), &LinkQuery::default());
//! ```
//!
//! # Modules
//!
//! - `storage`: key-value backends and the JSON adapter
//! - `repository`: links, anime, and settings repositories
//! - `models`: records, drafts, and patches
//! - `theme`: built-in palettes and theme resolution
//! - `projection`: search, filter, and sort
//! - `forms`: validation of raw user input
//! - `store`: all repositories over one storage namespace
//! - `config`: application configuration

pub mod config;
pub mod forms;
pub mod models;
pub mod projection;
pub mod repository;
pub mod storage;
pub mod store;
pub mod theme;

pub use config::Config;
pub use forms::FormError;
pub use models::{
    Anime, AnimeDraft, AnimePatch, AnimeStatus, Link, LinkDraft, LinkPatch, Settings,
    SettingsPatch,
};
pub use projection::{project_anime, project_links, AnimeQuery, AnimeSort, LinkQuery, LinkSort};
pub use repository::{AnimeRepository, LinkRepository, SettingsRepository};
pub use storage::{LocalStorage, StorageError};
pub use store::Store;
pub use theme::{builtin_themes, resolve_theme, ColorOverrides, Palette, Theme};
