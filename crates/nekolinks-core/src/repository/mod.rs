//! Repositories
//!
//! Each repository owns an in-memory collection loaded from `LocalStorage`
//! and writes the whole collection back after every effective mutation.
//! Commands on unknown IDs are no-ops and return `false`.
//!
//! Callers observe changes through `revision()`, which increases on every
//! mutation, and re-read snapshots with `all()`.

pub mod anime;
pub mod links;
pub mod settings;

pub use anime::AnimeRepository;
pub use links::LinkRepository;
pub use settings::SettingsRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::storage::LocalStorage;

/// A stored record with a stable identity
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> Uuid;
}

impl Record for crate::models::Link {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for crate::models::Anime {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Ordered list of records mirrored to one storage key
#[derive(Debug)]
pub(crate) struct Collection<T> {
    key: &'static str,
    items: Vec<T>,
    storage: LocalStorage,
    revision: u64,
}

impl<T: Record> Collection<T> {
    pub(crate) fn load(storage: LocalStorage, key: &'static str) -> Self {
        let items: Vec<T> = storage.read(key, Vec::new());
        debug!("Loaded {} record(s) from {}", items.len(), key);
        Self {
            key,
            items,
            storage,
            revision: 0,
        }
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Records whose ID starts with `prefix`
    pub(crate) fn find_by_prefix(&self, prefix: &str) -> Vec<&T> {
        let prefix = prefix.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.id().to_string().starts_with(&prefix))
            .collect()
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
        self.persist();
    }

    /// Run `f` on the record with `id`; persists only if it exists
    pub(crate) fn modify(&mut self, id: Uuid, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                self.persist();
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&mut self) {
        self.revision += 1;
        self.storage.write(self.key, &self.items);
    }
}
