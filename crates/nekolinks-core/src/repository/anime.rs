//! Anime repository
//!
//! CRUD over watch-progress records, plus episode increments. Incrementing
//! is the only operation that changes `status` on its own: reaching the
//! known episode total marks the entry completed, and progress never goes
//! past that total.

use tracing::debug;
use uuid::Uuid;

use crate::models::{Anime, AnimeDraft, AnimePatch, AnimeStatus};
use crate::repository::Collection;
use crate::storage::LocalStorage;

#[derive(Debug)]
pub struct AnimeRepository {
    anime: Collection<Anime>,
}

impl AnimeRepository {
    /// Storage key holding the JSON list of anime entries
    pub const STORAGE_KEY: &'static str = "nekolinks-anime";

    pub fn load(storage: LocalStorage) -> Self {
        Self {
            anime: Collection::load(storage, Self::STORAGE_KEY),
        }
    }

    pub fn all(&self) -> &[Anime] {
        self.anime.items()
    }

    pub fn get(&self, id: Uuid) -> Option<&Anime> {
        self.anime.get(id)
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Anime> {
        self.anime.find_by_prefix(prefix)
    }

    pub fn len(&self) -> usize {
        self.anime.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.anime.items().is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.anime.revision()
    }

    pub fn add(&mut self, draft: AnimeDraft) -> Anime {
        let anime = Anime::from_draft(draft);
        self.anime.push(anime.clone());
        anime
    }

    pub fn update(&mut self, id: Uuid, patch: AnimePatch) -> bool {
        self.anime.modify(id, |anime| anime.apply(patch))
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        self.anime.remove(id)
    }

    /// Record one more watched episode
    ///
    /// Returns `false` without changes when the entry is missing, already
    /// at its total, or at the largest representable episode.
    pub fn increment_episode(&mut self, id: Uuid) -> bool {
        let Some(anime) = self.get(id) else {
            return false;
        };
        if anime.is_saturated() {
            debug!("{} already at episode total, not incrementing", id);
            return false;
        }

        let Some(next) = anime.current_episode.checked_add(1) else {
            debug!("{} at maximum episode count, not incrementing", id);
            return false;
        };
        let status = match anime.total_episodes {
            Some(total) if next >= total => AnimeStatus::Completed,
            _ => anime.status,
        };

        self.update(
            id,
            AnimePatch {
                current_episode: Some(next),
                status: Some(status),
                ..AnimePatch::default()
            },
        )
    }

    /// Number of entries per status, in `AnimeStatus::ALL` order
    pub fn status_counts(&self) -> Vec<(AnimeStatus, usize)> {
        AnimeStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self.all().iter().filter(|a| a.status == status).count();
                (status, count)
            })
            .collect()
    }
}
