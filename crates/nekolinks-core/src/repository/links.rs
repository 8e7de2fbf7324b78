//! Links repository
//!
//! CRUD and favorite toggling over the bookmark collection, persisted
//! under [`LinkRepository::STORAGE_KEY`].

use uuid::Uuid;

use crate::models::{Link, LinkDraft, LinkPatch};
use crate::repository::Collection;
use crate::storage::LocalStorage;

/// In-memory link collection backed by `LocalStorage`
#[derive(Debug)]
pub struct LinkRepository {
    links: Collection<Link>,
}

impl LinkRepository {
    /// Storage key holding the JSON list of links
    pub const STORAGE_KEY: &'static str = "nekolinks-links";

    /// Load the collection, starting empty if nothing usable is stored
    pub fn load(storage: LocalStorage) -> Self {
        Self {
            links: Collection::load(storage, Self::STORAGE_KEY),
        }
    }

    /// All links in insertion order
    pub fn all(&self) -> &[Link] {
        self.links.items()
    }

    /// Get a link by ID
    pub fn get(&self, id: Uuid) -> Option<&Link> {
        self.links.get(id)
    }

    /// Links whose ID starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Link> {
        self.links.find_by_prefix(prefix)
    }

    pub fn len(&self) -> usize {
        self.links.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.items().is_empty()
    }

    /// Counter bumped on every mutation
    pub fn revision(&self) -> u64 {
        self.links.revision()
    }

    /// Add a new link and return it
    pub fn add(&mut self, draft: LinkDraft) -> Link {
        let link = Link::from_draft(draft);
        self.links.push(link.clone());
        link
    }

    /// Merge `patch` into the link with `id`
    pub fn update(&mut self, id: Uuid, patch: LinkPatch) -> bool {
        self.links.modify(id, |link| link.apply(patch))
    }

    /// Delete the link with `id`
    pub fn delete(&mut self, id: Uuid) -> bool {
        self.links.remove(id)
    }

    /// Flip the favorite flag of the link with `id`
    pub fn toggle_favorite(&mut self, id: Uuid) -> bool {
        let Some(current) = self.get(id).map(|link| link.is_favorite) else {
            return false;
        };
        self.update(
            id,
            LinkPatch {
                is_favorite: Some(!current),
                ..LinkPatch::default()
            },
        )
    }

    /// Distinct tags in first-seen order with the number of links using each
    pub fn tags_with_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for link in self.all() {
            for tag in &link.tags {
                match counts.iter_mut().find(|(name, _)| name == tag) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((tag.clone(), 1)),
                }
            }
        }
        counts
    }

    /// Distinct tags in first-seen order
    pub fn all_tags(&self) -> Vec<String> {
        self.tags_with_counts()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileBackend, MemoryBackend};
    use tempfile::TempDir;

    fn draft(url: &str, title: &str) -> LinkDraft {
        LinkDraft::new(url, title)
    }

    fn stored_links(storage: &LocalStorage) -> Vec<Link> {
        storage.read(LinkRepository::STORAGE_KEY, Vec::new())
    }

    #[test]
    fn test_add_persists_with_equal_timestamps() {
        let storage = LocalStorage::in_memory();
        let mut repo = LinkRepository::load(storage.clone());

        let a = repo.add(draft("https://a.example", "A"));
        let b = repo.add(draft("https://b.example", "B"));

        let stored = stored_links(&storage);
        assert_eq!(stored, vec![a.clone(), b.clone()]);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_nil());
        assert_eq!(stored[0].created_at, stored[0].updated_at);
        assert_eq!(repo.revision(), 2);
    }

    #[test]
    fn test_load_existing_collection() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(FileBackend::open(temp_dir.path()).unwrap());

        let id = {
            let mut repo = LinkRepository::load(storage.clone());
            repo.add(draft("https://rust-lang.org", "Rust")).id
        };

        let reopened = LinkRepository::load(storage);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(id).unwrap().title, "Rust");
    }

    #[test]
    fn test_update_merges_and_touches() {
        let storage = LocalStorage::in_memory();
        let mut repo = LinkRepository::load(storage.clone());
        let link = repo.add(draft("https://example.com", "Example"));
        std::thread::sleep(std::time::Duration::from_millis(10));

        let changed = repo.update(
            link.id,
            LinkPatch {
                tags: Some(vec!["web".to_string()]),
                ..LinkPatch::default()
            },
        );

        assert!(changed);
        let stored = &stored_links(&storage)[0];
        assert_eq!(stored.tags, vec!["web"]);
        assert_eq!(stored.title, "Example");
        assert_eq!(stored.created_at, link.created_at);
        assert!(stored.updated_at > link.updated_at);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let storage = LocalStorage::in_memory();
        let mut repo = LinkRepository::load(storage.clone());
        repo.add(draft("https://example.com", "Example"));
        let before = repo.all().to_vec();
        let revision = repo.revision();
        let missing = Uuid::new_v4();

        assert!(!repo.update(
            missing,
            LinkPatch {
                title: Some("x".to_string()),
                ..LinkPatch::default()
            }
        ));
        assert!(!repo.delete(missing));
        assert!(!repo.toggle_favorite(missing));

        assert_eq!(repo.all(), before.as_slice());
        assert_eq!(stored_links(&storage), before);
        assert_eq!(repo.revision(), revision);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let storage = LocalStorage::in_memory();
        let mut repo = LinkRepository::load(storage.clone());
        let keep = repo.add(draft("https://keep.example", "Keep"));
        let gone = repo.add(draft("https://gone.example", "Gone"));

        assert!(repo.delete(gone.id));
        let after_first = stored_links(&storage);
        assert!(!repo.delete(gone.id));

        assert_eq!(stored_links(&storage), after_first);
        assert_eq!(repo.all(), &[keep]);
    }

    #[test]
    fn test_toggle_favorite() {
        let storage = LocalStorage::in_memory();
        let mut repo = LinkRepository::load(storage.clone());
        let link = repo.add(draft("https://example.com", "Example"));

        assert!(repo.toggle_favorite(link.id));
        assert!(repo.get(link.id).unwrap().is_favorite);
        assert!(stored_links(&storage)[0].is_favorite);

        assert!(repo.toggle_favorite(link.id));
        assert!(!repo.get(link.id).unwrap().is_favorite);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = LocalStorage::new(MemoryBackend::with_quota(16));
        let mut repo = LinkRepository::load(storage.clone());

        let link = repo.add(draft("https://example.com/a/long/path", "Too big to store"));

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(link.id).unwrap().title, "Too big to store");
        assert!(stored_links(&storage).is_empty());
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let storage = LocalStorage::in_memory();
        storage
            .backend()
            .set(LinkRepository::STORAGE_KEY, "[{broken")
            .unwrap();

        let repo = LinkRepository::load(storage.clone());
        assert!(repo.is_empty());
        assert!(storage
            .backend()
            .get(LinkRepository::STORAGE_KEY)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_by_prefix() {
        let mut repo = LinkRepository::load(LocalStorage::in_memory());
        let link = repo.add(draft("https://example.com", "Example"));
        let prefix = &link.id.to_string()[..8];

        let matches = repo.find_by_prefix(prefix);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, link.id);
        assert_eq!(repo.find_by_prefix(&prefix.to_uppercase()).len(), 1);
    }

    #[test]
    fn test_tags_with_counts() {
        let mut repo = LinkRepository::load(LocalStorage::in_memory());
        let mut first = draft("https://a.example", "A");
        first.tags = vec!["rust".to_string(), "cli".to_string()];
        let mut second = draft("https://b.example", "B");
        second.tags = vec!["rust".to_string(), "Rust".to_string()];
        repo.add(first);
        repo.add(second);

        assert_eq!(
            repo.tags_with_counts(),
            vec![
                ("rust".to_string(), 2),
                ("cli".to_string(), 1),
                ("Rust".to_string(), 1)
            ]
        );
        assert_eq!(repo.all_tags(), vec!["rust", "cli", "Rust"]);
    }
}
