//! Anime command handlers

use anyhow::{anyhow, Result};
use uuid::Uuid;

use nekolinks_core::forms::{
    optional_text, parse_episode, parse_rating, parse_title, parse_total_episodes, parse_url,
};
use nekolinks_core::{
    project_anime, Anime, AnimeDraft, AnimePatch, AnimeQuery, AnimeSort, AnimeStatus, Store,
};

use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default};

/// Raw `anime add` arguments
#[derive(Debug, Clone, Default)]
pub struct NewAnime {
    pub title: String,
    pub episode: Option<String>,
    pub total: Option<String>,
    pub status: Option<AnimeStatus>,
    pub rating: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl NewAnime {
    /// Validate into a draft; nothing is stored if this fails
    fn into_draft(self) -> Result<AnimeDraft> {
        Ok(AnimeDraft {
            title: parse_title(&self.title)?,
            current_episode: self
                .episode
                .as_deref()
                .map(parse_episode)
                .transpose()?
                .unwrap_or(0),
            total_episodes: self
                .total
                .as_deref()
                .map(parse_total_episodes)
                .transpose()?
                .flatten(),
            status: self.status.unwrap_or_default(),
            rating: self.rating.as_deref().map(parse_rating).transpose()?.flatten(),
            notes: self.notes.as_deref().and_then(optional_text),
            image_url: self
                .image
                .as_deref()
                .and_then(optional_text)
                .map(|url| parse_url(&url))
                .transpose()?,
        })
    }
}

/// Raw `anime edit` arguments; `None` keeps the current value
///
/// Empty `total`, `rating`, `notes`, or `image` clears that field.
#[derive(Debug, Clone, Default)]
pub struct AnimeEdits {
    pub title: Option<String>,
    pub episode: Option<String>,
    pub total: Option<String>,
    pub status: Option<AnimeStatus>,
    pub rating: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl AnimeEdits {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.episode.is_none()
            && self.total.is_none()
            && self.status.is_none()
            && self.rating.is_none()
            && self.notes.is_none()
            && self.image.is_none()
    }

    fn into_patch(self) -> Result<AnimePatch> {
        let image_url = match self.image.as_deref() {
            Some(input) => Some(
                optional_text(input)
                    .map(|url| parse_url(&url))
                    .transpose()?,
            ),
            None => None,
        };

        Ok(AnimePatch {
            title: self.title.as_deref().map(parse_title).transpose()?,
            current_episode: self.episode.as_deref().map(parse_episode).transpose()?,
            total_episodes: self
                .total
                .as_deref()
                .map(parse_total_episodes)
                .transpose()?,
            status: self.status,
            rating: self.rating.as_deref().map(parse_rating).transpose()?,
            notes: self.notes.as_deref().map(optional_text),
            image_url,
        })
    }
}

/// Add an anime entry
pub fn create(store: &mut Store, input: NewAnime, output: &Output) -> Result<()> {
    let draft = input.into_draft()?;
    let anime = store.anime_mut().add(draft);

    output.success(&format!("Added anime: {}", anime.id));
    output.print_anime(&anime);

    Ok(())
}

/// List anime, filtered and sorted
pub fn list(
    store: &Store,
    search: Option<String>,
    status: Option<AnimeStatus>,
    sort: AnimeSort,
    output: &Output,
) -> Result<()> {
    let query = AnimeQuery {
        search: search.unwrap_or_default(),
        status,
        sort,
    };

    let anime = project_anime(store.anime().all(), &query);
    output.print_anime_list(&anime);
    Ok(())
}

/// Show a single entry
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let uuid = parse_anime_id(&id, store)?;
    let anime = find(store, uuid, &id)?;
    output.print_anime(anime);
    Ok(())
}

/// Edit an entry from flags, or interactively when no flag is given
pub fn edit(store: &mut Store, id: String, edits: AnimeEdits, output: &Output) -> Result<()> {
    let uuid = parse_anime_id(&id, store)?;
    let anime = find(store, uuid, &id)?;

    let edits = if edits.is_empty() {
        prompt_edits(anime)?
    } else {
        edits
    };

    let patch = edits.into_patch()?;
    if patch.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    store.anime_mut().update(uuid, patch);

    output.success("Anime updated");
    output.print_anime(find(store, uuid, &id)?);

    Ok(())
}

fn prompt_edits(anime: &Anime) -> Result<AnimeEdits> {
    println!("Editing anime: {}", anime.id);
    println!("Press Enter to keep current value, or type new value.");
    println!("Enter '-' to clear total, rating, notes, or image.\n");

    let clearable = |value: Option<String>| value.map(|v| if v == "-" { String::new() } else { v });
    let status = prompt_with_default("Status", anime.status.as_str())?
        .map(|s| s.parse::<AnimeStatus>())
        .transpose()?;

    Ok(AnimeEdits {
        title: prompt_with_default("Title", &anime.title)?,
        episode: prompt_with_default("Current episode", &anime.current_episode.to_string())?,
        total: clearable(prompt_with_default(
            "Total episodes",
            &anime
                .total_episodes
                .map(|t| t.to_string())
                .unwrap_or_default(),
        )?),
        status,
        rating: clearable(prompt_with_default(
            "Rating (1-10)",
            &anime.rating.map(|r| r.to_string()).unwrap_or_default(),
        )?),
        notes: clearable(prompt_with_default(
            "Notes",
            anime.notes.as_deref().unwrap_or(""),
        )?),
        image: clearable(prompt_with_default(
            "Image URL",
            anime.image_url.as_deref().unwrap_or(""),
        )?),
    })
}

/// Mark one more episode watched
pub fn next(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let uuid = parse_anime_id(&id, store)?;
    let before = find(store, uuid, &id)?.status;

    if !store.anime_mut().increment_episode(uuid) {
        let anime = find(store, uuid, &id)?;
        output.message(&format!(
            "{} is already at episode {}",
            anime.title, anime.current_episode
        ));
        return Ok(());
    }

    let anime = find(store, uuid, &id)?;
    if before != AnimeStatus::Completed && anime.status == AnimeStatus::Completed {
        output.success(&format!("Finished {}!", anime.title));
    } else {
        output.success(&format!(
            "{}: episode {}",
            anime.title, anime.current_episode
        ));
    }
    output.print_anime(anime);

    Ok(())
}

/// Delete an entry
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let uuid = parse_anime_id(&id, store)?;
    let anime = find(store, uuid, &id)?;

    if !yes && output.should_prompt() {
        println!("Delete anime: {} - {}", anime.id, anime.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.anime_mut().delete(uuid);

    output.success(&format!("Deleted anime: {}", uuid));

    Ok(())
}

/// Show per-status counts
pub fn stats(store: &Store, output: &Output) -> Result<()> {
    output.print_status_counts(&store.anime().status_counts());
    Ok(())
}

fn find<'a>(store: &'a Store, uuid: Uuid, id: &str) -> Result<&'a Anime> {
    store
        .anime()
        .get(uuid)
        .ok_or_else(|| anyhow!("Anime not found: {}", id))
}

/// Parse an anime ID (supports full UUID or prefix)
fn parse_anime_id(id: &str, store: &Store) -> Result<Uuid> {
    let candidates = store
        .anime()
        .find_by_prefix(id)
        .into_iter()
        .map(|a| (a.id, a.title.as_str()))
        .collect();
    super::resolve_id(id, "anime", candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use nekolinks_core::{Config, LocalStorage};

    fn test_store() -> Store {
        Store::with_storage(LocalStorage::in_memory(), Config::default())
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_into_draft_defaults() {
        let draft = NewAnime {
            title: "  Frieren  ".to_string(),
            ..NewAnime::default()
        }
        .into_draft()
        .unwrap();

        assert_eq!(draft.title, "Frieren");
        assert_eq!(draft.current_episode, 0);
        assert_eq!(draft.total_episodes, None);
        assert_eq!(draft.status, AnimeStatus::PlanToWatch);
        assert_eq!(draft.rating, None);
    }

    #[test]
    fn test_into_draft_rejects_bad_input() {
        let blank = NewAnime {
            title: "   ".to_string(),
            ..NewAnime::default()
        };
        assert!(blank.into_draft().is_err());

        let rating = NewAnime {
            title: "Monster".to_string(),
            rating: Some("11".to_string()),
            ..NewAnime::default()
        };
        assert!(rating.into_draft().is_err());

        let episode = NewAnime {
            title: "Monster".to_string(),
            episode: Some("-1".to_string()),
            ..NewAnime::default()
        };
        assert!(episode.into_draft().is_err());
    }

    #[test]
    fn test_create_rejected_input_stores_nothing() {
        let mut store = test_store();
        let input = NewAnime {
            title: String::new(),
            ..NewAnime::default()
        };
        assert!(create(&mut store, input, &quiet()).is_err());
        assert!(store.anime().is_empty());
    }

    #[test]
    fn test_edits_clear_optional_fields() {
        let patch = AnimeEdits {
            total: Some(String::new()),
            rating: Some(String::new()),
            image: Some(String::new()),
            ..AnimeEdits::default()
        }
        .into_patch()
        .unwrap();

        assert_eq!(patch.total_episodes, Some(None));
        assert_eq!(patch.rating, Some(None));
        assert_eq!(patch.image_url, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn test_next_completes_then_stops() {
        let mut store = test_store();
        let input = NewAnime {
            title: "Mushishi".to_string(),
            episode: Some("25".to_string()),
            total: Some("26".to_string()),
            status: Some(AnimeStatus::Watching),
            ..NewAnime::default()
        };
        create(&mut store, input, &quiet()).unwrap();
        let id = store.anime().all()[0].id;

        next(&mut store, id.to_string(), &quiet()).unwrap();
        let anime = store.anime().get(id).unwrap();
        assert_eq!(anime.current_episode, 26);
        assert_eq!(anime.status, AnimeStatus::Completed);

        let revision = store.anime().revision();
        next(&mut store, id.to_string(), &quiet()).unwrap();
        assert_eq!(store.anime().get(id).unwrap().current_episode, 26);
        assert_eq!(store.anime().revision(), revision);
    }

    #[test]
    fn test_edit_and_delete() {
        let mut store = test_store();
        let anime = store.anime_mut().add(AnimeDraft::new("Monster"));

        let edits = AnimeEdits {
            rating: Some("9".to_string()),
            status: Some(AnimeStatus::OnHold),
            ..AnimeEdits::default()
        };
        edit(&mut store, anime.id.to_string(), edits, &quiet()).unwrap();

        let updated = store.anime().get(anime.id).unwrap();
        assert_eq!(updated.rating, Some(9));
        assert_eq!(updated.status, AnimeStatus::OnHold);

        delete(&mut store, anime.id.to_string()[..6].to_string(), true, &quiet()).unwrap();
        assert!(store.anime().is_empty());
    }
}
