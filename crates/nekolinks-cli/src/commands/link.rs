//! Link command handlers

use anyhow::{anyhow, bail, Result};
use uuid::Uuid;

use nekolinks_core::forms::{optional_text, parse_tags, parse_title, parse_url};
use nekolinks_core::{project_links, LinkDraft, LinkPatch, LinkQuery, LinkSort, Store};

use crate::metadata::{fetch_metadata, LinkMetadata};
use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default};

/// Raw `link add` arguments
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub url: String,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub offline: bool,
}

/// Raw `link edit` arguments; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct LinkEdits {
    pub url: Option<String>,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl LinkEdits {
    fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.title.is_none()
            && self.tags.is_none()
            && self.notes.is_none()
            && self.image.is_none()
    }

    /// Validate the edits into a patch
    ///
    /// An empty `notes` or `image` clears that field.
    fn into_patch(self) -> Result<LinkPatch> {
        Ok(LinkPatch {
            url: self.url.as_deref().map(parse_url).transpose()?,
            title: self.title.as_deref().map(parse_title).transpose()?,
            tags: self.tags.as_deref().map(parse_tags),
            notes: self.notes.as_deref().map(optional_text),
            image_url: self.image.as_deref().map(parse_image_url).transpose()?,
            ..LinkPatch::default()
        })
    }
}

/// Create a new link
pub async fn create(store: &mut Store, input: NewLink, output: &Output) -> Result<()> {
    let url = parse_url(&input.url)?;

    let metadata = if input.offline || !store.config().fetch_metadata {
        LinkMetadata::fallback(&url)
    } else {
        fetch_metadata(&url).await
    };

    let draft = build_draft(url, input, metadata)?;
    let link = store.links_mut().add(draft);

    output.success(&format!("Created link: {}", link.id));
    output.print_link(&link);

    Ok(())
}

/// Turn validated input plus fetched metadata into a draft
///
/// A blank title takes the metadata title.
fn build_draft(url: String, input: NewLink, metadata: LinkMetadata) -> Result<LinkDraft> {
    let title = input
        .title
        .as_deref()
        .and_then(optional_text)
        .unwrap_or(metadata.title);

    let image_url = input
        .image
        .as_deref()
        .map(parse_image_url)
        .transpose()?
        .flatten();

    Ok(LinkDraft {
        url,
        title,
        favicon: metadata.favicon,
        image_url,
        tags: input.tags.as_deref().map(parse_tags).unwrap_or_default(),
        is_favorite: false,
        notes: input.notes.as_deref().and_then(optional_text),
    })
}

/// List links, filtered and sorted
pub fn list(
    store: &Store,
    search: Option<String>,
    tag: Option<String>,
    sort: LinkSort,
    output: &Output,
) -> Result<()> {
    let query = LinkQuery {
        search: search.unwrap_or_default(),
        tag,
        sort,
    };

    let links = project_links(store.links().all(), &query);
    output.print_links(&links);
    Ok(())
}

/// Show a single link
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let uuid = parse_link_id(&id, store)?;

    let link = store
        .links()
        .get(uuid)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;

    output.print_link(link);
    Ok(())
}

/// Edit a link from flags, or interactively when no flag is given
pub fn edit(store: &mut Store, id: String, edits: LinkEdits, output: &Output) -> Result<()> {
    let uuid = parse_link_id(&id, store)?;

    let link = store
        .links()
        .get(uuid)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;

    let edits = if edits.is_empty() {
        prompt_edits(link)?
    } else {
        edits
    };

    let patch = edits.into_patch()?;
    if patch.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    store.links_mut().update(uuid, patch);

    output.success("Link updated");
    if let Some(link) = store.links().get(uuid) {
        output.print_link(link);
    }

    Ok(())
}

fn prompt_edits(link: &nekolinks_core::Link) -> Result<LinkEdits> {
    println!("Editing link: {}", link.id);
    println!("Press Enter to keep current value, or type new value.");
    println!("Enter '-' to clear notes or image.\n");

    let clearable = |value: Option<String>| value.map(|v| if v == "-" { String::new() } else { v });

    Ok(LinkEdits {
        title: prompt_with_default("Title", &link.title)?,
        url: prompt_with_default("URL", &link.url)?,
        tags: prompt_with_default("Tags (comma-separated)", &link.tags.join(", "))?,
        notes: clearable(prompt_with_default(
            "Notes",
            link.notes.as_deref().unwrap_or(""),
        )?),
        image: clearable(prompt_with_default(
            "Image URL",
            link.image_url.as_deref().unwrap_or(""),
        )?),
    })
}

/// Toggle the favorite flag
pub fn favorite(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let uuid = parse_link_id(&id, store)?;

    if !store.links_mut().toggle_favorite(uuid) {
        bail!("Link not found: {}", id);
    }

    let link = store
        .links()
        .get(uuid)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;
    let state = if link.is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    output.success(&format!("{}: {}", state, link.title));

    Ok(())
}

/// Delete a link
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let uuid = parse_link_id(&id, store)?;

    let link = store
        .links()
        .get(uuid)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;

    // Confirm deletion
    if !yes && output.should_prompt() {
        println!("Delete link: {} - {}", link.id, link.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.links_mut().delete(uuid);

    output.success(&format!("Deleted link: {}", uuid));

    Ok(())
}

/// Parse a link ID (supports full UUID or prefix)
fn parse_link_id(id: &str, store: &Store) -> Result<Uuid> {
    let candidates = store
        .links()
        .find_by_prefix(id)
        .into_iter()
        .map(|l| (l.id, l.title.as_str()))
        .collect();
    super::resolve_id(id, "link", candidates)
}

/// Empty input clears the image; anything else must be a URL
fn parse_image_url(input: &str) -> Result<Option<String>> {
    match optional_text(input) {
        Some(url) => Ok(Some(parse_url(&url)?)),
        None => Ok(None),
    }
}
