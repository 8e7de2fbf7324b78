//! View projections
//!
//! Pure filter-and-sort functions that derive the displayed list from a
//! repository's full collection. Inputs are never mutated; all sorts are
//! stable, so ties keep collection order.

use std::cmp::Ordering;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{Anime, AnimeStatus, Link};

/// Sort orders for links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkSort {
    /// Newest first, by creation time
    #[default]
    Date,
    /// Title, ascending, ignoring case; titles equal after case folding
    /// list lowercase first
    Name,
    /// Favorites first
    Favorites,
}

/// Sort orders for anime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimeSort {
    /// Most recently updated first
    #[default]
    Date,
    /// Title, ascending, ignoring case (same tie-break as links)
    Name,
    /// Highest rating first; unrated counts as 0
    Rating,
    /// Status string, ascending
    Status,
}

/// Rejected sort name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort order '{0}'")]
pub struct UnknownSort(pub String);

impl FromStr for LinkSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "favorites" | "favourites" => Ok(Self::Favorites),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

impl FromStr for AnimeSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "status" => Ok(Self::Status),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

/// Search, tag filter, and sort order for the link list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkQuery {
    pub search: String,
    pub tag: Option<String>,
    pub sort: LinkSort,
}

/// Search, status filter, and sort order for the anime list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimeQuery {
    pub search: String,
    pub status: Option<AnimeStatus>,
    pub sort: AnimeSort,
}

/// Filter and sort links
///
/// The search term matches case-insensitively against title, URL, and
/// tags. The tag filter is an exact, case-sensitive match.
pub fn project_links(links: &[Link], query: &LinkQuery) -> Vec<Link> {
    let needle = query.search.to_lowercase();
    let tag = query.tag.as_deref().filter(|t| !t.is_empty());

    let mut result: Vec<Link> = links
        .iter()
        .filter(|link| {
            needle.is_empty()
                || contains_folded(&link.title, &needle)
                || contains_folded(&link.url, &needle)
                || link.tags.iter().any(|t| contains_folded(t, &needle))
        })
        .filter(|link| tag.map_or(true, |tag| link.has_tag(tag)))
        .cloned()
        .collect();

    match query.sort {
        LinkSort::Date => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        LinkSort::Name => result.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        LinkSort::Favorites => result.sort_by(|a, b| b.is_favorite.cmp(&a.is_favorite)),
    }
    result
}

/// Filter and sort anime entries
///
/// The search term matches case-insensitively against title and notes.
pub fn project_anime(anime: &[Anime], query: &AnimeQuery) -> Vec<Anime> {
    let needle = query.search.to_lowercase();

    let mut result: Vec<Anime> = anime
        .iter()
        .filter(|item| {
            needle.is_empty()
                || contains_folded(&item.title, &needle)
                || item
                    .notes
                    .as_deref()
                    .is_some_and(|notes| contains_folded(notes, &needle))
        })
        .filter(|item| query.status.map_or(true, |status| item.status == status))
        .cloned()
        .collect();

    match query.sort {
        AnimeSort::Date => result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        AnimeSort::Name => result.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        AnimeSort::Rating => {
            result.sort_by(|a, b| b.rating.unwrap_or(0).cmp(&a.rating.unwrap_or(0)))
        }
        AnimeSort::Status => result.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
    }
    result
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

/// Case-insensitive title order
///
/// Titles equal after case folding put lowercase before uppercase.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        // Byte order puts uppercase first, so reverse it
        .then_with(|| b.cmp(a))
}
