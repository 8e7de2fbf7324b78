//! Data models for NekoLinks
//!
//! Defines the stored records: Link, Anime, and Settings, plus the draft
//! and patch types used to create and update them. Field names serialize
//! in camelCase so the stored JSON documents keep their established layout.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::forms::FormError;
use crate::theme::{ColorOverrides, DEFAULT_ACCENT, DEFAULT_THEME};

// ==================== Links ====================

/// A saved bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique identifier
    pub id: Uuid,
    /// The bookmarked address
    pub url: String,
    /// Display title (fetched from page metadata or derived from the URL)
    pub title: String,
    /// Favicon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Tags for organization (case-sensitive)
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When this link was created
    pub created_at: DateTime<Utc>,
    /// When this link was last updated
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkDraft {
    pub url: String,
    pub title: String,
    pub favicon: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub notes: Option<String>,
}

impl LinkDraft {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a link
///
/// `None` leaves a field untouched. For optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub favicon: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl LinkPatch {
    /// Whether applying this patch would change no field
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Link {
    /// Create a link from a draft with a fresh ID
    ///
    /// Both timestamps are taken from the same instant.
    pub fn from_draft(draft: LinkDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: draft.url,
            title: draft.title,
            favicon: draft.favicon,
            image_url: draft.image_url,
            tags: draft.tags,
            is_favorite: draft.is_favorite,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this link and refresh `updated_at`
    pub fn apply(&mut self, patch: LinkPatch) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(favicon) = patch.favicon {
            self.favicon = favicon;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(is_favorite) = patch.is_favorite {
            self.is_favorite = is_favorite;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = Utc::now();
    }

    /// Whether this link carries `tag` (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// ==================== Anime ====================

/// Watch status of an anime entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimeStatus {
    Watching,
    Completed,
    PlanToWatch,
    OnHold,
    Dropped,
}

impl AnimeStatus {
    /// All statuses in display order
    pub const ALL: [AnimeStatus; 5] = [
        Self::Watching,
        Self::Completed,
        Self::PlanToWatch,
        Self::OnHold,
        Self::Dropped,
    ];

    /// Stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::Completed => "completed",
            Self::PlanToWatch => "plan-to-watch",
            Self::OnHold => "on-hold",
            Self::Dropped => "dropped",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Watching => "Watching",
            Self::Completed => "Completed",
            Self::PlanToWatch => "Plan to Watch",
            Self::OnHold => "On Hold",
            Self::Dropped => "Dropped",
        }
    }
}

impl Default for AnimeStatus {
    fn default() -> Self {
        Self::PlanToWatch
    }
}

impl fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimeStatus {
    type Err = FormError;

    /// Accepts the stored form (`on-hold`) and snake/space variants
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| FormError::UnknownStatus(s.to_string()))
    }
}

/// A watch-progress record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    /// Unique identifier
    pub id: Uuid,
    pub title: String,
    /// Episodes watched so far
    #[serde(default)]
    pub current_episode: u32,
    /// Known episode count, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub status: AnimeStatus,
    /// Intended range 1-10; not enforced here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
    /// When this entry was last updated
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new anime entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimeDraft {
    pub title: String,
    pub current_episode: u32,
    pub total_episodes: Option<u32>,
    pub status: AnimeStatus,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

impl AnimeDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an anime entry
///
/// Same conventions as [`LinkPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimePatch {
    pub title: Option<String>,
    pub current_episode: Option<u32>,
    pub total_episodes: Option<Option<u32>>,
    pub status: Option<AnimeStatus>,
    pub rating: Option<Option<i32>>,
    pub notes: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl AnimePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Anime {
    /// Create an entry from a draft with a fresh ID
    pub fn from_draft(draft: AnimeDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            current_episode: draft.current_episode,
            total_episodes: draft.total_episodes,
            status: draft.status,
            rating: draft.rating,
            notes: draft.notes,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this entry and refresh `updated_at`
    ///
    /// Never changes `status` on its own; only an explicit status does.
    pub fn apply(&mut self, patch: AnimePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(current_episode) = patch.current_episode {
            self.current_episode = current_episode;
        }
        if let Some(total_episodes) = patch.total_episodes {
            self.total_episodes = total_episodes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
    }

    /// Whether progress has reached the known total
    pub fn is_saturated(&self) -> bool {
        matches!(self.total_episodes, Some(total) if self.current_episode >= total)
    }

    /// Progress through the series as a percentage, capped at 100
    pub fn progress_percent(&self) -> Option<f64> {
        match self.total_episodes {
            Some(total) if total > 0 => {
                Some((f64::from(self.current_episode) / f64::from(total) * 100.0).min(100.0))
            }
            _ => None,
        }
    }
}

// ==================== Settings ====================

/// User preferences (a single record)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name of a built-in theme
    pub theme: String,
    /// Replaces the theme's accent color
    pub accent_color: String,
    /// Per-slot overrides applied last
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<ColorOverrides>,
    pub animations: bool,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            accent_color: DEFAULT_ACCENT.to_string(),
            custom_colors: None,
            animations: true,
            compact_mode: false,
        }
    }
}

/// Partial update for settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<String>,
    pub accent_color: Option<String>,
    pub custom_colors: Option<Option<ColorOverrides>>,
    pub animations: Option<bool>,
    pub compact_mode: Option<bool>,
}

impl Settings {
    /// Merge a patch into these settings
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(accent_color) = patch.accent_color {
            self.accent_color = accent_color;
        }
        if let Some(custom_colors) = patch.custom_colors {
            self.custom_colors = custom_colors;
        }
        if let Some(animations) = patch.animations {
            self.animations = animations;
        }
        if let Some(compact_mode) = patch.compact_mode {
            self.compact_mode = compact_mode;
        }
    }
}
