//! Form input parsing
//!
//! Turns raw user input into validated values before anything reaches a
//! repository. A rejected field means the command is not dispatched.

use thiserror::Error;
use url::Url;

use crate::theme::find_theme;

/// Highest accepted rating
pub const MAX_RATING: i32 = 10;

/// Input rejected before any repository call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Invalid URL: '{0}'. Use an absolute URL such as https://example.com")]
    InvalidUrl(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Rating must be a whole number from 1 to 10, got '{0}'")]
    InvalidRating(String),

    #[error("Episode count must be a whole number, got '{0}'")]
    InvalidEpisode(String),

    #[error("Total episodes must be a positive whole number, got '{0}'")]
    InvalidTotalEpisodes(String),

    #[error(
        "Unknown status '{0}'. Valid statuses: watching, completed, plan-to-watch, on-hold, dropped"
    )]
    UnknownStatus(String),

    #[error("Invalid color '{0}'. Use a hex color such as #F472B6")]
    InvalidColor(String),

    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}

/// Whether `input` parses as an absolute URL
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Validate a URL, returning it trimmed
pub fn parse_url(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !is_valid_url(trimmed) {
        return Err(FormError::InvalidUrl(input.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Host part of a URL, if it has one
pub fn url_host(input: &str) -> Option<String> {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
}

/// Require a non-blank title, returning it trimmed
pub fn parse_title(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Split comma-separated tags
///
/// Tags are trimmed and empty entries dropped. Exact duplicates are
/// removed (first occurrence wins); case is preserved, so `Rust` and
/// `rust` are different tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse an optional rating; empty input means no rating
pub fn parse_rating(input: &str) -> Result<Option<i32>, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i32>() {
        Ok(rating) if (1..=MAX_RATING).contains(&rating) => Ok(Some(rating)),
        _ => Err(FormError::InvalidRating(input.to_string())),
    }
}

/// Parse a watched-episode count
pub fn parse_episode(input: &str) -> Result<u32, FormError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| FormError::InvalidEpisode(input.to_string()))
}

/// Parse an optional episode total; empty input means unknown
pub fn parse_total_episodes(input: &str) -> Result<Option<u32>, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(total) if total > 0 => Ok(Some(total)),
        _ => Err(FormError::InvalidTotalEpisodes(input.to_string())),
    }
}

/// Validate a `#RGB` or `#RRGGBB` color, returning it uppercased
pub fn parse_hex_color(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    let valid = trimmed
        .strip_prefix('#')
        .filter(|hex| matches!(hex.len(), 3 | 6))
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(FormError::InvalidColor(input.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Require the name of a built-in theme
pub fn parse_theme_name(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    find_theme(trimmed)
        .map(|theme| theme.name)
        .ok_or_else(|| FormError::UnknownTheme(input.to_string()))
}

/// Treat empty input as "no value"
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://localhost:8080/path?q=1"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url(""));

        assert_eq!(
            parse_url("  https://example.com  ").unwrap(),
            "https://example.com"
        );
        assert!(matches!(parse_url("nope"), Err(FormError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_host() {
        assert_eq!(
            url_host("https://docs.rs/serde/latest"),
            Some("docs.rs".to_string())
        );
        assert_eq!(url_host("mailto:someone@example.com"), None);
        assert_eq!(url_host("not a url"), None);
    }

    #[test]
    fn test_parse_title() {
        assert_eq!(parse_title("  Frieren ").unwrap(), "Frieren");
        assert_eq!(parse_title("   "), Err(FormError::EmptyTitle));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags("rust, cli , ,rust,Rust"),
            vec!["rust", "cli", "Rust"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("").unwrap(), None);
        assert_eq!(parse_rating(" 7 ").unwrap(), Some(7));
        assert_eq!(parse_rating("10").unwrap(), Some(10));
        assert!(parse_rating("0").is_err());
        assert!(parse_rating("11").is_err());
        assert!(parse_rating("great").is_err());
    }

    #[test]
    fn test_parse_episodes() {
        assert_eq!(parse_episode("3").unwrap(), 3);
        assert_eq!(parse_episode("4294967295").unwrap(), u32::MAX);
        assert!(parse_episode("4294967296").is_err());
        assert!(parse_episode("-1").is_err());

        assert_eq!(parse_total_episodes("").unwrap(), None);
        assert_eq!(parse_total_episodes("12").unwrap(), Some(12));
        assert!(parse_total_episodes("0").is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#f472b6").unwrap(), "#F472B6");
        assert_eq!(parse_hex_color("#abc").unwrap(), "#ABC");
        assert!(parse_hex_color("F472B6").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("#1234").is_err());
    }

    #[test]
    fn test_parse_theme_name() {
        assert_eq!(parse_theme_name("Sakura Night").unwrap(), "Sakura Night");
        assert!(matches!(
            parse_theme_name("sakura night"),
            Err(FormError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" note "), Some("note".to_string()));
    }
}
