//! URL metadata fetching
//!
//! Fetches a page title and favicon when adding links. Every failure
//! degrades to a title derived from the URL itself.

use anyhow::{bail, Result};
use nekolinks_core::forms::url_host;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Favicon service used when the page offers none
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Title and favicon resolved for a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMetadata {
    pub title: String,
    pub favicon: Option<String>,
}

impl LinkMetadata {
    /// Metadata derived from the URL alone
    ///
    /// The title is the host with a favicon-service icon, or the raw URL
    /// with no icon when there is no host.
    pub fn fallback(url: &str) -> Self {
        match url_host(url) {
            Some(host) => Self {
                favicon: Some(favicon_service_url(&host)),
                title: host,
            },
            None => Self {
                title: url.to_string(),
                favicon: None,
            },
        }
    }

    fn from_page(url: &str, page: PageMetadata) -> Self {
        let fallback = Self::fallback(url);
        let favicon = page
            .icon
            .or(page.image)
            .and_then(|href| absolutize(url, &href))
            .or(fallback.favicon);

        Self {
            title: page.title.unwrap_or(fallback.title),
            favicon,
        }
    }
}

/// Fields scraped from an HTML document
#[derive(Debug, Clone, Default)]
struct PageMetadata {
    title: Option<String>,
    icon: Option<String>,
    image: Option<String>,
}

/// Fetch metadata for a URL (async)
///
/// Never fails: network, status, and parse errors all yield the
/// URL-derived fallback.
pub async fn fetch_metadata(url: &str) -> LinkMetadata {
    match fetch_page(url).await {
        Ok(page) => LinkMetadata::from_page(url, page),
        Err(e) => {
            warn!("Metadata fetch failed for {}: {:#}", url, e);
            LinkMetadata::fallback(url)
        }
    }
}

async fn fetch_page(url: &str) -> Result<PageMetadata> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; NekoLinks/0.3)")
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }

    let html = response.text().await?;
    let page = parse_metadata(&html);
    debug!("Fetched metadata for {}: {:?}", url, page.title);
    Ok(page)
}

/// Parse metadata from HTML content
fn parse_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&document),
        icon: extract_icon(&document),
        image: extract_meta_content(&document, "og:image"),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    if let Some(og_title) = extract_meta_content(document, "og:title") {
        return Some(og_title);
    }

    if let Some(twitter_title) = extract_meta_content(document, "twitter:title") {
        return Some(twitter_title);
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First `<link rel="...icon...">` href, in document order
fn extract_icon(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel][href]").ok()?;
    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("rel")
                .map(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("icon"))
                })
                .unwrap_or(false)
        })
        .find_map(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Extract content from a meta tag by property or name
fn extract_meta_content(document: &Html, property: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let Ok(selector) = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, property)) else {
            continue;
        };
        let content = document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty());
        if let Some(content) = content {
            return Some(content.to_string());
        }
    }

    None
}

/// Resolve a possibly relative href against the page URL
fn absolutize(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

fn favicon_service_url(host: &str) -> String {
    format!("{}?domain={}&sz=64", FAVICON_SERVICE, host)
}
