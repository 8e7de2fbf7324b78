//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use nekolinks_core::{Anime, AnimeStatus, Link, Settings, Theme};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    // ==================== Links ====================

    /// Print a single link
    pub fn print_link(&self, link: &Link) {
        match self.format {
            OutputFormat::Human => {
                let star = if link.is_favorite { " ★" } else { "" };
                println!("ID:       {}", link.id);
                println!("Title:    {}{}", link.title, star);
                println!("URL:      {}", link.url);
                if !link.tags.is_empty() {
                    println!("Tags:     {}", link.tags.join(", "));
                }
                if let Some(ref favicon) = link.favicon {
                    println!("Favicon:  {}", favicon);
                }
                if let Some(ref image) = link.image_url {
                    println!("Image:    {}", image);
                }
                println!("Created:  {}", link.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", link.updated_at.format("%Y-%m-%d %H:%M"));
                if let Some(ref notes) = link.notes {
                    println!();
                    println!("── Notes ──");
                    println!("{}", notes);
                }
            }
            OutputFormat::Json => print_json(link),
            OutputFormat::Quiet => println!("{}", link.id),
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[Link]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    let star = if link.is_favorite { "★" } else { " " };
                    println!(
                        "{} {} | {} | {}",
                        short_id(&link.id),
                        star,
                        truncate(&link.title, 35),
                        truncate(&link.url, 45)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => print_json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(String, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    // ==================== Anime ====================

    /// Print a single anime entry
    pub fn print_anime(&self, anime: &Anime) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", anime.id);
                println!("Title:    {}", anime.title);
                println!("Status:   {}", anime.status.label());
                println!("Progress: {}", progress(anime));
                if let Some(rating) = anime.rating {
                    println!("Rating:   {}/10", rating);
                }
                if let Some(ref image) = anime.image_url {
                    println!("Image:    {}", image);
                }
                println!("Created:  {}", anime.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", anime.updated_at.format("%Y-%m-%d %H:%M"));
                if let Some(ref notes) = anime.notes {
                    println!();
                    println!("── Notes ──");
                    println!("{}", notes);
                }
            }
            OutputFormat::Json => print_json(anime),
            OutputFormat::Quiet => println!("{}", anime.id),
        }
    }

    /// Print a list of anime entries
    pub fn print_anime_list(&self, anime: &[Anime]) {
        match self.format {
            OutputFormat::Human => {
                if anime.is_empty() {
                    println!("No anime found.");
                    return;
                }
                for entry in anime {
                    let rating = entry
                        .rating
                        .map(|r| format!("{:>2}/10", r))
                        .unwrap_or_else(|| "  -  ".to_string());
                    println!(
                        "{} | {} | {:<13} | {:<14} | {}",
                        short_id(&entry.id),
                        pad(&truncate(&entry.title, 32), 32),
                        entry.status.label(),
                        progress(entry),
                        rating
                    );
                }
                println!("\n{} anime", anime.len());
            }
            OutputFormat::Json => print_json(anime),
            OutputFormat::Quiet => {
                for entry in anime {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print per-status counts
    pub fn print_status_counts(&self, counts: &[(AnimeStatus, usize)]) {
        match self.format {
            OutputFormat::Human => {
                let total: usize = counts.iter().map(|(_, count)| count).sum();
                for (status, count) in counts {
                    println!("{:<13} {}", status.label(), count);
                }
                println!("\n{} anime total", total);
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(status, count)| (status.as_str().to_string(), (*count).into()))
                    .collect();
                print_json(&map);
            }
            OutputFormat::Quiet => {
                for (status, count) in counts {
                    println!("{} {}", status.as_str(), count);
                }
            }
        }
    }

    // ==================== Settings ====================

    /// Print the stored settings and the theme they resolve to
    pub fn print_settings(&self, settings: &Settings, theme: &Theme) {
        match self.format {
            OutputFormat::Human => {
                println!("Settings:");
                println!("  theme:        {}", settings.theme);
                println!("  accent_color: {}", settings.accent_color);
                println!("  animations:   {}", settings.animations);
                println!("  compact_mode: {}", settings.compact_mode);
                if let Some(ref overrides) = settings.custom_colors {
                    if !overrides.is_empty() {
                        println!("  custom colors:");
                        for (slot, value) in overrides.iter() {
                            println!("    {:<14} {}", slot, value);
                        }
                    }
                }
                println!();
                print_theme(theme);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "settings": settings,
                "theme": theme,
            })),
            OutputFormat::Quiet => println!("{}", theme.name),
        }
    }

    /// Print the built-in themes
    pub fn print_themes(&self, themes: &[Theme], current: &str) {
        match self.format {
            OutputFormat::Human => {
                for theme in themes {
                    let marker = if theme.name == current { "*" } else { " " };
                    println!(
                        "{} {:<14} bg {}  surface {}  primary {}",
                        marker,
                        theme.name,
                        theme.colors.background,
                        theme.colors.surface,
                        theme.colors.primary
                    );
                }
            }
            OutputFormat::Json => print_json(themes),
            OutputFormat::Quiet => {
                for theme in themes {
                    println!("{}", theme.name);
                }
            }
        }
    }

    // ==================== Messages ====================

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_theme(theme: &Theme) {
    let colors = &theme.colors;
    println!("Resolved theme: {}", theme.name);
    println!("  background:     {}", colors.background);
    println!("  surface:        {}", colors.surface);
    println!("  primary:        {}", colors.primary);
    println!("  secondary:      {}", colors.secondary);
    println!("  accent:         {}", colors.accent);
    println!("  text:           {}", colors.text);
    println!("  textSecondary:  {}", colors.text_secondary);
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// Episode progress as `cur / total (pct%)`, or `cur / ?`
fn progress(anime: &Anime) -> String {
    match (anime.total_episodes, anime.progress_percent()) {
        (Some(total), Some(pct)) => {
            format!("{} / {} ({:.0}%)", anime.current_episode, total, pct)
        }
        (Some(total), None) => format!("{} / {}", anime.current_episode, total),
        _ => format!("{} / ?", anime.current_episode),
    }
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Right-pad to a character width
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}
