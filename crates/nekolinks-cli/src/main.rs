//! NekoLinks CLI
//!
//! Command-line interface for NekoLinks - bookmarks and anime tracking.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nekolinks_core::{AnimeSort, AnimeStatus, Config, LinkSort, Store};

mod commands;
mod metadata;
mod output;
mod prompt;

use commands::anime::{AnimeEdits, NewAnime};
use commands::link::{LinkEdits, NewLink};
use output::{Output, OutputFormat};

/// Environment variable holding the log level
const LOG_ENV: &str = "NEKOLINKS_LOG";

#[derive(Parser)]
#[command(name = "nekolinks")]
#[command(about = "NekoLinks - bookmarks and anime watch tracking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Track anime
    Anime {
        #[command(subcommand)]
        command: AnimeCommands,
    },
    /// List all tags
    Tags,
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Save a new link
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Title (fetched from the page when omitted)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Preview image URL
        #[arg(long)]
        image: Option<String>,
        /// Skip fetching page metadata
        #[arg(long)]
        offline: bool,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Search title, URL, and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Sort order: date, name, favorites
        #[arg(long, default_value = "date")]
        sort: LinkSort,
    },
    /// Show link details
    Show {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Edit a link (interactive when no flag is given)
    Edit {
        /// Link ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,
        /// Notes (empty to clear)
        #[arg(short, long)]
        notes: Option<String>,
        /// Preview image URL (empty to clear)
        #[arg(long)]
        image: Option<String>,
    },
    /// Toggle favorite
    #[command(alias = "fav")]
    Favorite {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full UUID or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AnimeCommands {
    /// Add an anime
    #[command(alias = "create")]
    Add {
        title: String,
        /// Episodes watched so far
        #[arg(short, long)]
        episode: Option<String>,
        /// Total episode count
        #[arg(long)]
        total: Option<String>,
        /// watching, completed, plan-to-watch, on-hold, dropped
        #[arg(short, long)]
        status: Option<AnimeStatus>,
        /// Rating from 1 to 10
        #[arg(short, long)]
        rating: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Cover image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// List anime
    #[command(alias = "ls")]
    List {
        /// Search titles and notes
        #[arg(long)]
        search: Option<String>,
        /// Filter by status
        #[arg(short, long)]
        status: Option<AnimeStatus>,
        /// Sort order: date, name, rating, status
        #[arg(long, default_value = "date")]
        sort: AnimeSort,
    },
    /// Show anime details
    Show {
        /// Anime ID (full UUID or prefix)
        id: String,
    },
    /// Edit an anime (interactive when no flag is given)
    Edit {
        /// Anime ID (full UUID or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        episode: Option<String>,
        /// Total episode count (empty to clear)
        #[arg(long)]
        total: Option<String>,
        #[arg(short, long)]
        status: Option<AnimeStatus>,
        /// Rating from 1 to 10 (empty to clear)
        #[arg(short, long)]
        rating: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Mark the next episode watched
    Next {
        /// Anime ID (full UUID or prefix)
        id: String,
    },
    /// Delete an anime
    #[command(alias = "rm")]
    Delete {
        /// Anime ID (full UUID or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Count entries per status
    Stats,
}

#[derive(Subcommand, Clone)]
enum SettingsCommands {
    /// Show settings and the resolved theme
    Show,
    /// Set a settings value
    Set {
        /// Settings key (theme, accent_color, animations, compact_mode, color.<slot>)
        key: String,
        value: String,
    },
    /// List built-in themes
    Themes,
    /// Restore default settings
    Reset,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, fetch_metadata)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = Store::open_with_config(config)?;

    match cli.command {
        Commands::Link { command } => handle_link_command(command, &mut store, &output).await,
        Commands::Anime { command } => handle_anime_command(command, &mut store, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Settings { command } => handle_settings_command(command, &mut store, &output),
        Commands::Config { command } => handle_config_command(command, config_path, &output),
    }
}

async fn handle_link_command(
    command: LinkCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            title,
            tags,
            notes,
            image,
            offline,
        } => {
            let input = NewLink {
                url,
                title,
                tags,
                notes,
                image,
                offline,
            };
            commands::link::create(store, input, output).await
        }
        LinkCommands::List { search, tag, sort } => {
            commands::link::list(store, search, tag, sort, output)
        }
        LinkCommands::Show { id } => commands::link::show(store, id, output),
        LinkCommands::Edit {
            id,
            url,
            title,
            tags,
            notes,
            image,
        } => {
            let edits = LinkEdits {
                url,
                title,
                tags,
                notes,
                image,
            };
            commands::link::edit(store, id, edits, output)
        }
        LinkCommands::Favorite { id } => commands::link::favorite(store, id, output),
        LinkCommands::Delete { id, yes } => commands::link::delete(store, id, yes, output),
    }
}

fn handle_anime_command(command: AnimeCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        AnimeCommands::Add {
            title,
            episode,
            total,
            status,
            rating,
            notes,
            image,
        } => {
            let input = NewAnime {
                title,
                episode,
                total,
                status,
                rating,
                notes,
                image,
            };
            commands::anime::create(store, input, output)
        }
        AnimeCommands::List {
            search,
            status,
            sort,
        } => commands::anime::list(store, search, status, sort, output),
        AnimeCommands::Show { id } => commands::anime::show(store, id, output),
        AnimeCommands::Edit {
            id,
            title,
            episode,
            total,
            status,
            rating,
            notes,
            image,
        } => {
            let edits = AnimeEdits {
                title,
                episode,
                total,
                status,
                rating,
                notes,
                image,
            };
            commands::anime::edit(store, id, edits, output)
        }
        AnimeCommands::Next { id } => commands::anime::next(store, id, output),
        AnimeCommands::Delete { id, yes } => commands::anime::delete(store, id, yes, output),
        AnimeCommands::Stats => commands::anime::stats(store, output),
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(store, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(store, key, value, output)
        }
        Some(SettingsCommands::Themes) => commands::settings::themes(store, output),
        Some(SettingsCommands::Reset) => commands::settings::reset(store, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install the tracing subscriber
///
/// `NEKOLINKS_LOG` sets the level and sends output to `log_file` when one is
/// configured. Without it only warnings and errors reach stderr, so failed
/// writes are still visible.
fn init_logging(config: &Config) {
    let level = std::env::var(LOG_ENV).ok().filter(|l| !l.trim().is_empty());
    let env_filter = EnvFilter::new(log_directives(level.as_deref().unwrap_or("warn")));

    let log_path = level.as_ref().and(config.log_path());
    if let Some(path) = log_path {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                debug!("Logging to {:?}", path);
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_directives(level: &str) -> String {
    format!("nekolinks_core={0},nekolinks_cli={0}", level)
}
