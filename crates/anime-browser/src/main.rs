//! Anime browser CLI application.

use anime_browser::search::run_interactive;
use anime_browser::{render_home, AppContext};
use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use shared::Config;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse top, seasonal and upcoming anime from the terminal", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep responses in memory for this run only
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the hero carousel and the trending, recent and upcoming lists
    Home {
        /// Autoplay the carousel for this many slide changes
        #[arg(long, value_name = "STEPS")]
        rotate: Option<usize>,

        /// Exit with an error if any section had no data
        #[arg(long)]
        strict: bool,
    },

    /// Search anime by title
    Search {
        /// Search terms
        query: Vec<String>,

        /// Read queries from stdin, one input event per line
        #[arg(short, long, conflicts_with = "query")]
        interactive: bool,
    },

    /// Inspect or clear cached responses
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// List cached keys
    List,
    /// Print the payload cached under a key
    Show { key: String },
    /// Remove one cached key
    Remove { key: String },
    /// Remove every cached key
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config decides how logging is set up, so its fallback is reported afterwards
    let config_found = args.config.exists();
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    shared::logging::init(shared::LogConfig::from_settings(
        &config.logging,
        config.log_dir(),
        "anime-browser",
        args.verbose,
    ))?;

    if !config_found {
        warn!(
            config_file = %args.config.display(),
            "Config file not found, using defaults"
        );
    }
    info!(config_file = %args.config.display(), "Anime browser starting");

    let ctx = AppContext::from_config(config, args.no_cache)
        .context("Failed to initialize anime browser")?;

    match args.command.unwrap_or(Command::Home {
        rotate: None,
        strict: false,
    }) {
        Command::Home { rotate, strict } => home(&ctx, rotate, strict).await,
        Command::Search { query, interactive } => search(&ctx, query, interactive).await,
        Command::Cache { action } => cache(&ctx, action),
    }
}

async fn home(ctx: &AppContext, rotate: Option<usize>, strict: bool) -> Result<()> {
    let mut stdout = std::io::stdout();
    let report = render_home(ctx, &mut stdout).await?;

    if let (Some(steps), Some(mut carousel)) = (rotate, report.carousel) {
        let interval = Duration::from_millis(ctx.config.page.autoplay_ms);
        writeln!(stdout, "{}", carousel.render_active())?;
        for _ in 0..steps {
            sleep(interval).await;
            carousel.advance();
            writeln!(stdout, "{}", carousel.render_active())?;
            stdout.flush()?;
        }
    }

    if strict && !report.unavailable.is_empty() {
        let keys: Vec<&str> = report.unavailable.iter().map(|s| s.cache_key()).collect();
        bail!("No data available for: {}", keys.join(", "));
    }

    Ok(())
}

async fn search(ctx: &AppContext, query: Vec<String>, interactive: bool) -> Result<()> {
    let title_max_chars = ctx.config.search.title_max_chars;
    let mut stdout = std::io::stdout();

    if interactive {
        let quiet = Duration::from_millis(ctx.config.search.debounce_ms);
        let input = BufReader::new(tokio::io::stdin());
        let searches = run_interactive(&ctx.search, quiet, title_max_chars, input, &mut stdout).await?;
        info!(searches = searches, "Interactive search finished");
        return Ok(());
    }

    let query = query.join(" ");
    let dropdown = ctx.search.search(&query).await;
    if !dropdown.is_open() {
        bail!("Search query is empty");
    }
    write!(stdout, "{}", dropdown.render(title_max_chars))?;

    Ok(())
}

fn cache(ctx: &AppContext, action: CacheAction) -> Result<()> {
    let store = ctx.store();
    let mut stdout = std::io::stdout();

    match action {
        CacheAction::List => {
            let entries = store.entries().context("Failed to list cache entries")?;
            if entries.is_empty() {
                writeln!(stdout, "Cache is empty")?;
            }
            for entry in entries {
                let stored_at = entry
                    .stored_at
                    .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(stdout, "{:<12} {:>10} bytes  {}", entry.key, entry.size_bytes, stored_at)?;
            }
        }
        CacheAction::Show { key } => match store.read(&key)? {
            Some(payload) => writeln!(stdout, "{}", payload)?,
            None => bail!("Nothing cached under '{}'", key),
        },
        CacheAction::Remove { key } => {
            if store.remove(&key)? {
                info!(key = %key, "Cache entry removed");
                writeln!(stdout, "Removed '{}'", key)?;
            } else {
                writeln!(stdout, "Nothing cached under '{}'", key)?;
            }
        }
        CacheAction::Clear => {
            store.clear().context("Failed to clear cache")?;
            writeln!(stdout, "Cache cleared")?;
        }
    }

    Ok(())
}
