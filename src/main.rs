//! Repocache CLI - refresh the repository cache and serve it over HTTP

use clap::{Parser, Subcommand};
use repocache::config::{self, AppConfig, CONFIG_KEYS};
use repocache::server::{self, AppState};
use repocache::ui::{self, Icons};
use repocache::{GitHubSearch, RefreshReport, RepoStore};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "repocache")]
#[command(version)]
#[command(about = "Cache repository search results in SQLite and serve them over HTTP")]
#[command(long_about = r#"
Repocache pulls the configured repository search into a local SQLite
database, then serves it:
  GET /        landing page
  GET /repos   cached repositories as JSON, most stars first

Example usage:
  repocache init
  repocache serve
  repocache serve --no-refresh
  repocache config search_parameters
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "repocache.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the cache (when refresh_db is set) and start the HTTP server
    Serve {
        /// Serve the existing cache without refreshing it
        #[arg(long)]
        no_refresh: bool,
    },

    /// Rebuild the cache from the search API and exit
    Refresh,

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Print a single configuration setting
    Config {
        /// Setting name, e.g. max_results
        key: String,
    },
}

fn init_logging(config: &AppConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(config.log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (file_layer, stderr_layer) = match &config.log_file {
        Some(path) => {
            config::ensure_parent_dir(path)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter)
        .init();

    Ok(())
}

async fn run_refresh(store: &RepoStore, config: &AppConfig) -> anyhow::Result<RefreshReport> {
    if config.show_messages {
        ui::info(Icons::HOURGLASS, "Building the database, please wait", &config.search_url);
    }

    let source = GitHubSearch::new(Duration::from_secs(config.request_timeout_secs))?;
    match repocache::refresh(store, &source, config).await {
        Ok(report) => Ok(report),
        Err(e) => {
            ui::error(&format!("Refresh failed: {}", e));
            Err(e.into())
        }
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<RepoStore> {
    config::ensure_parent_dir(&config.db_name)?;
    tracing::info!("Opening cache at {}", config.db_name.display());
    Ok(RepoStore::open(&config.db_name)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { no_refresh: false }) {
        Commands::Serve { no_refresh } => {
            let config = AppConfig::load(Some(&cli.config))?;
            init_logging(&config, cli.verbose)?;

            let store = open_store(&config)?;
            if config.refresh_db && !no_refresh {
                run_refresh(&store, &config).await?;
            } else {
                tracing::info!("Skipping refresh, serving {} cached repositories", store.count()?);
            }

            server::start_server(config.port, AppState::new(store)).await?;
        }

        Commands::Refresh => {
            let config = AppConfig::load(Some(&cli.config))?;
            init_logging(&config, cli.verbose)?;

            let store = open_store(&config)?;
            let report = run_refresh(&store, &config).await?;

            ui::section("Refresh summary");
            ui::info(Icons::DATABASE, "Database", &config.db_name.display().to_string());
            ui::summary_row("Pages fetched:", &report.pages.to_string());
            ui::summary_row("Records stored:", &store.count()?.to_string());
            for record in store.list_by_popularity()?.iter().take(3) {
                ui::summary_row(Icons::STAR, &format!("{} ({})", record.name, record.star_count));
            }
        }

        Commands::Init { force } => {
            let config = AppConfig::default();
            config::write_config(&cli.config, &config, force)?;
            ui::success(&format!("Wrote default config to {}", cli.config.display()));
        }

        Commands::Config { key } => {
            let config = AppConfig::load(Some(&cli.config))?;
            match config.lookup(&key) {
                Ok(toml::Value::String(s)) => println!("{}", s),
                Ok(value) => println!("{}", value),
                Err(e) => {
                    ui::warn(&format!("Known keys: {}", CONFIG_KEYS.join(", ")));
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
