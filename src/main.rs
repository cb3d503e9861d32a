//! Bookshelf - personal book collection tracker.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{
    api::{self, ApiState},
    menu::Menu,
    Library, StoreConfig,
};

const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Track your personal book collection.
#[derive(Parser)]
#[command(name = "bookshelf", about = "Personal book collection tracker")]
struct Cli {
    /// Library data file (JSON).
    #[arg(long, global = true, env = "BOOKSHELF_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Address to bind the HTTP server.
    #[arg(long, global = true, default_value = DEFAULT_BIND, env = "BOOKSHELF_BIND")]
    bind: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive line-mode menu.
    Cli,

    /// Serve the web UI (the default when no command is given).
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the menu's stdout clean: logs go to stderr, and only warnings
    // by default in line mode.
    let default_filter = match cli.command {
        Some(Commands::Cli) => "bookshelf=warn",
        _ => "bookshelf=info,tower_http=info",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StoreConfig::from_option(cli.data_file);

    match cli.command {
        Some(Commands::Cli) => run_menu(&config)?,
        Some(Commands::Serve) | None => run_server(&config, &cli.bind).await?,
    }

    Ok(())
}

/// Run the line-mode menu on stdin/stdout.
fn run_menu(config: &StoreConfig) -> Result<()> {
    let mut library = Library::from_config(config).with_context(|| {
        format!("Failed to open library at {}", config.data_file.display())
    })?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(&mut library, stdin.lock(), stdout.lock()).run()
}

/// Run the web UI.
async fn run_server(config: &StoreConfig, bind: &str) -> Result<()> {
    tracing::info!(data_file = %config.data_file.display(), "Starting Bookshelf web UI...");

    let library = Library::from_config(config).with_context(|| {
        format!("Failed to open library at {}", config.data_file.display())
    })?;

    let state = Arc::new(ApiState::new(library));
    api::serve(state, bind).await
}
