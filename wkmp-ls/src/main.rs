//! wkmp-ls (Library Search) - Song search service
//!
//! Serves tiered song search over the shared wkmp.db catalog on port 5726,
//! or runs a single search from the command line with `--query`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wkmp_common::config::{LoggingConfig, RootFolderInitializer, RootFolderResolver};
use wkmp_common::db::init_database;
use wkmp_ls::api::search::SearchResponse;
use wkmp_ls::config::{TomlConfig, MODULE_NAME};
use wkmp_ls::index::{CatalogIndex, SqliteCatalogIndex};
use wkmp_ls::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "wkmp-ls", version, about = "WKMP library search")]
struct Args {
    /// Root folder containing wkmp.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// HTTP port (overrides the config file)
    #[arg(long, env = "WKMP_LS_PORT")]
    port: Option<u16>,

    /// Run one search, print the results as JSON and exit
    #[arg(long)]
    query: Option<String>,

    /// Result cap for this run (overrides the config file)
    #[arg(long)]
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = TomlConfig::load();

    init_tracing(&config.logging)?;

    // Build identification first, before any database delay
    info!(
        "Starting WKMP Library Search (wkmp-ls) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(max_results) = args.max_results {
        config.search.max_results = max_results;
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to prepare root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e).context("Failed to open catalog database");
        }
    };

    let index: Arc<dyn CatalogIndex> = Arc::new(SqliteCatalogIndex::new(pool));
    let state = AppState::new(index, config.search.clone());

    if let Some(query) = args.query {
        let scored = state
            .engine
            .search_scored(&query, &state.defaults)
            .await
            .with_context(|| format!("Search for '{}' failed", query))?;
        let response = SearchResponse::new(&query, scored);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let port = args.port.unwrap_or(config.port);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("wkmp-ls listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

/// `RUST_LOG` wins over the config file level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}
