//! Serve the mission catalog to a browser page.
//!
//! Loads the catalog and the stored favorites, then serves the REST API,
//! the WebSocket and optionally the page's static files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p missiondeck-web
//! cargo run -p missiondeck-web -- --data https://example.org/missions.json --port 8080
//! cargo run -p missiondeck-web -- --static-dir ./public --fallback samples
//! ```
//!
//! ## Talking to it
//!
//! **WebSocket** (connect to `/ws`):
//! ```json
//! {"type": "search", "text": "apollo"}
//! {"type": "toggle_favorite", "id": 1}
//! ```
//!
//! **REST**:
//! ```bash
//! curl -X POST localhost:3001/api/favorites/1/toggle
//! curl -X PUT localhost:3001/api/filter -H 'content-type: application/json' \
//!   -d '{"search":"","agency":"NASA","year":"","type":""}'
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use missiondeck::logging::init_stderr_logging;
use missiondeck::prelude::*;
use missiondeck_web::{WebConfig, spawn_web};
use tracing::info;

/// Browser front for the space mission catalog.
#[derive(Parser)]
#[command(about = "Serve the mission catalog over HTTP and WebSocket")]
struct Args {
    /// Catalog document: a file path or an http(s) URL.
    #[arg(long, default_value = "missions.json")]
    data: DataSource,

    /// What to show when the catalog cannot be loaded.
    #[arg(long, value_enum, default_value_t = FallbackPolicy::Empty)]
    fallback: FallbackPolicy,

    /// Local key-value store holding favorites.
    #[arg(long, default_value = "missiondeck-storage.json")]
    storage: PathBuf,

    /// Port for the web server.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Directory with the browser page and its assets.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Search debounce in milliseconds.
    #[arg(long, default_value_t = 300)]
    debounce_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    init_stderr_logging("info");

    let config = CatalogConfig::new(args.data)
        .with_fallback(args.fallback)
        .with_storage_path(args.storage)
        .with_search_debounce(Duration::from_millis(args.debounce_ms));

    let state = config.open().await;
    info!(
        "Catalog ready: {} missions, {} favorites",
        state.missions().len(),
        state.favorites().len()
    );
    let catalog = Arc::new(Mutex::new(state));

    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        static_dir: args.static_dir,
        search_debounce: config.search_debounce,
        submit_delay: config.submit_delay,
        ..Default::default()
    };
    let addr = spawn_web(catalog, web_config).await?;
    println!("Catalog API: http://{addr}/api/view");
    println!("WebSocket:   ws://{addr}/ws");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl-C: {e}"))?;
    info!("Shutting down");
    Ok(())
}
