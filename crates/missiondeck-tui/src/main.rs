//! Browse the mission catalog in the terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p missiondeck-tui
//! cargo run -p missiondeck-tui -- --data https://example.org/missions.json
//! RUST_LOG=debug cargo run -p missiondeck-tui -- --fallback samples
//! ```
//!
//! Press `,` to show the captured log output, `q` to quit.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use missiondeck::logging::init_captured_logging;
use missiondeck::prelude::*;
use missiondeck_tui::{TuiConfig, run_tui};

/// Terminal browser for the space mission catalog.
#[derive(Parser)]
#[command(about = "Browse and curate the mission catalog in the terminal")]
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

    /// Search debounce in milliseconds.
    #[arg(long, default_value_t = 300)]
    debounce_ms: u64,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    let log_buffer = init_captured_logging("info");

    let config = CatalogConfig::new(args.data)
        .with_fallback(args.fallback)
        .with_storage_path(args.storage)
        .with_search_debounce(Duration::from_millis(args.debounce_ms));

    // Loading may fetch over HTTP; the TUI itself runs on this thread.
    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start runtime: {e}"))?;
    let mut state = runtime.block_on(config.open());

    let tui_config = TuiConfig {
        log_buffer: Some(log_buffer),
        search_debounce: config.search_debounce,
    };
    run_tui(&mut state, &tui_config).map_err(|e| format!("TUI error: {e}"))
}
