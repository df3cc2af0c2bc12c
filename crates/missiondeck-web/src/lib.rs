//! HTTP and WebSocket API serving the mission catalog to a browser page.
//!
//! `missiondeck-web` wraps a [`CatalogState`] in an axum server. The REST API
//! covers every catalog operation; the WebSocket pushes a freshly rendered
//! view to every connected page after each mutation and accepts debounced
//! search input.
//!
//! # Quick start
//!
//! ```ignore
//! use missiondeck::prelude::*;
//! use missiondeck_web::{WebConfig, spawn_web};
//! use std::sync::{Arc, Mutex};
//!
//! let state = CatalogConfig::default().open().await;
//! let state = Arc::new(Mutex::new(state));
//!
//! let addr = spawn_web(state, WebConfig::default()).await?;
//! println!("Catalog API: http://{addr}/api/view");
//! ```
//!
//! # Architecture
//!
//! ```text
//! browser ──REST / WS──▶ handlers ──lock──▶ Arc<Mutex<CatalogState>>
//!    ▲                                         │ view::render
//!    └──────────── WsMessage::View ◀── broadcast channel
//! ```
//!
//! Each handler performs its mutation and the following render under one
//! lock acquisition, so every broadcast view is consistent.

mod api;
pub mod broadcast;
mod server;
mod ws;

pub use broadcast::WsMessage;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use missiondeck::contact::DEFAULT_SUBMIT_DELAY;
use missiondeck::debounce::DEFAULT_SEARCH_DEBOUNCE;
use missiondeck::state::CatalogState;

/// Shared catalog session.
pub type SharedCatalog = Arc<Mutex<CatalogState>>;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory holding the browser page and its assets.
    ///
    /// If `None`, only API/WS endpoints are served.
    pub static_dir: Option<PathBuf>,
    /// Maximum WebSocket broadcast channel capacity. Default: 256.
    ///
    /// Clients that fall behind by this many messages receive a fresh view.
    pub broadcast_capacity: usize,
    /// Delay after the last `search` message before re-filtering. Default: 300 ms.
    pub search_debounce: Duration,
    /// Simulated contact submission delay. Default: 2 s.
    pub submit_delay: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
            broadcast_capacity: 256,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            submit_delay: DEFAULT_SUBMIT_DELAY,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(catalog: SharedCatalog, config: WebConfig) -> Result<SocketAddr, String> {
    let (broadcast_tx, _) = tokio::sync::broadcast::channel(config.broadcast_capacity);
    let router = server::build_router(catalog, broadcast_tx, &config);
    server::start_server(router, config.bind_addr).await
}

/// Lock the session, recovering from a poisoned mutex.
pub(crate) fn lock(catalog: &SharedCatalog) -> MutexGuard<'_, CatalogState> {
    catalog.lock().unwrap_or_else(|e| e.into_inner())
}
