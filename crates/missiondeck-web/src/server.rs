//! Axum server setup and router construction.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post, put};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::error;

use crate::api::{self, AppState};
use crate::broadcast::WsMessage;
use crate::ws::{self, WsState};
use crate::{SharedCatalog, WebConfig};

/// Build the full axum router.
///
/// The router serves:
/// - WebSocket at `/ws`
/// - REST API at `/api/*`
/// - Optional static files for the browser page
pub fn build_router(
    catalog: SharedCatalog,
    broadcast_tx: broadcast::Sender<WsMessage>,
    config: &WebConfig,
) -> Router {
    let app_state = AppState {
        catalog: catalog.clone(),
        broadcast_tx: broadcast_tx.clone(),
        submit_delay: config.submit_delay,
    };

    let ws_state = WsState {
        catalog,
        broadcast_tx,
        search_debounce: config.search_debounce,
    };

    // CORS layer for a page served from another origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .with_state(ws_state);

    let api_routes = Router::new()
        .route("/api/view", get(api::get_view))
        .route("/api/schema", get(api::get_schema))
        .route("/api/filter", put(api::put_filter))
        .route("/api/filter/reset", post(api::post_reset_filter))
        .route("/api/favorites", get(api::get_favorites))
        .route(
            "/api/favorites/{id}",
            axum::routing::delete(api::delete_favorite),
        )
        .route("/api/favorites/{id}/toggle", post(api::post_toggle_favorite))
        .route(
            "/api/missions",
            get(api::list_missions).post(api::create_mission),
        )
        .route(
            "/api/missions/{id}",
            get(api::get_mission)
                .put(api::update_mission)
                .delete(api::delete_mission),
        )
        .route("/api/missions/{id}/open", post(api::open_mission))
        .route(
            "/api/editor",
            post(api::open_editor).delete(api::close_editor),
        )
        .route("/api/editor/submit", post(api::submit_editor))
        .route("/api/contact", post(api::post_contact))
        .route("/api/contact/validate", post(api::validate_contact))
        .with_state(app_state);

    let mut router = Router::new().merge(ws_routes).merge(api_routes).layer(cors);

    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind the listener, serve on a background task and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> Result<SocketAddr, String> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {bind_addr}: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to read bound address: {e}"))?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Web server stopped: {e}");
        }
    });

    Ok(addr)
}
