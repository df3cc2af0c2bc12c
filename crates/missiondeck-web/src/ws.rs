//! WebSocket upgrade handler and message dispatch.
//!
//! Each connected client receives:
//! 1. The rendered view and favorites panel on connect.
//! 2. A fresh [`WsMessage::View`] after every mutation from any client.
//!
//! Clients send JSON messages back: search keystrokes (debounced per
//! connection), filter changes, resets, favorite toggles and card
//! activations.

use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use missiondeck::debounce::Debouncer;
use missiondeck::filter::MissionFilter;
use missiondeck::mission::MissionId;
use missiondeck::view::{card_notification, render, render_favorites};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::broadcast::{NotificationLevel, WsMessage, notify, publish};
use crate::{SharedCatalog, lock};

/// Shared state for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub catalog: SharedCatalog,
    pub broadcast_tx: broadcast::Sender<WsMessage>,
    pub search_debounce: Duration,
}

/// A message sent from a client.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Raw search box contents after a keystroke.
    Search { text: String },
    /// Dropdown change: all four filter values.
    Filter { filter: MissionFilter },
    ResetFilters,
    ToggleFavorite { id: MissionId },
    RemoveFavorite { id: MissionId },
    /// Card clicked outside its buttons.
    OpenCard { id: MissionId },
}

/// GET /ws: WebSocket upgrade handler.
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ws_state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ws_state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, ws_state: WsState) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before rendering so no mutation slips between the two.
    let mut broadcast_rx = ws_state.broadcast_tx.subscribe();

    if send_snapshot(&mut sink, &ws_state.catalog).await.is_err() {
        return;
    }

    debug!("WebSocket client connected");

    let catalog_for_resync = ws_state.catalog.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    if ws_send(&mut sink, &msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("WebSocket client lagged by {n} messages, resending view");
                    if send_snapshot(&mut sink, &catalog_for_resync).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let search = Debouncer::new(ws_state.search_debounce);

    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(text) => handle_client_message(&text, &ws_state, &search),
            Message::Close(_) => break,
            _ => {}
        }
    }

    debug!("WebSocket client disconnected");
    search.cancel();
    forward_task.abort();
}

/// Process a JSON message received from a client.
fn handle_client_message(text: &str, ws_state: &WsState, search: &Debouncer) {
    let Ok(msg) = serde_json::from_str::<ClientMessage>(text) else {
        debug!("Ignoring malformed WebSocket message");
        return;
    };

    let catalog = &ws_state.catalog;
    let tx = &ws_state.broadcast_tx;

    match msg {
        ClientMessage::Search { text } => {
            let catalog = catalog.clone();
            let tx = tx.clone();
            search.call(async move {
                let mut state = lock(&catalog);
                state.set_search(text);
                publish(&state, &tx);
            });
        }
        ClientMessage::Filter { filter } => {
            // A dropdown change supersedes any pending keystroke.
            search.cancel();
            let mut state = lock(catalog);
            state.set_filter(filter);
            publish(&state, tx);
        }
        ClientMessage::ResetFilters => {
            search.cancel();
            let mut state = lock(catalog);
            state.reset_filters();
            publish(&state, tx);
        }
        ClientMessage::ToggleFavorite { id } => {
            let mut state = lock(catalog);
            match state.toggle_favorite(id) {
                Ok(_) => publish(&state, tx),
                Err(e) => notify(tx, e, NotificationLevel::Error),
            }
        }
        ClientMessage::RemoveFavorite { id } => {
            let mut state = lock(catalog);
            match state.remove_favorite(id) {
                Ok(true) => publish(&state, tx),
                Ok(false) => {}
                Err(e) => notify(tx, e, NotificationLevel::Error),
            }
        }
        ClientMessage::OpenCard { id } => {
            let name = lock(catalog).catalog().get(id).map(|m| m.name.clone());
            match name {
                Some(name) => notify(tx, card_notification(&name), NotificationLevel::Info),
                None => debug!("Card {id} is not in the catalog"),
            }
        }
    }
}

/// Send the current view and favorites panel to one client.
async fn send_snapshot(
    sink: &mut SplitSink<WebSocket, Message>,
    catalog: &SharedCatalog,
) -> Result<(), ()> {
    let (view, favorites) = {
        let state = lock(catalog);
        (render(&state), render_favorites(&state))
    };
    ws_send(sink, &WsMessage::View { data: view }).await?;
    ws_send(sink, &WsMessage::Favorites { data: favorites }).await
}

/// Serialize a `WsMessage` and send it over the WebSocket sink.
async fn ws_send(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).unwrap_or_default();
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
