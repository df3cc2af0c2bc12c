//! Messages pushed to WebSocket clients.
//!
//! After every mutation the handler renders the catalog and favorites panel
//! while still holding the session lock and broadcasts both, so each page
//! redraws from a consistent snapshot.

use missiondeck::state::CatalogState;
use missiondeck::view::{CatalogView, FavoritesPanel, render, render_favorites};
use serde::Serialize;
use tokio::sync::broadcast;

/// A message sent from the server to WebSocket clients.
///
/// Discriminated on the `type` field when serialized to JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Freshly rendered catalog page.
    View { data: CatalogView },
    /// Freshly rendered favorites popup.
    Favorites { data: FavoritesPanel },
    /// Transient toast text.
    Notification { message: String, level: NotificationLevel },
}

/// Toast flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Render the state and broadcast the view and favorites panel.
///
/// Call while holding the session lock. A send error only means nobody is
/// connected.
pub fn publish(state: &CatalogState, tx: &broadcast::Sender<WsMessage>) {
    let _ = tx.send(WsMessage::View {
        data: render(state),
    });
    let _ = tx.send(WsMessage::Favorites {
        data: render_favorites(state),
    });
}

/// Broadcast a toast.
pub fn notify(tx: &broadcast::Sender<WsMessage>, message: impl Into<String>, level: NotificationLevel) {
    let _ = tx.send(WsMessage::Notification {
        message: message.into(),
        level,
    });
}
