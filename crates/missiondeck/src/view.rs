//! Pure rendering: `(state) → view description`.
//!
//! [`render`] and [`render_favorites`] read a [`CatalogState`] and return
//! plain serializable values. The web server sends them as JSON, the TUI
//! draws them with ratatui and the CLI prints them; none of them touch the
//! state while rendering.

use serde::Serialize;

use crate::catalog::EditorMode;
use crate::filter::{FilterOptions, MissionFilter};
use crate::loader::LoadNotice;
use crate::mission::{Mission, MissionDraft, MissionId, format_launch_date};
use crate::state::CatalogState;

/// Everything a frontend needs to draw the catalog page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub cards: Vec<MissionCard>,
    /// Set when `cards` is empty.
    pub empty: Option<EmptyState>,
    /// Every stored favorite id, including ids missing from the catalog.
    pub favorite_count: usize,
    pub total: usize,
    pub filter: MissionFilter,
    pub options: FilterOptions,
    pub notice: Option<LoadNotice>,
    pub editor: Option<EditorView>,
}

/// One mission card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCard {
    pub id: MissionId,
    pub name: String,
    pub agency: String,
    pub objective: String,
    pub launch_date: String,
    /// Long French form, e.g. "16 juillet 1969".
    pub launch_label: String,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: String,
    pub is_favorite: bool,
}

/// Placeholder shown instead of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyState {
    /// The document failed to load and the catalog is empty.
    LoadError {
        title: String,
        message: String,
        action: String,
    },
    /// Missions exist but none match the filter.
    NoResults { title: String, message: String },
}

/// The open create/edit form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub title: String,
    pub mode: EditorMode,
    pub draft: MissionDraft,
}

/// Contents of the favorites popup.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPanel {
    pub count: usize,
    pub items: Vec<FavoriteItem>,
    /// "Aucun favori" message when the set is empty.
    pub empty_message: Option<String>,
}

/// One row in the favorites popup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: MissionId,
    pub name: String,
    pub agency: String,
    pub objective: String,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: String,
}

/// Render the catalog page for the current state.
pub fn render(state: &CatalogState) -> CatalogView {
    let favorites = state.favorites();
    let cards: Vec<MissionCard> = state
        .visible()
        .into_iter()
        .map(|m| card(m, favorites.contains(m.id)))
        .collect();

    let notice = state.load_notice().cloned();
    let empty = if !cards.is_empty() {
        None
    } else if state.catalog().is_empty()
        && let Some(n) = &notice
    {
        Some(EmptyState::LoadError {
            title: n.title.clone(),
            message: n.message.clone(),
            action: "Ajouter votre première mission".into(),
        })
    } else {
        Some(EmptyState::NoResults {
            title: "Aucune mission trouvée".into(),
            message: "Essayez de modifier vos critères de recherche".into(),
        })
    };

    let editor = state.editor().title().map(|title| EditorView {
        title: title.to_string(),
        mode: state.editor().mode(),
        draft: state.editor().draft().clone(),
    });

    CatalogView {
        cards,
        empty,
        favorite_count: favorites.len(),
        total: state.catalog().len(),
        filter: state.filter().clone(),
        options: state.options().clone(),
        notice,
        editor,
    }
}

/// Render the favorites popup.
pub fn render_favorites(state: &CatalogState) -> FavoritesPanel {
    let count = state.favorites().len();
    let items: Vec<FavoriteItem> = state
        .favorite_missions()
        .into_iter()
        .map(|m| FavoriteItem {
            id: m.id,
            name: m.name.clone(),
            agency: m.agency.clone(),
            objective: m.objective.clone(),
            year: m.launch_year(),
            kind: m.kind.clone(),
            image_url: m.image_url().to_string(),
        })
        .collect();
    let empty_message = (count == 0).then(|| "Aucun favori pour le moment".to_string());
    FavoritesPanel {
        count,
        items,
        empty_message,
    }
}

/// Notification text for activating a card outside its buttons.
pub fn card_notification(name: &str) -> String {
    format!("Ouverture des détails: {name}")
}

fn card(m: &Mission, is_favorite: bool) -> MissionCard {
    MissionCard {
        id: m.id,
        name: m.name.clone(),
        agency: m.agency.clone(),
        objective: m.objective.clone(),
        launch_date: m.launch_date.clone(),
        launch_label: format_launch_date(&m.launch_date),
        year: m.launch_year(),
        kind: m.kind.clone(),
        image_url: m.image_url().to_string(),
        is_favorite,
    }
}
