//! REST API endpoint handlers.
//!
//! Every mutating handler updates the shared [`CatalogState`], renders the
//! result and broadcasts it to WebSocket clients before releasing the lock.
//! Failures map to status codes: unknown missions are 404, invalid contact
//! forms 422 and storage write failures 500.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use missiondeck::contact::{self, ContactForm, ContactValidation, SubmissionStatus};
use missiondeck::filter::MissionFilter;
use missiondeck::loader::document_schema;
use missiondeck::mission::{Mission, MissionDraft, MissionId};
use missiondeck::state::CatalogState;
use missiondeck::view::{CatalogView, FavoritesPanel, card_notification, render, render_favorites};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::broadcast::{NotificationLevel, WsMessage, notify, publish};
use crate::{SharedCatalog, lock};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub broadcast_tx: broadcast::Sender<WsMessage>,
    pub submit_delay: Duration,
}

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<T, ApiError>;

fn not_found(id: MissionId) -> ApiError {
    (StatusCode::NOT_FOUND, format!("Mission {id} not found"))
}

fn storage_error(e: String) -> ApiError {
    warn!("Storage write failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, e)
}

impl AppState {
    /// Run a mutation under the lock and broadcast the resulting view.
    ///
    /// Core mutations leave the state untouched when they fail, so there is
    /// nothing to publish on `Err`.
    fn mutate<T>(&self, f: impl FnOnce(&mut CatalogState) -> ApiResult<T>) -> ApiResult<T> {
        let mut state = lock(&self.catalog);
        let out = f(&mut state)?;
        publish(&state, &self.broadcast_tx);
        Ok(out)
    }
}

// ── Catalog page ──

/// GET /api/view: Rendered catalog page for the current filter.
pub async fn get_view(State(app): State<AppState>) -> Json<CatalogView> {
    Json(render(&lock(&app.catalog)))
}

/// GET /api/schema: JSON Schema of the catalog document.
pub async fn get_schema() -> Json<serde_json::Value> {
    Json(document_schema())
}

/// PUT /api/filter: Replace all four filter values.
pub async fn put_filter(
    State(app): State<AppState>,
    Json(filter): Json<MissionFilter>,
) -> ApiResult<Json<CatalogView>> {
    app.mutate(|state| {
        state.set_filter(filter);
        Ok(Json(render(state)))
    })
}

/// POST /api/filter/reset: Clear every filter.
pub async fn post_reset_filter(State(app): State<AppState>) -> ApiResult<Json<CatalogView>> {
    app.mutate(|state| {
        state.reset_filters();
        Ok(Json(render(state)))
    })
}

// ── Favorites ──

/// GET /api/favorites: The favorites popup.
pub async fn get_favorites(State(app): State<AppState>) -> Json<FavoritesPanel> {
    Json(render_favorites(&lock(&app.catalog)))
}

/// Response body for POST /api/favorites/{id}/toggle.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub favorite: bool,
    pub count: usize,
}

/// POST /api/favorites/{id}/toggle: Flip membership and persist.
///
/// Ids need not exist in the catalog.
pub async fn post_toggle_favorite(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
) -> ApiResult<Json<ToggleResponse>> {
    app.mutate(|state| {
        let favorite = state.toggle_favorite(id).map_err(storage_error)?;
        Ok(Json(ToggleResponse {
            favorite,
            count: state.favorites().len(),
        }))
    })
}

/// DELETE /api/favorites/{id}: Remove from the favorites popup.
///
/// Returns 204 when removed, 404 if it was not a favorite.
pub async fn delete_favorite(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
) -> ApiResult<StatusCode> {
    app.mutate(|state| {
        if state.remove_favorite(id).map_err(storage_error)? {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err((StatusCode::NOT_FOUND, format!("Mission {id} is not a favorite")))
        }
    })
}

// ── Missions ──

/// GET /api/missions: Every mission in catalog order, unfiltered.
pub async fn list_missions(State(app): State<AppState>) -> Json<Vec<Mission>> {
    Json(lock(&app.catalog).missions().to_vec())
}

/// GET /api/missions/{id}
pub async fn get_mission(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
) -> ApiResult<Json<Mission>> {
    let state = lock(&app.catalog);
    state
        .catalog()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/missions: Create a mission with the next free id.
pub async fn create_mission(
    State(app): State<AppState>,
    Json(draft): Json<MissionDraft>,
) -> ApiResult<(StatusCode, Json<Mission>)> {
    app.mutate(|state| {
        let id = state
            .save(None, draft)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e))?;
        let mission = state.catalog().get(id).cloned().ok_or_else(|| not_found(id))?;
        Ok((StatusCode::CREATED, Json(mission)))
    })
}

/// PUT /api/missions/{id}: Replace a mission's fields in place.
pub async fn update_mission(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
    Json(draft): Json<MissionDraft>,
) -> ApiResult<Json<Mission>> {
    app.mutate(|state| {
        state.save(Some(id), draft).map_err(|_| not_found(id))?;
        let mission = state.catalog().get(id).cloned().ok_or_else(|| not_found(id))?;
        Ok(Json(mission))
    })
}

/// DELETE /api/missions/{id}: Delete a mission and drop it from favorites.
///
/// The confirmation prompt is the page's job.
pub async fn delete_mission(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
) -> ApiResult<StatusCode> {
    app.mutate(|state| {
        if state.delete(id).map_err(storage_error)? {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(not_found(id))
        }
    })
}

/// Response body for POST /api/missions/{id}/open.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenResponse {
    pub message: String,
}

/// POST /api/missions/{id}/open: Card activated outside its buttons.
pub async fn open_mission(
    State(app): State<AppState>,
    Path(id): Path<MissionId>,
) -> ApiResult<Json<OpenResponse>> {
    let message = {
        let state = lock(&app.catalog);
        let mission = state.catalog().get(id).ok_or_else(|| not_found(id))?;
        card_notification(&mission.name)
    };
    notify(&app.broadcast_tx, message.clone(), NotificationLevel::Info);
    Ok(Json(OpenResponse { message }))
}

// ── Editor ──

/// Request body for POST /api/editor.
#[derive(Debug, Default, Deserialize)]
pub struct OpenEditorRequest {
    /// Mission to edit; absent opens an empty create form.
    #[serde(default)]
    pub id: Option<MissionId>,
}

/// POST /api/editor: Open the create or edit form.
pub async fn open_editor(
    State(app): State<AppState>,
    Json(body): Json<OpenEditorRequest>,
) -> ApiResult<Json<CatalogView>> {
    app.mutate(|state| {
        state
            .open_editor(body.id)
            .map_err(|e| (StatusCode::NOT_FOUND, e))?;
        Ok(Json(render(state)))
    })
}

/// DELETE /api/editor: Cancel the open form.
pub async fn close_editor(State(app): State<AppState>) -> ApiResult<StatusCode> {
    app.mutate(|state| {
        state.close_editor();
        Ok(StatusCode::NO_CONTENT)
    })
}

/// POST /api/editor/submit: Save the form values and close the editor.
///
/// Returns 409 when no form is open.
pub async fn submit_editor(
    State(app): State<AppState>,
    Json(draft): Json<MissionDraft>,
) -> ApiResult<Json<Mission>> {
    app.mutate(|state| {
        if !state.editor().is_open() {
            return Err((StatusCode::CONFLICT, "Editor is not open".into()));
        }
        *state.draft_mut() = draft;
        let id = state
            .submit_editor()
            .map_err(|e| (StatusCode::NOT_FOUND, e))?;
        let mission = state.catalog().get(id).cloned().ok_or_else(|| not_found(id))?;
        notify(
            &app.broadcast_tx,
            format!("{} enregistrée", mission.name),
            NotificationLevel::Success,
        );
        Ok(Json(mission))
    })
}

// ── Contact ──

/// POST /api/contact/validate: Live validation without sending.
pub async fn validate_contact(Json(form): Json<ContactForm>) -> Json<ContactValidation> {
    Json(form.validate())
}

/// POST /api/contact: Validate and simulate sending the form.
///
/// Returns the redirect after the configured delay, or 422 with every
/// field error.
pub async fn post_contact(
    State(app): State<AppState>,
    Json(form): Json<ContactForm>,
) -> (StatusCode, Json<SubmissionStatus>) {
    let tx = app.broadcast_tx.clone();
    let status = contact::submit(&form, app.submit_delay, |s| {
        if let SubmissionStatus::Sending { label } = s {
            notify(&tx, label.clone(), NotificationLevel::Info);
        }
    })
    .await;

    let code = match status {
        SubmissionStatus::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (code, Json(status))
}
