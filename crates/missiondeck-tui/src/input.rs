//! Key handling for the catalog TUI.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use missiondeck::mission::MissionId;
use missiondeck::state::CatalogState;
use missiondeck::view::card_notification;
use tracing::warn;

use crate::app::{App, FORM_FIELDS, InputMode, form_field, form_field_mut};

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App, state: &mut CatalogState, now: Instant) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(key, app, state),
        InputMode::Search => handle_search_key(key, app, state, now),
        InputMode::Form => handle_form_key(key, app, state),
        InputMode::ConfirmDelete(id) => handle_confirm_delete_key(key, app, state, id),
        InputMode::Favorites => handle_favorites_key(key, app, state),
    }
}

/// Apply the debounced search text once its window has elapsed.
pub(crate) fn apply_pending_search(app: &mut App, state: &mut CatalogState, now: Instant) {
    if let Some(text) = app.search.poll(now) {
        state.set_search(text);
        app.clamp_cursor(state.visible().len());
    }
}

/// Next dropdown value: "all" (empty) → first choice → ... → last → "all".
pub(crate) fn cycle(current: &str, choices: &[String]) -> String {
    match choices.iter().position(|c| c == current) {
        None => choices.first().cloned().unwrap_or_default(),
        Some(i) => choices.get(i + 1).cloned().unwrap_or_default(),
    }
}

fn selected(app: &App, state: &CatalogState) -> Option<(MissionId, String)> {
    state
        .visible()
        .get(app.cursor)
        .map(|m| (m.id, m.name.clone()))
}

fn handle_normal_key(key: KeyEvent, app: &mut App, state: &mut CatalogState) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(',') => {
            app.show_logs = !app.show_logs;
            app.log_scroll = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor += 1;
            app.clamp_cursor(state.visible().len());
        }
        KeyCode::PageUp => app.log_scroll = app.log_scroll.saturating_add(10),
        KeyCode::PageDown => app.log_scroll = app.log_scroll.saturating_sub(10),
        KeyCode::Char('/') => {
            app.search_input = state.filter().search.clone();
            app.input_mode = InputMode::Search;
            app.status_message = None;
        }
        KeyCode::Char('a') => {
            let next = cycle(&state.filter().agency, &state.options().agencies);
            state.set_agency(next);
            app.cursor = 0;
        }
        KeyCode::Char('y') => {
            let years: Vec<String> = state.options().years.iter().map(i32::to_string).collect();
            let next = cycle(&state.filter().year, &years);
            state.set_year(next);
            app.cursor = 0;
        }
        KeyCode::Char('t') => {
            let next = cycle(&state.filter().kind, &state.options().kinds);
            state.set_kind(next);
            app.cursor = 0;
        }
        KeyCode::Char('r') => {
            app.search.cancel();
            app.search_input.clear();
            state.reset_filters();
            app.cursor = 0;
            app.status_message = Some("Filtres réinitialisés".into());
        }
        KeyCode::Char('f') => {
            if let Some((id, name)) = selected(app, state) {
                app.status_message = Some(match state.toggle_favorite(id) {
                    Ok(true) => format!("★ {name} ajouté aux favoris"),
                    Ok(false) => format!("☆ {name} retiré des favoris"),
                    Err(e) => {
                        warn!("{e}");
                        format!("Erreur: {e}")
                    }
                });
            }
        }
        KeyCode::Char('F') => {
            app.favorites_cursor = 0;
            app.input_mode = InputMode::Favorites;
        }
        KeyCode::Char('n') => {
            if state.open_editor(None).is_ok() {
                app.form_field = 0;
                app.input_mode = InputMode::Form;
            }
        }
        KeyCode::Char('e') => {
            if let Some((id, _)) = selected(app, state) {
                match state.open_editor(Some(id)) {
                    Ok(()) => {
                        app.form_field = 0;
                        app.input_mode = InputMode::Form;
                    }
                    Err(e) => app.status_message = Some(e),
                }
            }
        }
        KeyCode::Char('d') => {
            if let Some((id, name)) = selected(app, state) {
                app.status_message = Some(format!(
                    "Supprimer {name} ? [y] confirmer  [autre touche] annuler"
                ));
                app.input_mode = InputMode::ConfirmDelete(id);
            }
        }
        KeyCode::Enter => {
            if let Some((_, name)) = selected(app, state) {
                app.status_message = Some(card_notification(&name));
            }
        }
        _ => {}
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, state: &mut CatalogState, now: Instant) {
    match key.code {
        KeyCode::Enter => {
            // Apply right away instead of waiting out the window.
            if let Some(text) = app.search.flush() {
                state.set_search(text);
            }
            app.cursor = 0;
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            // The pending keystroke still lands after the window.
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.search.trigger(app.search_input.clone(), now);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.search.trigger(app.search_input.clone(), now);
        }
        _ => {}
    }
}

fn handle_form_key(key: KeyEvent, app: &mut App, state: &mut CatalogState) {
    match key.code {
        KeyCode::Esc => {
            state.close_editor();
            app.input_mode = InputMode::Normal;
            app.status_message = Some("Modification annulée".into());
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_field = (app.form_field + 1) % FORM_FIELDS.len();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_field = (app.form_field + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
        }
        KeyCode::Backspace => {
            form_field_mut(state.draft_mut(), app.form_field).pop();
        }
        KeyCode::Char(c) => {
            form_field_mut(state.draft_mut(), app.form_field).push(c);
        }
        KeyCode::Enter => submit_form(app, state),
        _ => {}
    }
}

fn submit_form(app: &mut App, state: &mut CatalogState) {
    // Every field but the image is required.
    let missing: Vec<&str> = FORM_FIELDS
        .iter()
        .enumerate()
        .take(FORM_FIELDS.len() - 1)
        .filter(|(i, _)| form_field(state.editor().draft(), *i).trim().is_empty())
        .map(|(_, label)| *label)
        .collect();
    if let Some(first) = missing.first() {
        app.form_field = FORM_FIELDS.iter().position(|l| l == first).unwrap_or(0);
        app.status_message = Some(format!("Champs requis: {}", missing.join(", ")));
        return;
    }

    match state.submit_editor() {
        Ok(id) => {
            let name = state
                .catalog()
                .get(id)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            app.status_message = Some(format!("Mission enregistrée: {name}"));
            app.input_mode = InputMode::Normal;
            app.clamp_cursor(state.visible().len());
        }
        Err(e) => {
            warn!("{e}");
            app.status_message = Some(format!("Erreur: {e}"));
        }
    }
}

fn handle_confirm_delete_key(
    key: KeyEvent,
    app: &mut App,
    state: &mut CatalogState,
    id: MissionId,
) {
    app.input_mode = InputMode::Normal;
    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('o')) {
        app.status_message = Some("Suppression annulée".into());
        return;
    }
    app.status_message = Some(match state.delete(id) {
        Ok(true) => "Mission supprimée".into(),
        Ok(false) => format!("Mission {id} introuvable"),
        Err(e) => {
            warn!("{e}");
            format!("Erreur: {e}")
        }
    });
    app.clamp_cursor(state.visible().len());
}

fn handle_favorites_key(key: KeyEvent, app: &mut App, state: &mut CatalogState) {
    let ids: Vec<MissionId> = state.favorite_missions().iter().map(|m| m.id).collect();
    match key.code {
        KeyCode::Esc | KeyCode::Char('F') | KeyCode::Char('q') => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.favorites_cursor = app.favorites_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.favorites_cursor + 1 < ids.len() {
                app.favorites_cursor += 1;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(&id) = ids.get(app.favorites_cursor) {
                if let Err(e) = state.remove_favorite(id) {
                    warn!("{e}");
                    app.status_message = Some(format!("Erreur: {e}"));
                }
                app.favorites_cursor = app.favorites_cursor.min(ids.len().saturating_sub(2));
            }
        }
        _ => {}
    }
}
