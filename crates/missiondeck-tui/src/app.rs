//! TUI-local state (not part of the catalog session).

use std::time::Duration;

use missiondeck::debounce::SearchDebounce;
use missiondeck::logging::LogLine;
use missiondeck::mission::{MissionDraft, MissionId};

/// Input mode for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Normal mode: arrows move between cards, letters act on them.
    Normal,
    /// Typing into the search box. Every keystroke is debounced.
    Search,
    /// Editing the create/edit form.
    Form,
    /// Waiting for `y` to confirm deleting this mission.
    ConfirmDelete(MissionId),
    /// Favorites popup is open.
    Favorites,
}

/// Editor fields in display order, with their labels.
pub(crate) const FORM_FIELDS: [&str; 6] = [
    "Nom",
    "Agence",
    "Objectif",
    "Date de lancement",
    "Type",
    "Image (URL)",
];

/// The draft field behind a [`FORM_FIELDS`] index.
pub(crate) fn form_field_mut(draft: &mut MissionDraft, index: usize) -> &mut String {
    match index {
        0 => &mut draft.name,
        1 => &mut draft.agency,
        2 => &mut draft.objective,
        3 => &mut draft.launch_date,
        4 => &mut draft.kind,
        _ => &mut draft.image,
    }
}

pub(crate) fn form_field(draft: &MissionDraft, index: usize) -> &str {
    match index {
        0 => &draft.name,
        1 => &draft.agency,
        2 => &draft.objective,
        3 => &draft.launch_date,
        4 => &draft.kind,
        _ => &draft.image,
    }
}

/// TUI-local state.
pub(crate) struct App {
    pub(crate) input_mode: InputMode,
    /// What the search box shows. Applied to the filter after the debounce.
    pub(crate) search_input: String,
    pub(crate) search: SearchDebounce<String>,
    /// Highlighted card among the visible ones.
    pub(crate) cursor: usize,
    /// Highlighted row in the favorites popup.
    pub(crate) favorites_cursor: usize,
    /// Focused form field (index into [`FORM_FIELDS`]).
    pub(crate) form_field: usize,
    /// Whether the logs pane is visible (toggled with `,`).
    pub(crate) show_logs: bool,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    pub(crate) logs: Vec<LogLine>,
    /// Status messages shown temporarily at the bottom.
    pub(crate) status_message: Option<String>,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new(search_debounce: Duration) -> Self {
        Self {
            input_mode: InputMode::Normal,
            search_input: String::new(),
            search: SearchDebounce::new(search_debounce),
            cursor: 0,
            favorites_cursor: 0,
            form_field: 0,
            show_logs: false,
            log_scroll: 0,
            logs: Vec::new(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Keep the card cursor inside a list of `len` cards.
    pub(crate) fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}
