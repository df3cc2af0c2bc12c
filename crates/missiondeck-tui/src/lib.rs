//! Terminal browser for the missiondeck mission catalog.
//!
//! Renders a [`CatalogState`] with ratatui + crossterm: the filter bar, the
//! mission cards, the favorites popup and the create/edit form, plus an
//! optional pane showing captured `tracing` output.
//!
//! # Quick start
//!
//! ```ignore
//! use missiondeck::logging::init_captured_logging;
//! use missiondeck::prelude::*;
//! use missiondeck_tui::{TuiConfig, run_tui};
//!
//! let log_buffer = init_captured_logging("info");
//! let mut state = runtime.block_on(CatalogConfig::default().open());
//! let config = TuiConfig {
//!     log_buffer: Some(log_buffer),
//!     ..Default::default()
//! };
//! run_tui(&mut state, &config)?;
//! ```
//!
//! The TUI owns the session for its whole run; search input is applied
//! through a poll-based [`SearchDebounce`](missiondeck::debounce::SearchDebounce)
//! checked once per frame.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use missiondeck::debounce::DEFAULT_SEARCH_DEBOUNCE;
use missiondeck::logging::LogBuffer;
use missiondeck::state::CatalogState;
use ratatui::prelude::*;

mod app;
mod input;
mod render;

pub use render::{log_level_style, truncate_str};

use app::App;
use input::{apply_pending_search, handle_key_event};
use render::render;

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Optional log buffer from the tracing layer.
    ///
    /// When set, the TUI drains pending log lines from this buffer once
    /// per frame into the log pane, so logging never writes over the
    /// terminal.
    pub log_buffer: Option<LogBuffer>,
    /// Delay after the last search keystroke before re-filtering.
    pub search_debounce: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            log_buffer: None,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// Run the TUI event loop (blocking).
///
/// Returns when the user presses `q` or Ctrl+C.
pub fn run_tui(state: &mut CatalogState, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new(config.search_debounce);

    let result = event_loop(&mut terminal, state, &mut app, config);

    // Restore terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut CatalogState,
    app: &mut App,
    config: &TuiConfig,
) -> io::Result<()> {
    while !app.should_quit {
        apply_pending_search(app, state, Instant::now());

        if let Some(ref log_buf) = config.log_buffer {
            log_buf.drain_into(&mut app.logs);
        }

        terminal.draw(|frame| render(frame, state, app))?;

        // Poll for input events (100ms timeout keeps the debounce responsive).
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(key, app, state, Instant::now());
        }
    }
    Ok(())
}
