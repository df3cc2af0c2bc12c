//! Rendering for the catalog TUI.

use missiondeck::logging::{LogLevel, LogLine};
use missiondeck::state::CatalogState;
use missiondeck::view::{CatalogView, EmptyState, FavoritesPanel, render as render_view, render_favorites};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, FORM_FIELDS, InputMode, form_field};

// ── Public Utilities ──────────────────────────────────────────────────

/// Truncate to at most `max` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Columns left for the objective after the launch label and its gap.
fn objective_width(width: usize, launch_label: &str) -> usize {
    width.saturating_sub(launch_label.chars().count() + 2)
}

// ── Root Render ───────────────────────────────────────────────────────

pub(crate) fn render(frame: &mut Frame, state: &CatalogState, app: &App) {
    let area = frame.area();

    // Outer layout: [3] filter bar | [flex] cards | [3] input bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let view = render_view(state);

    render_filter_bar(frame, chunks[0], &view, app);
    render_input(frame, chunks[2], &view, app);

    if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_cards(frame, mid[0], &view, app);
        render_logs(frame, mid[1], &app.logs, app);
    } else {
        render_cards(frame, chunks[1], &view, app);
    }

    match app.input_mode {
        InputMode::Favorites => render_favorites_popup(frame, area, &render_favorites(state), app),
        InputMode::Form => render_form_popup(frame, area, &view, app),
        _ => {}
    }
}

/// A rectangle of `percent_x` × `height` centered in `area`.
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

// ── Filter Bar ────────────────────────────────────────────────────────

fn render_filter_bar(frame: &mut Frame, area: Rect, view: &CatalogView, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let all = |v: &str| {
        if v.is_empty() {
            "Toutes".to_string()
        } else {
            v.to_string()
        }
    };

    let search = if matches!(app.input_mode, InputMode::Search) {
        format!("{}\u{2588}", app.search_input)
    } else {
        app.search_input.clone()
    };

    let line = Line::from(vec![
        Span::styled("[/] Recherche: ", label),
        Span::styled(search, Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled("[a] Agence: ", label),
        Span::styled(all(&view.filter.agency), value),
        Span::raw("   "),
        Span::styled("[y] Année: ", label),
        Span::styled(all(&view.filter.year), value),
        Span::raw("   "),
        Span::styled("[t] Type: ", label),
        Span::styled(all(&view.filter.kind), value),
    ]);

    let title = format!(
        " Missions {}/{}  \u{2605} {} ",
        view.cards.len(),
        view.total,
        view.favorite_count
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ── Cards ─────────────────────────────────────────────────────────────

fn render_cards(frame: &mut Frame, area: Rect, view: &CatalogView, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Catalogue ");

    if let Some(empty) = &view.empty {
        let (title, message, action) = match empty {
            EmptyState::LoadError {
                title,
                message,
                action,
            } => (title, message, Some(action)),
            EmptyState::NoResults { title, message } => (title, message, None),
        };
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                title.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.as_str(), Style::default().fg(Color::DarkGray))),
        ];
        if let Some(action) = action {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("[n] {action}"),
                Style::default().fg(Color::Green),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = view
        .cards
        .iter()
        .map(|card| {
            let star = if card.is_favorite { "\u{2605} " } else { "\u{2606} " };
            let header = Line::from(vec![
                Span::styled(star, Style::default().fg(Color::Yellow)),
                Span::styled(
                    card.name.as_str(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", card.agency), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {}", card.kind), Style::default().fg(Color::Magenta)),
            ]);
            let detail = Line::from(vec![
                Span::raw("    "),
                Span::styled(card.launch_label.as_str(), Style::default().fg(Color::Green)),
                Span::raw("  "),
                Span::styled(
                    truncate_str(&card.objective, objective_width(width, &card.launch_label)),
                    Style::default().fg(Color::Gray),
                ),
            ]);
            ListItem::new(vec![header, detail])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

// ── Favorites Popup ───────────────────────────────────────────────────

fn render_favorites_popup(frame: &mut Frame, area: Rect, panel: &FavoritesPanel, app: &App) {
    let height = (panel.items.len() as u16 * 2 + 4).max(5);
    let popup = centered(area, 60, height);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(msg) = &panel.empty_message {
        lines.push(Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, item) in panel.items.iter().enumerate() {
        let selected = i == app.favorites_cursor;
        let marker = if selected { "> " } else { "  " };
        let name_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let year = item.year.map(|y| y.to_string()).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(marker, name_style),
            Span::styled(item.name.as_str(), name_style),
            Span::styled(
                format!("  {} · {} · {}", item.agency, year, item.kind),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(item.objective.as_str(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Favoris ({}) [d] retirer  [Esc] fermer ", panel.count));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

// ── Editor Popup ──────────────────────────────────────────────────────

fn render_form_popup(frame: &mut Frame, area: Rect, view: &CatalogView, app: &App) {
    let Some(editor) = &view.editor else {
        return;
    };
    let popup = centered(area, 70, FORM_FIELDS.len() as u16 + 4);

    let lines: Vec<Line> = FORM_FIELDS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let focused = i == app.form_field;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut text = form_field(&editor.draft, i).to_string();
            if focused {
                text.push('\u{2588}');
            }
            Line::from(vec![
                Span::styled(format!("{label:>18}: "), label_style),
                Span::styled(text, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(
            " {} [Tab] champ suivant  [Enter] enregistrer  [Esc] annuler ",
            editor.title
        ));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

// ── Log Pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = logs
        .iter()
        .map(|log| {
            Line::from(vec![
                Span::styled(format!("{} ", log.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", log.level.label()), log_level_style(log.level)),
                Span::raw(log.message.as_str()),
            ])
        })
        .collect();

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Input Bar ─────────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, view: &CatalogView, app: &App) {
    let (hint, style) = match app.input_mode {
        InputMode::Normal => (
            "[q] quitter  [f] favori  [F] favoris  [n] ajouter  [e] modifier  [d] supprimer  [r] réinitialiser  [,] logs",
            Style::default().fg(Color::DarkGray),
        ),
        InputMode::Search => (
            "Recherche \u{2014} [Enter] appliquer  [Esc] fermer",
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Form => (
            "Formulaire \u{2014} [Tab] champ suivant  [Enter] enregistrer  [Esc] annuler",
            Style::default().fg(Color::Green),
        ),
        InputMode::ConfirmDelete(_) => (
            "[y] confirmer la suppression  [autre touche] annuler",
            Style::default().fg(Color::Red),
        ),
        InputMode::Favorites => (
            "[Up/Down] naviguer  [d] retirer  [Esc] fermer",
            Style::default().fg(Color::Yellow),
        ),
    };

    // Status first, then the load notice, then nothing.
    let text = match (&app.status_message, &view.notice) {
        (Some(msg), _) => Line::from(Span::raw(msg.as_str())),
        (None, Some(notice)) => Line::from(vec![
            Span::styled(
                format!("{}: ", notice.title),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(notice.message.as_str(), Style::default().fg(Color::Red)),
        ]),
        (None, None) => Line::from(""),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {hint} "));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use missiondeck::favorites::{FAVORITES_KEY, Favorites};
    use missiondeck::loader::sample_missions;
    use missiondeck::storage::MemoryStore;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn state() -> CatalogState {
        let favorites = Favorites::load(Box::new(MemoryStore::new()), FAVORITES_KEY);
        CatalogState::new(sample_missions(), favorites)
    }

    #[test]
    fn truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_counts_chars() {
        assert_eq!(truncate_str("Étudier la comète", 7), "Étudier...");
    }

    #[test]
    fn objective_width_counts_label_chars() {
        assert_eq!(objective_width(40, "2 février 2004"), 24);
        assert_eq!(objective_width(10, "16 juillet 1969"), 0);
    }

    #[test]
    fn renders_cards_and_counts() {
        let state = state();
        let app = App::new(Duration::from_millis(300));
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &state, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Apollo 11"));
        assert!(text.contains("16 juillet 1969"));
        assert!(text.contains("Missions 5/5"));
    }

    #[test]
    fn renders_no_results_state() {
        let mut state = state();
        state.set_search("zzz");
        let app = App::new(Duration::from_millis(300));
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &state, &app)).unwrap();

        assert!(buffer_text(&terminal).contains("Aucune mission trouv"));
    }

    #[test]
    fn renders_favorites_popup_empty_message() {
        let state = state();
        let mut app = App::new(Duration::from_millis(300));
        app.input_mode = InputMode::Favorites;
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &state, &app)).unwrap();

        assert!(buffer_text(&terminal).contains("Aucun favori pour le moment"));
    }
}
