//! TUI Views
//!
//! Pane components for the browser screen: the entry list, the detail pane
//! and the help overlay, plus the header, tab and footer strips drawn by
//! `render`.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use super::colors;
use super::state::{AppState, InteractionMode};
use crate::domain::CatalogEntry;
use crate::format::{format_date, format_number, rating_stars, truncate};
use crate::projection::rating_bucket;

/// A pane drawn into part of the screen
pub trait View {
    /// Render the view to the frame
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Get the view title
    fn title(&self) -> &'static str;
}

/// Draw the whole screen.
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_tabs(frame, chunks[1], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    EntryListView.render(frame, body[0], state);
    DetailView.render(frame, body[1], state);

    render_footer(frame, chunks[3], state);

    if state.mode == InteractionMode::Help {
        HelpView.render(frame, centered(frame.area(), 60, 60), state);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let who = match state.session.session() {
        Some(session) => format!("signed in as {}", session.user().display_name),
        None => "signed out".to_string(),
    };
    let mut spans = vec![
        Span::styled(" toolscout ", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{}] ", state.source_name), Style::default().fg(colors::DIM)),
        Span::raw(state.counts_string()),
    ];
    if state.loading {
        spans.push(Span::styled(" loading…", Style::default().fg(colors::PAID)));
    }
    if state.view.is_reordered() {
        spans.push(Span::styled(" (manual order)", Style::default().fg(colors::DIM)));
    }
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(who, Style::default().fg(colors::DIM)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let tabs = Tabs::new(state.category_tabs())
        .select(state.category_index())
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", state.facets_string())))
        .highlight_style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match state.mode {
        InteractionMode::Search => Line::from(vec![
            Span::styled("/", Style::default().fg(colors::KEYBIND)),
            Span::raw(state.view.query().search_text.clone()),
            Span::styled("█", Style::default().fg(colors::DIM)),
        ]),
        _ => match &state.status_message {
            Some(message) => Line::from(Span::raw(message.clone())),
            None => keybind_line(),
        },
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn keybind_line() -> Line<'static> {
    let binds = [
        ("/", "search"),
        ("Tab", "category"),
        ("p", "price"),
        ("r", "rating"),
        ("s", "sort"),
        ("J/K", "move"),
        ("c", "clear"),
        ("?", "help"),
        ("q", "quit"),
    ];
    let spans: Vec<Span> = binds
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!("<{}>", key), Style::default().fg(colors::KEYBIND)),
                Span::styled(format!(" {}  ", action), Style::default().fg(colors::DIM)),
            ]
        })
        .collect();
    Line::from(spans)
}

/// Filtered, ordered entries with the cursor
pub struct EntryListView;

impl EntryListView {
    fn format_entry(entry: &CatalogEntry, featured: bool) -> ListItem<'static> {
        let marker = if featured {
            Span::styled("★ ", Style::default().fg(colors::FEATURED))
        } else {
            Span::raw("  ")
        };
        let line = Line::from(vec![
            marker,
            Span::styled(truncate(&entry.name, 28), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", entry.pricing.label()),
                Style::default().fg(colors::pricing(entry.pricing)),
            ),
            Span::styled(
                format!(" {} {}", rating_stars(rating_bucket(entry.stars)), format_number(entry.stars)),
                Style::default().fg(colors::DIM),
            ),
        ]);
        ListItem::new(line)
    }
}

impl View for EntryListView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let visible = state.view.visible();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", self.title(), visible.len()));

        if visible.is_empty() {
            let message = if state.loading {
                "Loading catalog…"
            } else {
                "No tools match the current filters"
            };
            let empty = Paragraph::new(message).style(Style::default().fg(colors::DIM)).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = visible
            .iter()
            .map(|entry| Self::format_entry(entry, state.is_featured(entry)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut list_state = ListState::default().with_selected(Some(state.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn title(&self) -> &'static str {
        "Tools"
    }
}

/// Details of the entry under the cursor
pub struct DetailView;

impl DetailView {
    fn lines(entry: &CatalogEntry) -> Vec<Line<'static>> {
        let label = Style::default().fg(colors::DIM);
        let rating = rating_bucket(entry.stars);
        let mut lines = vec![
            Line::from(Span::styled(entry.name.clone(), Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD))),
            Line::from(vec![
                Span::styled(entry.category.clone(), label),
                Span::raw("  "),
                Span::styled(entry.pricing.label(), Style::default().fg(colors::pricing(entry.pricing))),
            ]),
            Line::raw(""),
            Line::raw(entry.description.clone()),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Rating    ", label),
                Span::raw(format!("{} {:.1}", rating_stars(rating), rating)),
            ]),
            Line::from(vec![
                Span::styled("Stars     ", label),
                Span::raw(format_number(entry.stars)),
                Span::styled("  Forks ", label),
                Span::raw(format_number(entry.forks)),
                Span::styled("  Downloads ", label),
                Span::raw(format_number(entry.downloads)),
            ]),
            Line::from(vec![
                Span::styled("Added     ", label),
                Span::raw(format_date(entry.created_at)),
                Span::styled("  Updated ", label),
                Span::raw(format_date(entry.last_updated)),
            ]),
        ];
        if let Some(license) = &entry.license {
            lines.push(Line::from(vec![Span::styled("License   ", label), Span::raw(license.clone())]));
        }
        if !entry.url.is_empty() {
            lines.push(Line::from(vec![Span::styled("Website   ", label), Span::raw(entry.url.clone())]));
        }
        if let Some(repo) = &entry.repo_url {
            lines.push(Line::from(vec![Span::styled("Repo      ", label), Span::raw(repo.clone())]));
        }
        lines
    }
}

impl View for DetailView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default().borders(Borders::ALL).title(format!(" {} ", self.title()));
        let paragraph = match state.selected_entry() {
            Some(entry) => Paragraph::new(Self::lines(entry)),
            None => Paragraph::new("Nothing selected").style(Style::default().fg(colors::DIM)),
        };
        frame.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
    }

    fn title(&self) -> &'static str {
        "Details"
    }
}

/// Key reference overlay
pub struct HelpView;

impl View for HelpView {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let rows = [
            ("j / k", "select next / previous"),
            ("J / K", "move selected tool down / up"),
            ("Tab / S-Tab", "next / previous category"),
            ("/", "search name and description"),
            ("p", "cycle pricing facet"),
            ("r", "cycle minimum rating"),
            ("s", "cycle sort order"),
            ("c", "clear filters"),
            ("Enter", "show the tool's link"),
            ("l", "sign in / sign out"),
            ("q", "quit"),
        ];
        let lines: Vec<Line> = rows
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
                    Span::raw(*action),
                ])
            })
            .collect();

        frame.render_widget(Clear, area);
        let help = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (any key closes) ", self.title())),
        );
        frame.render_widget(help, area);
    }

    fn title(&self) -> &'static str {
        "Help"
    }
}

/// A rectangle `percent_x` by `percent_y` of `area`, centered in it
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::domain::{Pricing, QueryState};
    use ratatui::{Terminal, backend::TestBackend};

    fn state() -> AppState {
        let mut state = AppState::new(QueryState::new(), "bundled", false);
        let store = CatalogStore::from_entries(vec![
            CatalogEntry::new("1", "ChatGPT", "AI Chatbots")
                .with_description("Conversational assistant")
                .with_pricing(Pricing::Freemium)
                .with_stars(150_000),
            CatalogEntry::new("2", "Ollama", "AI Coding Assistance").with_pricing(Pricing::OpenSource),
        ])
        .unwrap();
        state.categories = store.categories();
        state.featured = vec!["ChatGPT".to_string()];
        state.install_store(store);
        state
    }

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(state, f)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_shows_entries_and_details() {
        let screen = draw(&state());
        assert!(screen.contains("ChatGPT"));
        assert!(screen.contains("Ollama"));
        assert!(screen.contains("Conversational assistant"));
        assert!(screen.contains("2 of 2 tools"));
        assert!(screen.contains("AI Chatbots"));
    }

    #[test]
    fn test_render_empty_filter_result() {
        let mut state = state();
        state.set_search_text("zzz".to_string());
        let screen = draw(&state);
        assert!(screen.contains("No tools match"));
        assert!(screen.contains("Nothing selected"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut state = state();
        state.mode = InteractionMode::Help;
        assert!(draw(&state).contains("cycle pricing facet"));
    }

    #[test]
    fn test_render_search_input() {
        let mut state = state();
        state.mode = InteractionMode::Search;
        state.set_search_text("olla".to_string());
        assert!(draw(&state).contains("/olla"));
    }

    #[test]
    fn test_view_titles() {
        assert_eq!(EntryListView.title(), "Tools");
        assert_eq!(DetailView.title(), "Details");
        assert_eq!(HelpView.title(), "Help");
    }
}
