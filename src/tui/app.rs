//! TUI Application
//!
//! Maps key presses onto `AppState` changes. Anything asynchronous (fetches,
//! sign-in) is left as a `PendingAction` for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InteractionMode, PendingAction};

/// Main TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key press; returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state.should_quit = true;
            return true;
        }

        match self.state.mode {
            InteractionMode::Normal => self.handle_normal(key),
            InteractionMode::Search => self.handle_search(key),
            InteractionMode::Help => self.state.mode = InteractionMode::Normal,
        }

        self.state.should_quit
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        match key.code {
            KeyCode::Char('q') => state.should_quit = true,
            KeyCode::Char('?') => state.mode = InteractionMode::Help,
            KeyCode::Char('/') => state.mode = InteractionMode::Search,
            KeyCode::Tab => {
                if state.shift_category(1) {
                    self.refetch_if_server_side();
                }
            }
            KeyCode::BackTab => {
                if state.shift_category(-1) {
                    self.refetch_if_server_side();
                }
            }
            KeyCode::Char('s') => {
                if state.cycle_sort() {
                    self.refetch_if_server_side();
                }
            }
            KeyCode::Char('p') => {
                state.cycle_pricing();
            }
            KeyCode::Char('r') => {
                state.cycle_rating();
            }
            KeyCode::Char('c') => {
                let category_was_set = state.view.query().category.is_some();
                if state.clear_filters() && category_was_set {
                    self.refetch_if_server_side();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
            KeyCode::Char('J') => {
                state.move_selected(1);
            }
            KeyCode::Char('K') => {
                state.move_selected(-1);
            }
            KeyCode::Char('l') => state.pending = Some(PendingAction::ToggleSession),
            KeyCode::Enter => {
                let link = state.selected_entry().map(|e| format!("{} → {}", e.name, e.url));
                if link.is_some() {
                    state.status_message = link;
                }
            }
            _ => {}
        }
    }

    fn handle_search(&mut self, key: KeyEvent) {
        let mut text = self.state.view.query().search_text.clone();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.state.mode = InteractionMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        self.state.set_search_text(text);
    }

    fn refetch_if_server_side(&mut self) {
        if self.state.server_side {
            self.state.pending = Some(PendingAction::Refetch);
        }
    }
}
