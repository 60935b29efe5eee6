//! Application state for the TUI.
//!
//! This module defines the core state types that drive the TUI:
//! - `AppState`: the catalog view plus everything the browser displays
//! - `InteractionMode`: current input mode (normal, search input, help)
//! - `PendingAction`: async work requested by a key press

use crate::catalog::CatalogStore;
use crate::domain::{ALL, CatalogEntry, Pricing, QueryState, RATING_FACETS, SortKey};
use crate::session::SessionState;
use crate::view::CatalogView;

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Navigation and facet keys
    #[default]
    Normal,
    /// Typing in the search box
    Search,
    /// Help overlay visible
    Help,
}

/// Work the runner performs after the key handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Category or sort changed on a server-side source
    Refetch,
    /// Sign in, or sign out when already signed in
    ToggleSession,
}

/// The primary application state.
#[derive(Debug)]
pub struct AppState {
    /// Filtered, ordered catalog
    pub view: CatalogView,
    /// Category names from the source, without "All"
    pub categories: Vec<String>,
    /// Names highlighted as featured
    pub featured: Vec<String>,
    /// Whether category and sort are applied by the source
    pub server_side: bool,
    /// Source name for the header
    pub source_name: String,

    /// Selected row in the visible list
    pub selected: usize,
    /// Current interaction mode
    pub mode: InteractionMode,
    /// An entries fetch is in flight
    pub loading: bool,
    /// Status line message
    pub status_message: Option<String>,
    /// Identity session
    pub session: SessionState,

    /// Pending action for the runner
    pub pending: Option<PendingAction>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppState {
    /// Create state for an empty catalog; entries arrive by fetch.
    pub fn new(query: QueryState, source_name: impl Into<String>, server_side: bool) -> Self {
        Self {
            view: CatalogView::new(CatalogStore::empty(), query),
            categories: Vec::new(),
            featured: Vec::new(),
            server_side,
            source_name: source_name.into(),
            selected: 0,
            mode: InteractionMode::Normal,
            loading: false,
            status_message: None,
            session: SessionState::default(),
            pending: None,
            should_quit: false,
        }
    }

    /// Category tab labels, "All" first.
    pub fn category_tabs(&self) -> Vec<String> {
        std::iter::once(ALL.to_string()).chain(self.categories.iter().cloned()).collect()
    }

    /// Index of the selected category tab.
    pub fn category_index(&self) -> usize {
        match &self.view.query().category {
            None => 0,
            Some(c) => self.categories.iter().position(|x| x == c).map(|i| i + 1).unwrap_or(0),
        }
    }

    /// Move the category tab by `step`, wrapping around.
    pub fn shift_category(&mut self, step: isize) -> bool {
        let count = self.categories.len() as isize + 1;
        let next = (self.category_index() as isize + step).rem_euclid(count) as usize;
        let category = if next == 0 {
            None
        } else {
            Some(self.categories[next - 1].clone())
        };
        self.after_change(|view| view.set_category(category))
    }

    /// All → each pricing value → All.
    pub fn cycle_pricing(&mut self) -> bool {
        let next = match self.view.query().pricing {
            None => Some(Pricing::ALL[0]),
            Some(current) => Pricing::ALL
                .iter()
                .position(|p| *p == current)
                .and_then(|i| Pricing::ALL.get(i + 1).copied()),
        };
        self.after_change(|view| view.set_pricing(next))
    }

    /// 0 → 5 → 4 → 3 → 2 → 0.
    pub fn cycle_rating(&mut self) -> bool {
        let current = self.view.query().min_rating;
        let pos = RATING_FACETS.iter().position(|r| *r == current).unwrap_or(0);
        let next = RATING_FACETS[(pos + 1) % RATING_FACETS.len()];
        self.after_change(|view| view.set_min_rating(next))
    }

    /// Load order → score → stars → newest → updated → load order.
    pub fn cycle_sort(&mut self) -> bool {
        let next = SortKey::cycle(self.view.query().sort);
        self.after_change(|view| view.set_sort(next))
    }

    pub fn set_search_text(&mut self, text: String) -> bool {
        self.after_change(|view| view.set_search_text(text))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.after_change(CatalogView::clear_filters)
    }

    /// Install a new store from a completed fetch.
    pub fn install_store(&mut self, store: CatalogStore) {
        self.view.replace_store(store);
        self.clamp_selection();
    }

    fn after_change(&mut self, change: impl FnOnce(&mut CatalogView) -> bool) -> bool {
        let changed = change(&mut self.view);
        if changed {
            self.selected = 0;
        }
        changed
    }

    fn clamp_selection(&mut self) {
        let len = self.view.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        if !self.view.is_empty() {
            self.selected = (self.selected + 1) % self.view.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.view.is_empty() {
            self.selected = if self.selected == 0 { self.view.len() - 1 } else { self.selected - 1 };
        }
    }

    /// Move the selected entry one row down (`+1`) or up (`-1`).
    pub fn move_selected(&mut self, step: isize) -> bool {
        let target = self.selected as isize + step;
        if target < 0 {
            return false;
        }
        let target = target as usize;
        match self.view.reorder(self.selected, target) {
            Ok(()) => {
                self.selected = target;
                true
            }
            Err(e) => {
                log::debug!("Ignoring reorder: {}", e);
                false
            }
        }
    }

    /// Entry under the cursor.
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.view.order().get(self.selected).and_then(|id| self.view.store().get(id))
    }

    pub fn is_featured(&self, entry: &CatalogEntry) -> bool {
        self.featured.iter().any(|name| *name == entry.name)
    }

    /// "12 of 40 tools" style counter.
    pub fn counts_string(&self) -> String {
        format!("{} of {} tools", self.view.len(), self.view.store().len())
    }

    /// Facet summary for the sidebar header.
    pub fn facets_string(&self) -> String {
        let query = self.view.query();
        let pricing = query.pricing.map(|p| p.label()).unwrap_or(ALL);
        let rating = if query.min_rating > 0.0 {
            format!("{}+", query.min_rating)
        } else {
            ALL.to_string()
        };
        let sort = query.sort.map(|s| s.label()).unwrap_or("Load order");
        format!("Price: {} │ Rating: {} │ Sort: {}", pricing, rating, sort)
    }
}
