//! TUI Runner - main event loop.
//!
//! The `TuiRunner` owns the terminal, app, and event handler. It runs the
//! main loop: render → handle events → process actions → repeat. Catalog
//! fetches run as background tasks and come back through the event handler,
//! so every view update happens on this loop.

use std::sync::Arc;

use eyre::Result;
use log::info;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{AppState, PendingAction};
use super::views::render;
use crate::catalog::{CatalogSource, CatalogStore, FetchRequest};
use crate::fetch::{self, FetchEvent, RequestTracker, Settled};
use crate::session::IdentityProvider;

/// Main TUI runner that owns the event loop.
pub struct TuiRunner {
    /// The terminal instance
    terminal: Tui,
    /// Application state and input handling
    app: App,
    /// Keyboard, tick and fetch events
    event_handler: EventHandler,
    source: Arc<dyn CatalogSource>,
    identity: Arc<dyn IdentityProvider>,
    tracker: RequestTracker,
}

impl TuiRunner {
    pub fn new(
        terminal: Tui,
        app: App,
        source: Arc<dyn CatalogSource>,
        identity: Arc<dyn IdentityProvider>,
        tick_rate_ms: u64,
    ) -> Self {
        Self {
            terminal,
            app,
            event_handler: EventHandler::new(tick_rate_ms),
            source,
            identity,
            tracker: RequestTracker::new(),
        }
    }

    /// Run the main TUI loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop with source {}", self.source.name());
        self.event_handler.start();
        fetch::spawn_categories(self.source.clone(), self.event_handler.sender());
        self.request_entries();

        loop {
            // 1. Render current state
            self.terminal.draw(|f| render(self.app.state(), f))?;

            // 2. Handle events
            match self.event_handler.next().await? {
                Event::Key(key) => {
                    self.app.state_mut().status_message = None;
                    if self.app.handle_key(key) {
                        break; // Quit requested
                    }
                }
                Event::Tick | Event::Resize(_, _) => {}
                Event::Fetch(event) => apply_fetch(self.app.state_mut(), &mut self.tracker, event),
            }

            // 3. Process pending actions
            self.process_pending_actions().await;

            if self.app.state().should_quit {
                break;
            }
        }

        info!("TUI main loop ended");
        Ok(())
    }

    /// Issue a new entries fetch, superseding any in flight.
    fn request_entries(&mut self) {
        let ticket = self.tracker.issue(entries_request(self.app.state()));
        self.app.state_mut().loading = true;
        fetch::spawn_entries(self.source.clone(), ticket, self.event_handler.sender());
    }

    async fn process_pending_actions(&mut self) {
        let Some(action) = self.app.state_mut().pending.take() else {
            return;
        };
        match action {
            PendingAction::Refetch => self.request_entries(),
            PendingAction::ToggleSession => {
                let state = self.app.state_mut();
                let signing_out = state.session.is_signed_in();
                let result = if signing_out {
                    state.session.sign_out(self.identity.as_ref()).await
                } else {
                    state.session.sign_in(self.identity.as_ref()).await
                };
                state.status_message = Some(match result {
                    Ok(()) if signing_out => "Signed out".to_string(),
                    Ok(()) => match state.session.session() {
                        Some(session) => format!("Signed in as {}", session.user().email),
                        None => "Signed in".to_string(),
                    },
                    Err(e) => format!("Sign-in failed: {}", e),
                });
            }
        }
    }
}

/// The request matching the current query.
///
/// Sources that filter server-side get the category and sort; others always
/// return the full catalog and the view narrows it locally.
pub fn entries_request(state: &AppState) -> FetchRequest {
    if state.server_side {
        let query = state.view.query();
        FetchRequest::new(query.category.clone(), query.sort)
    } else {
        FetchRequest::default()
    }
}

/// Fold a completed fetch into the state.
pub fn apply_fetch(state: &mut AppState, tracker: &mut RequestTracker, event: FetchEvent) {
    match event {
        FetchEvent::Entries { ticket, result } => {
            let current = tracker.is_current(&ticket);
            match tracker.settle(&ticket, result) {
                Settled::Apply(entries) => match CatalogStore::from_entries(entries) {
                    Ok(store) => {
                        info!("Loaded {} catalog entries", store.len());
                        state.install_store(store);
                    }
                    Err(e) => {
                        log::warn!("Rejecting catalog: {}", e);
                        state.status_message = Some(format!("Catalog rejected: {}", e));
                    }
                },
                Settled::Stale => {}
                Settled::FailedEmpty(e) => {
                    state.install_store(CatalogStore::empty());
                    state.status_message = Some(format!("Could not load catalog: {}", e));
                }
                Settled::FailedKeepPrevious(e) => {
                    state.status_message = Some(format!("Refresh failed, showing previous results: {}", e));
                }
            }
            if current {
                state.loading = false;
            }
        }
        FetchEvent::Categories(Ok(categories)) => state.categories = categories,
        FetchEvent::Categories(Err(e)) => {
            log::warn!("Category list unavailable: {}", e);
            state.status_message = Some(format!("Could not load categories: {}", e));
        }
    }
}
