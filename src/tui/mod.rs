//! Terminal browser for the catalog.
//!
//! A single-screen interface: category tabs across the top, the filtered
//! entry list on the left and the selected entry's details on the right.
//! Facet keys narrow the list locally; category and sort changes refetch
//! when the source applies them server-side.

mod app;
mod events;
mod runner;
mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode, PendingAction};

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
///
/// Enables raw mode and switches to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Pricing badge colors plus chrome.
pub mod colors {
    use ratatui::style::Color;

    use crate::domain::Pricing;

    pub const FREE: Color = Color::Rgb(16, 185, 129); // Emerald
    pub const OPEN_SOURCE: Color = Color::Rgb(59, 130, 246); // Blue
    pub const PAID: Color = Color::Rgb(245, 158, 11); // Amber
    pub const FREEMIUM: Color = Color::Rgb(168, 85, 247); // Purple
    pub const UNKNOWN: Color = Color::Rgb(100, 116, 139); // Slate
    pub const FEATURED: Color = Color::Rgb(255, 215, 0); // Gold
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DIM: Color = Color::DarkGray;

    pub fn pricing(pricing: Pricing) -> Color {
        match pricing {
            Pricing::Free => FREE,
            Pricing::OpenSource => OPEN_SOURCE,
            Pricing::Paid => PAID,
            Pricing::Freemium => FREEMIUM,
            Pricing::Unknown => UNKNOWN,
        }
    }
}
