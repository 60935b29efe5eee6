//! Event handling for the TUI.
//!
//! This module provides:
//! - `Event`: the unified event type (keyboard, tick, resize, fetch results)
//! - `EventHandler`: one channel fed by a terminal reader and by fetch tasks
//!
//! Fetch results travel through the same channel as key presses, so the
//! runner handles both on its single control thread.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::{Result, eyre};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::fetch::FetchEvent;

/// Unified event type for the TUI.
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Periodic tick when the terminal is idle
    Tick,
    /// Terminal resize
    Resize(u16, u16),
    /// A catalog fetch completed
    Fetch(FetchEvent),
}

impl From<FetchEvent> for Event {
    fn from(event: FetchEvent) -> Self {
        Event::Fetch(event)
    }
}

/// Merges terminal input and background results into one stream.
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            tx,
            rx,
        }
    }

    /// Sender for background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Start reading terminal events on a blocking thread.
    ///
    /// The reader stops once the handler is dropped.
    pub fn start(&self) {
        let tx = self.tx.clone();
        let tick_rate = self.tick_rate;

        tokio::task::spawn_blocking(move || {
            while !tx.is_closed() {
                let event = match read_terminal(tick_rate) {
                    Ok(event) => event,
                    Err(e) => {
                        log::error!("Terminal event error: {}", e);
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre!("Event channel closed"))
    }
}

/// Poll the terminal once; a timeout becomes a tick.
fn read_terminal(tick_rate: Duration) -> std::io::Result<Event> {
    if !event::poll(tick_rate)? {
        return Ok(Event::Tick);
    }
    Ok(match event::read()? {
        // Only handle key press events, not release
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
        _ => Event::Tick,
    })
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(250) // 250ms tick rate by default
    }
}
