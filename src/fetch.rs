//! Asynchronous catalog fetches with last-request-wins semantics
//!
//! Fetches run as tokio tasks and report back over an unbounded channel to
//! the single thread that owns the view. Every entries fetch carries a
//! `Ticket`; only the most recently issued ticket may update the view, so a
//! slow response to an outdated category or sort is dropped on arrival.
//! Category fetches are independent of entries fetches and never stale.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogSource, FetchRequest};
use crate::domain::CatalogEntry;
use crate::error::LoadError;

/// Handle of one issued entries fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: FetchRequest,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }
}

/// Completed fetch, delivered to the owning thread
#[derive(Debug)]
pub enum FetchEvent {
    Entries {
        ticket: Ticket,
        result: Result<Vec<CatalogEntry>, LoadError>,
    },
    Categories(Result<Vec<String>, LoadError>),
}

/// What the owner should do with a completed entries fetch
#[derive(Debug)]
pub enum Settled {
    /// Latest request succeeded: install these entries
    Apply(Vec<CatalogEntry>),
    /// A newer request was issued after this one
    Stale,
    /// Latest request failed and nothing was loaded yet: show empty
    FailedEmpty(LoadError),
    /// Latest request failed after an earlier success: keep what is shown
    FailedKeepPrevious(LoadError),
}

/// Tracks issued tickets and decides which responses may land
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    loaded: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones
    pub fn issue(&mut self, request: FetchRequest) -> Ticket {
        self.latest += 1;
        Ticket {
            generation: self.latest,
            request,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.latest
    }

    /// Whether any fetch has been applied yet
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Decide the fate of a completed fetch
    pub fn settle(&mut self, ticket: &Ticket, result: Result<Vec<CatalogEntry>, LoadError>) -> Settled {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.latest,
                "Discarding stale catalog response"
            );
            return Settled::Stale;
        }

        match result {
            Ok(entries) => {
                self.loaded = true;
                Settled::Apply(entries)
            }
            Err(error) if self.loaded => {
                tracing::warn!(error = %error, "Catalog refetch failed, keeping previous entries");
                Settled::FailedKeepPrevious(error)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Catalog load failed, showing empty catalog");
                Settled::FailedEmpty(error)
            }
        }
    }
}

/// Spawn an entries fetch that reports to `tx`
pub fn spawn_entries<T>(source: Arc<dyn CatalogSource>, ticket: Ticket, tx: mpsc::UnboundedSender<T>) -> JoinHandle<()>
where
    T: From<FetchEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let result = source.fetch_entries(ticket.request()).await;
        // Receiver gone means the owner shut down
        let _ = tx.send(FetchEvent::Entries { ticket, result }.into());
    })
}

/// Spawn a categories fetch that reports to `tx`
pub fn spawn_categories<T>(source: Arc<dyn CatalogSource>, tx: mpsc::UnboundedSender<T>) -> JoinHandle<()>
where
    T: From<FetchEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let result = source.list_categories().await;
        let _ = tx.send(FetchEvent::Categories(result).into());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortKey;
    use async_trait::async_trait;
    use std::time::Duration;

    fn entries(name: &str) -> Vec<CatalogEntry> {
        vec![CatalogEntry::new("1", name, "X")]
    }

    #[test]
    fn test_issue_supersedes_earlier_tickets() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(FetchRequest::default());
        let second = tracker.issue(FetchRequest::default());
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut tracker = RequestTracker::new();
        let old = tracker.issue(FetchRequest::new(Some("A".to_string()), None));
        let new = tracker.issue(FetchRequest::new(Some("B".to_string()), None));

        assert!(matches!(tracker.settle(&new, Ok(entries("new"))), Settled::Apply(_)));
        assert!(matches!(tracker.settle(&old, Ok(entries("old"))), Settled::Stale));
    }

    #[test]
    fn test_stale_response_arriving_first_is_discarded() {
        let mut tracker = RequestTracker::new();
        let old = tracker.issue(FetchRequest::default());
        let new = tracker.issue(FetchRequest::default());

        assert!(matches!(tracker.settle(&old, Ok(entries("old"))), Settled::Stale));
        assert!(!tracker.has_loaded());
        assert!(matches!(tracker.settle(&new, Ok(entries("new"))), Settled::Apply(_)));
    }

    #[test]
    fn test_first_failure_shows_empty() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(FetchRequest::default());
        let settled = tracker.settle(&ticket, Err(LoadError::Unreachable("down".to_string())));
        assert!(matches!(settled, Settled::FailedEmpty(_)));
    }

    #[test]
    fn test_refetch_failure_keeps_previous() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(FetchRequest::default());
        tracker.settle(&ticket, Ok(entries("a")));

        let ticket = tracker.issue(FetchRequest::default());
        let settled = tracker.settle(&ticket, Err(LoadError::Unreachable("down".to_string())));
        assert!(matches!(settled, Settled::FailedKeepPrevious(_)));
    }

    /// Source whose response time depends on the requested sort
    struct SlowSource;

    #[async_trait]
    impl CatalogSource for SlowSource {
        fn name(&self) -> &str {
            "slow"
        }

        async fn fetch_entries(&self, request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError> {
            let delay = match request.sort {
                Some(SortKey::Stars) => 200,
                _ => 10,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(entries(request.sort.map(|s| s.as_str()).unwrap_or("default")))
        }

        async fn list_categories(&self) -> Result<Vec<String>, LoadError> {
            Ok(vec!["X".to_string()])
        }
    }

    #[tokio::test]
    async fn test_slow_outdated_fetch_never_lands() {
        let source: Arc<dyn CatalogSource> = Arc::new(SlowSource);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tracker = RequestTracker::new();

        let slow = tracker.issue(FetchRequest::new(None, Some(SortKey::Stars)));
        spawn_entries(source.clone(), slow, tx.clone());
        let fast = tracker.issue(FetchRequest::new(None, Some(SortKey::Newest)));
        spawn_entries(source.clone(), fast, tx.clone());
        spawn_categories(source, tx);

        let mut applied = Vec::new();
        let mut stale = 0;
        let mut categories = None;
        while let Some(event) = rx.recv().await {
            match event {
                FetchEvent::Entries { ticket, result } => match tracker.settle(&ticket, result) {
                    Settled::Apply(e) => applied.push(e[0].name.clone()),
                    Settled::Stale => stale += 1,
                    other => panic!("unexpected {:?}", other),
                },
                FetchEvent::Categories(result) => categories = Some(result.unwrap()),
            }
        }

        assert_eq!(applied, vec!["newest"]);
        assert_eq!(stale, 1);
        assert_eq!(categories, Some(vec!["X".to_string()]));
    }
}
