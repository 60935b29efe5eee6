//! One-shot catalog load for the command line
//!
//! Entries and categories are fetched concurrently and independently. A
//! failure in either degrades instead of aborting: no entries means an empty
//! store, no category list means the categories found in the entries.

use log::warn;

use super::source::{CatalogSource, FetchRequest};
use super::store::CatalogStore;
use crate::error::LoadError;

/// Entries and categories as loaded, plus what went wrong
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub store: CatalogStore,
    pub categories: Vec<String>,
    pub problems: Vec<LoadError>,
}

impl CatalogSnapshot {
    pub async fn load(source: &dyn CatalogSource, request: &FetchRequest) -> Self {
        let (entries, categories) = futures::join!(source.fetch_entries(request), source.list_categories());
        let mut problems = Vec::new();

        let store = match entries.and_then(CatalogStore::from_entries) {
            Ok(store) => store,
            Err(e) => {
                warn!("Catalog load from {} failed, showing empty catalog: {}", source.name(), e);
                problems.push(e);
                CatalogStore::empty()
            }
        };

        let categories = match categories {
            Ok(categories) => categories,
            Err(e) => {
                warn!("Category list from {} unavailable: {}", source.name(), e);
                problems.push(e);
                store.categories()
            }
        };

        Self {
            store,
            categories,
            problems,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.problems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogEntry;
    use async_trait::async_trait;

    /// Source whose two endpoints can fail independently
    struct FlakySource {
        entries_fail: bool,
        categories_fail: bool,
    }

    #[async_trait]
    impl CatalogSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_entries(&self, _request: &FetchRequest) -> Result<Vec<CatalogEntry>, LoadError> {
            if self.entries_fail {
                return Err(LoadError::Unreachable("connection refused".to_string()));
            }
            Ok(vec![
                CatalogEntry::new("1", "Alpha", "AI Chatbots"),
                CatalogEntry::new("2", "Beta", "AI Coding Assistance"),
            ])
        }

        async fn list_categories(&self) -> Result<Vec<String>, LoadError> {
            if self.categories_fail {
                return Err(LoadError::Status {
                    status: 500,
                    url: "http://x/api/tools/categories".to_string(),
                });
            }
            Ok(vec!["AI Chatbots".to_string()])
        }
    }

    async fn load(entries_fail: bool, categories_fail: bool) -> CatalogSnapshot {
        let source = FlakySource {
            entries_fail,
            categories_fail,
        };
        CatalogSnapshot::load(&source, &FetchRequest::default()).await
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let snapshot = load(false, false).await;
        assert_eq!(snapshot.store.len(), 2);
        assert_eq!(snapshot.categories, vec!["AI Chatbots"]);
        assert!(!snapshot.is_degraded());
    }

    #[tokio::test]
    async fn test_categories_failure_keeps_entries() {
        let snapshot = load(false, true).await;
        assert_eq!(snapshot.store.len(), 2);
        assert_eq!(snapshot.categories, vec!["AI Chatbots", "AI Coding Assistance"]);
        assert!(matches!(snapshot.problems.as_slice(), [LoadError::Status { status: 500, .. }]));
    }

    #[tokio::test]
    async fn test_entries_failure_degrades_to_empty() {
        let snapshot = load(true, false).await;
        assert!(snapshot.store.is_empty());
        assert_eq!(snapshot.categories, vec!["AI Chatbots"]);
        assert!(matches!(snapshot.problems.as_slice(), [LoadError::Unreachable(_)]));
    }

    #[tokio::test]
    async fn test_both_fail() {
        let snapshot = load(true, true).await;
        assert!(snapshot.store.is_empty());
        assert!(snapshot.categories.is_empty());
        assert_eq!(snapshot.problems.len(), 2);
    }
}
