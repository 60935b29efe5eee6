//! Catalog view: store, query and manual order together
//!
//! The view owns the `QueryState` and recomputes the projection whenever it
//! changes. Any actual change to the query, or a new store, discards the
//! manual order; a partial order is never carried across different subsets.

use log::debug;

use crate::catalog::CatalogStore;
use crate::domain::{CatalogEntry, EntryId, Pricing, QueryState, SortKey};
use crate::error::ReorderError;
use crate::overlay::ManualOrder;
use crate::projection::natural_order;

/// Filtered, ordered and optionally hand-reordered view of a catalog
#[derive(Debug, Clone)]
pub struct CatalogView {
    store: CatalogStore,
    query: QueryState,
    natural: Vec<EntryId>,
    overlay: Option<ManualOrder>,
}

impl CatalogView {
    pub fn new(store: CatalogStore, query: QueryState) -> Self {
        let natural = natural_order(store.entries(), &query);
        Self {
            store,
            query,
            natural,
            overlay: None,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Apply `change` to the query; returns whether the query changed
    pub fn update_query(&mut self, change: impl FnOnce(&mut QueryState)) -> bool {
        let mut next = self.query.clone();
        change(&mut next);
        if next == self.query {
            return false;
        }

        self.query = next;
        self.recompute();
        true
    }

    pub fn set_category(&mut self, category: Option<String>) -> bool {
        self.update_query(|q| q.category = category)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.update_query(|q| q.search_text = text)
    }

    pub fn set_pricing(&mut self, pricing: Option<Pricing>) -> bool {
        self.update_query(|q| q.pricing = pricing)
    }

    pub fn set_min_rating(&mut self, rating: f32) -> bool {
        self.update_query(|q| q.min_rating = rating)
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) -> bool {
        self.update_query(|q| q.sort = sort)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.update_query(QueryState::clear_filters)
    }

    /// Install a freshly loaded store, keeping the query
    pub fn replace_store(&mut self, store: CatalogStore) {
        self.store = store;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.natural = natural_order(self.store.entries(), &self.query);
        if self.overlay.take().is_some() {
            debug!("Query changed, discarding manual order");
        }
    }

    /// Ids in display order
    pub fn order(&self) -> &[EntryId] {
        match &self.overlay {
            Some(overlay) => overlay.ids(),
            None => &self.natural,
        }
    }

    /// Ids in projection order, ignoring any manual order
    pub fn natural(&self) -> &[EntryId] {
        &self.natural
    }

    /// Entries in display order
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.order().iter().filter_map(|id| self.store.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.natural.len()
    }

    pub fn is_empty(&self) -> bool {
        self.natural.is_empty()
    }

    pub fn is_reordered(&self) -> bool {
        self.overlay.is_some()
    }

    /// Move the entry displayed at `source` to `target`
    ///
    /// A rejected move leaves the view exactly as it was.
    pub fn reorder(&mut self, source: usize, target: usize) -> Result<(), ReorderError> {
        self.apply_overlay(|overlay| overlay.reorder(source, target))
    }

    /// Drag-and-drop callback: drop `source_id` onto `target_id`
    pub fn reorder_ids(&mut self, source_id: &EntryId, target_id: &EntryId) -> Result<(), ReorderError> {
        self.apply_overlay(|overlay| overlay.reorder_ids(source_id, target_id))
    }

    fn apply_overlay(
        &mut self,
        change: impl FnOnce(&mut ManualOrder) -> Result<(), ReorderError>,
    ) -> Result<(), ReorderError> {
        let mut overlay = self
            .overlay
            .clone()
            .unwrap_or_else(|| ManualOrder::new(self.natural.clone()));
        change(&mut overlay)?;
        self.overlay = Some(overlay);
        Ok(())
    }
}
