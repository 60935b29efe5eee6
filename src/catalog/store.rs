//! Immutable catalog store
//!
//! Holds the full set of entries as loaded. Cloning is cheap: the entries
//! live behind an `Arc<[CatalogEntry]>` and nothing hands out `&mut`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{CatalogEntry, EntryId, RawEntry};
use crate::error::LoadError;

/// Read-only collection of catalog entries in load order
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    entries: Arc<[CatalogEntry]>,
    index: Arc<HashMap<EntryId, usize>>,
}

impl CatalogStore {
    /// Create an empty store (the degraded state after a failed first load)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from already-normalized entries
    ///
    /// Fails when two entries share an id.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), pos).is_some() {
                return Err(LoadError::DuplicateId(entry.id.to_string()));
            }
        }

        Ok(Self {
            entries: entries.into(),
            index: Arc::new(index),
        })
    }

    /// Decode a JSON array of catalog records
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        Self::from_entries(parse_entries(content)?)
    }

    /// All entries in load order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by id
    pub fn get(&self, id: &EntryId) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Load position of an entry
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories present in the store, sorted
    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Decode and normalize a JSON array of catalog records
pub fn parse_entries(content: &str) -> Result<Vec<CatalogEntry>, LoadError> {
    let raw: Vec<RawEntry> = serde_json::from_str(content)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.into_entry(i))
        .collect()
}
