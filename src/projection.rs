//! View projection
//!
//! Derives the visible subset and its order from the store and a
//! `QueryState`. Stages run in a fixed order (category, search, pricing,
//! rating, ordering) and each is skipped at its default value. Filtering never
//! reorders; an explicit sort is stable, so ties keep load order.

use std::cmp::Ordering;

use crate::domain::{CatalogEntry, EntryId, QueryState, SortKey};

/// Synthetic 2.0-5.0 rating derived from star count
///
/// Thresholds are strict: 100_000 stars is 4.5, 100_001 is 5.0.
pub fn rating_bucket(stars: u64) -> f32 {
    if stars > 100_000 {
        5.0
    } else if stars > 50_000 {
        4.5
    } else if stars > 10_000 {
        4.0
    } else if stars > 1_000 {
        3.0
    } else {
        2.0
    }
}

/// Whether `entry` passes every filter stage of `query`
///
/// `needle` is `query.search_needle()`, computed once by the caller.
fn passes(entry: &CatalogEntry, query: &QueryState, needle: Option<&str>) -> bool {
    if let Some(category) = &query.category
        && entry.category != *category
    {
        return false;
    }

    if let Some(needle) = needle
        && !entry.name.to_lowercase().contains(needle)
        && !entry.description.to_lowercase().contains(needle)
    {
        return false;
    }

    if let Some(pricing) = query.pricing
        && entry.pricing != pricing
    {
        return false;
    }

    if query.min_rating > 0.0 && rating_bucket(entry.stars) < query.min_rating {
        return false;
    }

    true
}

/// Whether `entry` is part of the projection of `query`
pub fn matches(entry: &CatalogEntry, query: &QueryState) -> bool {
    passes(entry, query, query.search_needle().as_deref())
}

/// Descending comparison for `key`
fn compare_desc(key: SortKey, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    match key {
        SortKey::Score => b.score.total_cmp(&a.score),
        SortKey::Stars => b.stars.cmp(&a.stars),
        // None < Some, so reversed order puts missing dates last
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Updated => b.last_updated.cmp(&a.last_updated),
    }
}

/// Project `entries` through `query`
///
/// Returns a new sequence of references; the backing slice is untouched.
pub fn project<'a>(entries: &'a [CatalogEntry], query: &QueryState) -> Vec<&'a CatalogEntry> {
    let needle = query.search_needle();
    let mut result: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|e| passes(e, query, needle.as_deref()))
        .collect();

    if let Some(key) = query.sort {
        // sort_by is stable
        result.sort_by(|a, b| compare_desc(key, a, b));
    }

    result
}

/// Ids of the projection, in natural order
pub fn natural_order(entries: &[CatalogEntry], query: &QueryState) -> Vec<EntryId> {
    project(entries, query).into_iter().map(|e| e.id.clone()).collect()
}

/// Split a projected view into featured and regular entries
///
/// Order within each half is preserved.
pub fn split_featured<'a>(
    entries: &[&'a CatalogEntry],
    featured_names: &[String],
) -> (Vec<&'a CatalogEntry>, Vec<&'a CatalogEntry>) {
    entries
        .iter()
        .copied()
        .partition(|e| featured_names.iter().any(|name| *name == e.name))
}
