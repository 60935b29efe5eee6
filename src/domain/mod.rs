//! Domain types for toolscout
//!
//! - CatalogEntry: one listed tool, with its `Pricing` and `EntryId`
//! - QueryState: filters and ordering applied to the catalog

pub mod entry;
pub mod query;

pub use entry::{CatalogEntry, DEFAULT_CATEGORY, EntryId, Pricing, RawEntry, parse_timestamp, popularity_score};
pub use query::{ALL, QueryState, RATING_FACETS, SortKey, parse_category, parse_pricing_facet};
