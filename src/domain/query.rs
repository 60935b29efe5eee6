//! Query state for projecting the catalog
//!
//! `QueryState` is transient view state: created with defaults, mutated by
//! user input, never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entry::Pricing;

/// Wildcard facet value accepted from users; never stored on an entry
pub const ALL: &str = "All";

/// Minimum-rating facet values offered to users, 0 meaning no filter
pub const RATING_FACETS: [f32; 5] = [0.0, 5.0, 4.0, 3.0, 2.0];

/// Field an explicit sort orders by, always descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Score,
    Stars,
    Newest,
    Updated,
}

impl SortKey {
    /// Value used for the catalog API's `sort_by` parameter
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Stars => "stars",
            SortKey::Newest => "newest",
            SortKey::Updated => "updated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Score => "Top Ranked",
            SortKey::Stars => "Most Stars",
            SortKey::Newest => "Newest",
            SortKey::Updated => "Recently Updated",
        }
    }

    /// Cycle through load order and each key
    pub fn cycle(current: Option<SortKey>) -> Option<SortKey> {
        match current {
            None => Some(SortKey::Score),
            Some(SortKey::Score) => Some(SortKey::Stars),
            Some(SortKey::Stars) => Some(SortKey::Newest),
            Some(SortKey::Newest) => Some(SortKey::Updated),
            Some(SortKey::Updated) => None,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "score" => Ok(SortKey::Score),
            "stars" => Ok(SortKey::Stars),
            "newest" => Ok(SortKey::Newest),
            "updated" => Ok(SortKey::Updated),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a category facet; "All" (any case) and blank mean no filter
pub fn parse_category(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a pricing facet; "All" means no filter
pub fn parse_pricing_facet(value: &str) -> Result<Option<Pricing>, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    value.parse::<Pricing>().map(Some)
}

/// Current filters and ordering of a catalog view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    /// Free-text filter over name and description
    pub search_text: String,
    /// Selected category; `None` is "All"
    pub category: Option<String>,
    /// Selected pricing facet; `None` is "All"
    pub pricing: Option<Pricing>,
    /// Minimum derived rating; 0 disables the facet
    pub min_rating: f32,
    /// Explicit ordering; `None` keeps load order
    pub sort: Option<SortKey>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = parse_category(&category.into());
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn with_min_rating(mut self, rating: f32) -> Self {
        self.min_rating = rating;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Lower-cased search needle, or `None` when the search is a no-op
    ///
    /// Surrounding whitespace is trimmed, so whitespace-only text disables
    /// the search filter.
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Label of the selected category tab
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL)
    }

    /// True when every stage of the projection is a no-op
    pub fn is_identity(&self) -> bool {
        self.category.is_none()
            && self.search_needle().is_none()
            && self.pricing.is_none()
            && self.min_rating <= 0.0
            && self.sort.is_none()
    }

    /// Reset all filters, keeping the sort key
    pub fn clear_filters(&mut self) {
        self.search_text.clear();
        self.category = None;
        self.pricing = None;
        self.min_rating = 0.0;
    }
}
