//! Catalog entry and pricing types
//!
//! A `CatalogEntry` is one listed tool or agent. Source records are loose
//! (missing ids, null descriptions, pricing in any case), so they are decoded
//! into `RawEntry` first and normalized by `RawEntry::into_entry`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Category assigned to records that carry none
pub const DEFAULT_CATEGORY: &str = "AI Productivity";

/// Entries updated within this many days get the freshness boost
const FRESH_DAYS: i64 = 30;

/// Popularity score for records the source did not rank
///
/// `stars + 2 * forks`, boosted by 20% when updated in the last 30 days,
/// rounded to two decimals.
pub fn popularity_score(stars: u64, forks: u64, last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let mut score = stars as f64 + forks as f64 * 2.0;
    if let Some(updated) = last_updated
        && now - updated < Duration::days(FRESH_DAYS)
    {
        score *= 1.2;
    }
    (score * 100.0).round() / 100.0
}

/// Stable identifier of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id assigned to the record at `index` when the source has none
    pub fn from_index(index: usize) -> Self {
        Self(format!("tool-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pricing model of a listed tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Pricing {
    Free,
    OpenSource,
    Freemium,
    Paid,
    #[default]
    Unknown,
}

impl Pricing {
    /// All pricing values, in facet display order
    pub const ALL: [Pricing; 5] = [
        Pricing::OpenSource,
        Pricing::Free,
        Pricing::Freemium,
        Pricing::Paid,
        Pricing::Unknown,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Pricing::Free => "Free",
            Pricing::OpenSource => "Open Source",
            Pricing::Freemium => "Freemium",
            Pricing::Paid => "Paid",
            Pricing::Unknown => "Unknown",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "free" => Some(Pricing::Free),
            "open source" | "open-source" | "opensource" | "free/open source" => Some(Pricing::OpenSource),
            "freemium" => Some(Pricing::Freemium),
            "paid" => Some(Pricing::Paid),
            "unknown" | "" => Some(Pricing::Unknown),
            _ => None,
        }
    }

    /// Normalize a source value; anything unrecognized is `Unknown`
    pub fn normalize(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Pricing::Unknown)
    }
}

impl FromStr for Pricing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown pricing '{}'", s))
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Pricing> for String {
    fn from(p: Pricing) -> Self {
        p.label().to_string()
    }
}

impl From<String> for Pricing {
    fn from(s: String) -> Self {
        Pricing::normalize(Some(&s))
    }
}

/// One listed tool or agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub pricing: Pricing,
    pub stars: u64,
    pub forks: u64,
    pub downloads: u64,
    pub score: f64,
    pub url: String,
    pub repo_url: Option<String>,
    pub license: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    /// Minimal entry, mostly for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(id),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            pricing: Pricing::Unknown,
            stars: 0,
            forks: 0,
            downloads: 0,
            score: 0.0,
            url: String::new(),
            repo_url: None,
            license: None,
            created_at: None,
            last_updated: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = stars;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }

    /// Timestamp shown on cards: last update, falling back to creation
    pub fn display_date(&self) -> Option<DateTime<Utc>> {
        self.last_updated.or(self.created_at)
    }
}

/// Source ids come as numbers (database rows) or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// Catalog record as found in the source data
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    pricing: Option<String>,
    #[serde(default)]
    stars: Option<u64>,
    #[serde(default)]
    forks: Option<u64>,
    #[serde(default)]
    downloads: Option<u64>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    repo_url: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

impl RawEntry {
    /// Normalize into a `CatalogEntry`; `index` is the record's load position
    pub fn into_entry(self, index: usize) -> Result<CatalogEntry, LoadError> {
        let name = self.name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            return Err(LoadError::Malformed(format!("record {} has no name", index)));
        }

        let id = match self.id {
            Some(RawId::Number(n)) => EntryId::new(n.to_string()),
            Some(RawId::Text(s)) if !s.trim().is_empty() => EntryId::new(s),
            _ => EntryId::from_index(index),
        };

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let stars = self.stars.unwrap_or(0);
        let forks = self.forks.unwrap_or(0);
        let last_updated = self.last_updated.as_deref().and_then(parse_timestamp);
        let score = self
            .score
            .filter(|s| s.is_finite() && *s >= 0.0)
            .unwrap_or_else(|| popularity_score(stars, forks, last_updated, Utc::now()));

        Ok(CatalogEntry {
            id,
            name,
            description: self.description.unwrap_or_default(),
            category,
            pricing: Pricing::normalize(self.pricing.as_deref()),
            stars,
            forks,
            downloads: self.downloads.unwrap_or(0),
            score,
            url: self.url.unwrap_or_default(),
            repo_url: self.repo_url,
            license: self.license,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            last_updated,
        })
    }
}

/// Parse the timestamp shapes seen in catalog data
///
/// Returns `None` for anything unrecognized; dates are display-only.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw(json: &str) -> RawEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_pricing_normalize_case_insensitive() {
        assert_eq!(Pricing::normalize(Some("FREEMIUM")), Pricing::Freemium);
        assert_eq!(Pricing::normalize(Some("open source")), Pricing::OpenSource);
        assert_eq!(Pricing::normalize(Some("Free/Open Source")), Pricing::OpenSource);
        assert_eq!(Pricing::normalize(Some(" paid ")), Pricing::Paid);
    }

    #[test]
    fn test_pricing_normalize_unknown() {
        assert_eq!(Pricing::normalize(None), Pricing::Unknown);
        assert_eq!(Pricing::normalize(Some("")), Pricing::Unknown);
        assert_eq!(Pricing::normalize(Some("enterprise")), Pricing::Unknown);
    }

    #[test]
    fn test_pricing_from_str_rejects_garbage() {
        assert_eq!("Paid".parse::<Pricing>(), Ok(Pricing::Paid));
        assert!("platinum".parse::<Pricing>().is_err());
    }

    #[test]
    fn test_pricing_serializes_as_label() {
        let json = serde_json::to_string(&Pricing::OpenSource).unwrap();
        assert_eq!(json, "\"Open Source\"");
    }

    #[test]
    fn test_raw_entry_defaults() {
        let entry = raw(r#"{"name": "Alpha"}"#).into_entry(3).unwrap();
        assert_eq!(entry.id, EntryId::new("tool-3"));
        assert_eq!(entry.description, "");
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert_eq!(entry.pricing, Pricing::Unknown);
        assert_eq!(entry.stars, 0);
        assert_eq!(entry.forks, 0);
        assert_eq!(entry.downloads, 0);
        assert_eq!(entry.score, 0.0);
    }

    #[test]
    fn test_missing_score_is_derived_from_popularity() {
        let entry = raw(r#"{"name": "Alpha", "stars": 100, "forks": 10}"#).into_entry(0).unwrap();
        assert_eq!(entry.score, 120.0);

        let ranked = raw(r#"{"name": "Beta", "stars": 100, "score": 7.5}"#).into_entry(1).unwrap();
        assert_eq!(ranked.score, 7.5);
    }

    #[test]
    fn test_popularity_score_freshness_boost() {
        let now = parse_timestamp("2025-06-30").unwrap();
        let recent = parse_timestamp("2025-06-20").unwrap();
        let stale = parse_timestamp("2025-01-01").unwrap();

        assert_eq!(popularity_score(1000, 50, None, now), 1100.0);
        assert_eq!(popularity_score(1000, 50, Some(stale), now), 1100.0);
        assert_eq!(popularity_score(1000, 50, Some(recent), now), 1320.0);
        assert_eq!(popularity_score(0, 0, Some(recent), now), 0.0);
    }

    #[test]
    fn test_raw_entry_null_description() {
        let entry = raw(r#"{"name": "Alpha", "description": null, "stars": null}"#)
            .into_entry(0)
            .unwrap();
        assert_eq!(entry.description, "");
        assert_eq!(entry.stars, 0);
    }

    #[test]
    fn test_raw_entry_numeric_id() {
        let entry = raw(r#"{"id": 42, "name": "Alpha"}"#).into_entry(0).unwrap();
        assert_eq!(entry.id.as_str(), "42");
    }

    #[test]
    fn test_raw_entry_requires_name() {
        let err = raw(r#"{"name": "  "}"#).into_entry(5).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_raw_entry_rejects_negative_stars() {
        let result = serde_json::from_str::<RawEntry>(r#"{"name": "Alpha", "stars": -4}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:20:30Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let sqlite = parse_timestamp("2024-03-01 10:20:30.123456").unwrap();
        assert_eq!(sqlite.minute(), 20);

        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date.day(), 1);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_display_date_prefers_last_updated() {
        let created = parse_timestamp("2023-01-01").unwrap();
        let updated = parse_timestamp("2024-01-01").unwrap();
        let entry = CatalogEntry::new("1", "Alpha", "AI Chatbots").with_created_at(created);
        assert_eq!(entry.display_date(), Some(created));

        let entry = entry.with_last_updated(updated);
        assert_eq!(entry.display_date(), Some(updated));
    }
}
