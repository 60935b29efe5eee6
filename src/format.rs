//! Display helpers shared by the CLI and the terminal browser

use chrono::{DateTime, Utc};

use crate::domain::CatalogEntry;
use crate::projection::rating_bucket;

/// Compact count: 950, 1.5k, 2.3M
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Calendar date of a timestamp, or a dash when absent
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Five-star strip for a rating bucket, e.g. "★★★★☆"
pub fn rating_stars(rating: f32) -> String {
    let full = rating.floor().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// One-line summary used by `list`
pub fn summary_line(entry: &CatalogEntry) -> String {
    let rating = rating_bucket(entry.stars);
    format!(
        "{:<10} {:<28} {:<24} {:<11} {} {:.1}  {:>7} stars",
        entry.id.as_str(),
        truncate(&entry.name, 28),
        truncate(&entry.category, 24),
        entry.pricing.label(),
        rating_stars(rating),
        rating,
        format_number(entry.stars),
    )
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
