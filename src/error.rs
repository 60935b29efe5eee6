//! Error types for toolscout
//!
//! Centralized error handling using thiserror. Each layer has its own enum so
//! callers can decide locally how to degrade: a `LoadError` becomes an empty
//! catalog, a `ReorderError` is ignored by the view.

use thiserror::Error;

/// Failure to obtain or decode the catalog collection
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source could not be reached (connection refused, timeout, missing file)
    #[error("Catalog source unreachable: {0}")]
    Unreachable(String),

    /// HTTP source answered with a non-success status
    #[error("Catalog source returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Data was reachable but not a valid catalog
    #[error("Malformed catalog data: {0}")]
    Malformed(String),

    /// Two records share the same id
    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),

    /// IO error while reading a local catalog
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            LoadError::Status {
                status: status.as_u16(),
                url,
            }
        } else if err.is_decode() {
            LoadError::Malformed(err.to_string())
        } else {
            LoadError::Unreachable(err.to_string())
        }
    }
}

/// Invalid manual reorder request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// Source and target are the same position
    #[error("Source and target are both {0}")]
    SameIndex(usize),

    /// Index outside the current sequence
    #[error("Index {index} out of bounds for {len} entries")]
    OutOfBounds { index: usize, len: usize },

    /// Id not present in the current view
    #[error("Entry not in current view: {0}")]
    UnknownId(String),
}

/// Identity provider failures
#[derive(Debug, Error)]
pub enum SessionError {
    /// No profile configured for the local provider
    #[error("No identity profile configured")]
    NoProfile,

    /// Email identifier is not email-shaped
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Provider rejected the request
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// All error types that can occur in toolscout
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Facet value given on the command line or in config is not recognized
    #[error("Invalid facet: {0}")]
    InvalidFacet(String),

    /// Requested entry does not exist
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;
