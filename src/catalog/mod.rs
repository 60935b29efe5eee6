//! Catalog loading and storage
//!
//! - `CatalogStore`: the immutable, loaded-once collection
//! - `CatalogSource`: bundled, file and HTTP origins of that collection
//! - `CatalogSnapshot`: entries and categories loaded together, degrading on failure

pub mod snapshot;
pub mod source;
pub mod store;

pub use snapshot::CatalogSnapshot;
pub use source::{BundledSource, CatalogSource, DEFAULT_TIMEOUT, FetchRequest, FileSource, HttpSource};
pub use store::{CatalogStore, parse_entries};
