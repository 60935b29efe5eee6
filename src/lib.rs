//! toolscout - filter, sort and reorder a catalog of AI tools
//!
//! The catalog is loaded once from a source (bundled data, a JSON file or a
//! catalog API) into an immutable store. Everything shown is a projection of
//! that store through the current query, optionally overlaid with a manual
//! order that lasts until the query changes.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod format;
pub mod overlay;
pub mod projection;
pub mod session;
pub mod tui;
pub mod view;

pub use error::{Result, ScoutError};
