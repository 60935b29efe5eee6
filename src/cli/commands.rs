//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - list: print the projected catalog
//! - categories: print the category names
//! - show: print one entry

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{QueryState, SortKey, parse_category, parse_pricing_facet};
use crate::error::{Result, ScoutError};

/// toolscout - browse and filter a catalog of AI tools
#[derive(Parser, Debug)]
#[command(name = "toolscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read the catalog from a local JSON file
    #[arg(long, global = true, conflicts_with = "api")]
    pub file: Option<PathBuf>,

    /// Fetch the catalog from an API base URL
    #[arg(long, global = true)]
    pub api: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Filter and sort flags shared by commands that project the catalog
#[derive(clap::Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Category to show ("All" for every category)
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Case-insensitive text to find in name or description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Pricing facet (Free, Open Source, Freemium, Paid, Unknown, All)
    #[arg(short, long)]
    pub pricing: Option<String>,

    /// Minimum derived rating (2, 3, 4, 4.5, 5; 0 disables)
    #[arg(short = 'r', long, default_value_t = 0.0)]
    pub min_rating: f32,

    /// Sort descending by this field instead of load order
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,
}

impl QueryArgs {
    /// Build the query; `default_sort` applies when no `--sort` is given
    pub fn to_query(&self, default_sort: Option<SortKey>) -> Result<QueryState> {
        if !(0.0..=5.0).contains(&self.min_rating) {
            return Err(ScoutError::InvalidFacet(format!(
                "min rating {} is outside 0-5",
                self.min_rating
            )));
        }

        let pricing = match &self.pricing {
            Some(p) => parse_pricing_facet(p).map_err(ScoutError::InvalidFacet)?,
            None => None,
        };

        Ok(QueryState {
            search_text: self.search.clone().unwrap_or_default(),
            category: self.category.as_deref().and_then(parse_category),
            pricing,
            min_rating: self.min_rating,
            sort: self.sort.or(default_sort),
        })
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog entries matching the filters
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List category names
    Categories,

    /// Show a single entry
    Show {
        /// Entry id (see `list`)
        id: String,
    },
}
