//! CLI argument parsing for the `catalog` binary.
//!
//! CLI flags override every other configuration source.

use std::path::PathBuf;

use catalog_types::TaxonId;
use clap::{Args, Parser, Subcommand};

/// Species catalog and embedding search
///
/// Manages the on-disk catalog and runs gated nearest-match queries
/// against its embeddings.
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/catalog-match/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override catalog database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Catalog commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog schema if it is missing
    Init,

    /// Import a JSON catalog bundle
    Import {
        /// Bundle file (`{"items": [...]}` or a bare array of entities)
        bundle: PathBuf,

        /// Only import when the catalog has no species yet
        #[arg(long)]
        if_empty: bool,
    },

    /// Show catalog statistics
    Stats,

    /// Rank catalog entries against a query embedding
    Search(SearchArgs),
}

/// Arguments for `catalog search`
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QuerySource,

    /// Number of results (default from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Minimum best score to accept (default from config)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Minimum margin between best and runner-up (default from config)
    #[arg(long)]
    pub gap: Option<f32>,

    /// Print ranked results without applying the acceptance gate
    #[arg(long)]
    pub raw: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Where the query embedding comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct QuerySource {
    /// JSON file holding an array of floats
    #[arg(long)]
    pub vector: Option<PathBuf>,

    /// Use the stored embedding of this taxon as the query
    #[arg(long)]
    pub like: Option<TaxonId>,
}
