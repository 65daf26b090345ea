//! Catalog CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (init, import, stats, search)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, QuerySource, SearchArgs};
pub use commands::{
    catalog_stats, import_catalog, init_catalog, init_logging, load_settings, print_import,
    print_search, print_stats, search_catalog, SearchReport,
};
