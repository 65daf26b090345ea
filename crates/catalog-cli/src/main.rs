//! Species catalog CLI
//!
//! # Usage
//!
//! ```bash
//! catalog init
//! catalog import bundle.json [--if-empty]
//! catalog stats
//! catalog search (--vector query.json | --like TAXON_ID) [-k N] [--threshold T] [--gap G] [--raw]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/catalog-match/config.toml)
//! 3. File given with --config
//! 4. Environment variables (CATALOG_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use catalog_cli::{
    catalog_stats, import_catalog, init_catalog, init_logging, load_settings, print_import,
    print_search, print_stats, search_catalog, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.db_path.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Init => {
            let outcome = init_catalog(&settings)?;
            println!("{:?}: {}", outcome, settings.expanded_db_path().display());
        }
        Commands::Import { bundle, if_empty } => {
            let report = import_catalog(&settings, &bundle, if_empty)?;
            print_import(&bundle, report.as_ref());
        }
        Commands::Stats => {
            print_stats(&catalog_stats(&settings)?);
        }
        Commands::Search(args) => {
            let report = search_catalog(&settings, &args).await?;
            print_search(&report, args.json)?;
        }
    }

    Ok(())
}
