//! Command implementations for the `catalog` binary.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use catalog_storage::{
    import_bundle, import_bundle_if_empty, BootstrapOutcome, CatalogStats, CatalogStore,
    ImportReport,
};
use catalog_types::Settings;
use catalog_vector::{CatalogMatcher, GatePolicy, IndexCoordinator, NormCheck, SearchResult};

use crate::cli::{QuerySource, SearchArgs};

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    db_path_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(db_path) = db_path_override {
        settings.db_path = db_path.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. Logs go to stderr; stdout carries
/// command output.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Open the configured catalog, creating the schema on first use.
fn open_store(settings: &Settings) -> Result<CatalogStore> {
    let db_path = settings.expanded_db_path();
    let store = CatalogStore::open(&db_path)
        .with_context(|| format!("Failed to open catalog at {}", db_path.display()))?;
    store
        .bootstrap_if_empty()
        .context("Failed to bootstrap catalog schema")?;
    Ok(store)
}

pub fn init_catalog(settings: &Settings) -> Result<BootstrapOutcome> {
    let db_path = settings.expanded_db_path();
    let store = CatalogStore::open(&db_path)
        .with_context(|| format!("Failed to open catalog at {}", db_path.display()))?;
    let outcome = store
        .bootstrap_if_empty()
        .context("Failed to bootstrap catalog schema")?;
    info!(path = %db_path.display(), ?outcome, "Catalog ready");
    Ok(outcome)
}

/// Import a bundle. Returns `None` when `if_empty` is set and the catalog
/// already has species.
pub fn import_catalog(
    settings: &Settings,
    bundle: &Path,
    if_empty: bool,
) -> Result<Option<ImportReport>> {
    let store = open_store(settings)?;
    let report = if if_empty {
        import_bundle_if_empty(&store, bundle)
    } else {
        import_bundle(&store, bundle).map(Some)
    }
    .with_context(|| format!("Failed to import {}", bundle.display()))?;
    Ok(report)
}

pub fn catalog_stats(settings: &Settings) -> Result<CatalogStats> {
    let store = open_store(settings)?;
    let stats = store.stats().context("Failed to read catalog statistics")?;

    for (dim, count) in &stats.dimensions {
        if *dim != settings.index.dimension {
            warn!(
                dim,
                count,
                configured = settings.index.dimension,
                "Catalog holds embeddings of an unexpected dimension"
            );
        }
    }
    Ok(stats)
}

/// Result of `catalog search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub results: Vec<SearchResult>,
    /// Gate decision; `None` when the gate was skipped
    pub accepted: Option<bool>,
}

pub async fn search_catalog(settings: &Settings, args: &SearchArgs) -> Result<SearchReport> {
    let store = Arc::new(open_store(settings)?);
    let query = read_query(&store, &args.query)?;

    if query.len() != settings.index.dimension {
        warn!(
            dim = query.len(),
            configured = settings.index.dimension,
            "Query dimension differs from configured index dimension"
        );
    }

    let coordinator = IndexCoordinator::new(store, NormCheck::from_settings(&settings.index));
    let policy = GatePolicy::new(
        args.threshold.unwrap_or(settings.gate.accept_threshold),
        args.gap.unwrap_or(settings.gate.min_gap_delta),
    );
    let top_k = args.top_k.unwrap_or(settings.search.top_k).max(1);
    let matcher = CatalogMatcher::new(coordinator, policy, top_k);

    let results = matcher
        .rank(&query, top_k)
        .await
        .context("Search failed")?;

    let accepted = if args.raw {
        None
    } else {
        Some(matcher.policy().decide(results.clone()).is_accepted())
    };

    Ok(SearchReport { results, accepted })
}

fn read_query(store: &CatalogStore, source: &QuerySource) -> Result<Vec<f32>> {
    match (&source.vector, source.like) {
        (Some(path), _) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read query vector {}", path.display()))?;
            let query: Vec<f32> = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a JSON array of numbers", path.display()))?;
            if query.is_empty() {
                bail!("Query vector in {} is empty", path.display());
            }
            Ok(query)
        }
        (None, Some(taxon_id)) => store
            .embedding_for(taxon_id)
            .context("Failed to read stored embedding")?
            .with_context(|| format!("Taxon {taxon_id} has no stored embedding")),
        (None, None) => bail!("Either --vector or --like is required"),
    }
}

pub fn print_import(bundle: &Path, report: Option<&ImportReport>) {
    match report {
        Some(report) => println!(
            "Imported {} species ({} without embedding, {} photos) from {}",
            report.imported,
            report.without_embedding,
            report.photos,
            bundle.display()
        ),
        None => println!("Catalog already populated; skipped {}", bundle.display()),
    }
}

pub fn print_stats(stats: &CatalogStats) {
    println!("Species:    {}", stats.species);
    println!("Photos:     {}", stats.photos);
    println!("Embeddings: {}", stats.embeddings);
    for (dim, count) in &stats.dimensions {
        println!("  dim {dim}: {count}");
    }
}

pub fn print_search(report: &SearchReport, as_json: bool) -> Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(report).context("Failed to encode report")?;
        println!("{json}");
        return Ok(());
    }

    if report.results.is_empty() {
        println!("No results");
    }
    for (rank, result) in report.results.iter().enumerate() {
        println!(
            "{:>3}. {:<40} {:>10}  {:.4}",
            rank + 1,
            result.name,
            result.taxon_id,
            result.score
        );
    }
    match report.accepted {
        Some(true) => println!("Decision: accepted"),
        Some(false) => println!("Decision: rejected"),
        None => {}
    }
    Ok(())
}
