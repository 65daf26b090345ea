//! Error types shared across the catalog crates.

use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
