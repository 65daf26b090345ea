//! Configuration loading for catalog-match.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/catalog-match/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CatalogError;

const APP_NAME: &str = "catalog-match";

/// Acceptance gate parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Minimum best score for a match to be accepted.
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f32,

    /// Minimum margin between the best and second-best score.
    /// Zero disables the margin rule.
    #[serde(default = "default_min_gap_delta")]
    pub min_gap_delta: f32,
}

fn default_accept_threshold() -> f32 {
    0.5
}

fn default_min_gap_delta() -> f32 {
    0.1
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            accept_threshold: default_accept_threshold(),
            min_gap_delta: default_min_gap_delta(),
        }
    }
}

/// Ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// How the index treats vector norms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NormCheckMode {
    /// Use vectors as stored; scores are raw dot products
    #[default]
    Trust,
    /// Reject vectors whose L2 norm is not within tolerance of 1
    Validate,
    /// L2-normalize copies of every vector
    Normalize,
}

/// Dense index parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Embedding dimension of the feature extractor
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default)]
    pub norm_check: NormCheckMode,

    /// Allowed deviation of the L2 norm from 1.0 when validating
    #[serde(default = "default_norm_tolerance")]
    pub norm_tolerance: f32,
}

fn default_dimension() -> usize {
    512
}

fn default_norm_tolerance() -> f32 {
    1e-3
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            norm_check: NormCheckMode::default(),
            norm_tolerance: default_norm_tolerance(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the SQLite catalog file
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub gate: GateSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub index: IndexSettings,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.data_local_dir().join("catalog.sqlite3"))
        .unwrap_or_else(|| PathBuf::from("./catalog.sqlite3"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level(),
            gate: GateSettings::default(),
            search: SearchSettings::default(),
            index: IndexSettings::default(),
        }
    }
}

fn config_err(e: config::ConfigError) -> CatalogError {
    CatalogError::Config(e.to_string())
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/catalog-match/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CATALOG_*, nested keys joined by `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, CatalogError> {
        let config_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(config_err)?
            .set_default("log_level", default_log_level())
            .map_err(config_err)?
            .set_default("gate.accept_threshold", default_accept_threshold() as f64)
            .map_err(config_err)?
            .set_default("gate.min_gap_delta", default_min_gap_delta() as f64)
            .map_err(config_err)?
            .set_default("search.top_k", default_top_k() as i64)
            .map_err(config_err)?
            .set_default("index.dimension", default_dimension() as i64)
            .map_err(config_err)?
            .set_default("index.norm_check", "trust")
            .map_err(config_err)?
            .set_default("index.norm_tolerance", default_norm_tolerance() as f64)
            .map_err(config_err)?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // CATALOG_DB_PATH, CATALOG_GATE__ACCEPT_THRESHOLD, ...
        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.gate.accept_threshold.is_finite() {
            return Err(CatalogError::Config(format!(
                "gate.accept_threshold must be finite, got {}",
                self.gate.accept_threshold
            )));
        }
        if !self.gate.min_gap_delta.is_finite() || self.gate.min_gap_delta < 0.0 {
            return Err(CatalogError::Config(format!(
                "gate.min_gap_delta must be >= 0, got {}",
                self.gate.min_gap_delta
            )));
        }
        if self.search.top_k == 0 {
            return Err(CatalogError::Config("search.top_k must be >= 1".to_string()));
        }
        if self.index.dimension == 0 {
            return Err(CatalogError::Config(
                "index.dimension must be >= 1".to_string(),
            ));
        }
        if self.index.norm_tolerance.is_nan() || self.index.norm_tolerance <= 0.0 {
            return Err(CatalogError::Config(format!(
                "index.norm_tolerance must be > 0, got {}",
                self.index.norm_tolerance
            )));
        }
        Ok(())
    }

    /// Expand ~ in db_path to the user's home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(&self.db_path)
    }
}
