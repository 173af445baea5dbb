//! Runtime configuration
//!
//! Resolved from environment variables with defaults:
//! - `CURRICULUM_DB`: database file, or `:memory:` for an in-memory store
//! - `CURRICULUM_PRECISION`: decimals for coverage percentages (0..=6)
//! - `CURRICULUM_TREND_LIMIT`: number of skills in the market trends list

use crate::coverage::{AnalyzerConfig, MAX_PRECISION};
use std::path::PathBuf;

pub const DB_ENV: &str = "CURRICULUM_DB";
pub const PRECISION_ENV: &str = "CURRICULUM_PRECISION";
pub const TREND_LIMIT_ENV: &str = "CURRICULUM_TREND_LIMIT";

const IN_MEMORY_MARKER: &str = ":memory:";
const DEFAULT_TREND_LIMIT: usize = 10;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Where entities are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreLocation,
    pub analyzer: AnalyzerConfig,
    pub trend_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::File(default_db_path()),
            analyzer: AnalyzerConfig::default(),
            trend_limit: DEFAULT_TREND_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(db) = lookup(DB_ENV).filter(|v| !v.trim().is_empty()) {
            config.store = parse_location(db.trim());
        }

        if let Some(raw) = lookup(PRECISION_ENV) {
            let precision: u32 = parse_value(PRECISION_ENV, &raw)?;
            if precision > MAX_PRECISION {
                return Err(ConfigError::InvalidValue {
                    var: PRECISION_ENV,
                    value: raw,
                });
            }
            config.analyzer.precision = precision;
        }

        if let Some(raw) = lookup(TREND_LIMIT_ENV) {
            config.trend_limit = parse_value(TREND_LIMIT_ENV, &raw)?;
        }

        log::debug!("[CONFIG] Resolved {:?}", config);
        Ok(config)
    }
}

/// `:memory:` selects the in-memory store, anything else is a file path
pub fn parse_location(value: &str) -> StoreLocation {
    if value == IN_MEMORY_MARKER {
        StoreLocation::InMemory
    } else {
        StoreLocation::File(PathBuf::from(value))
    }
}

/// `<local data dir>/curriculum_mapper/curriculum.db`, or `./curriculum.db`
pub fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("curriculum_mapper").join("curriculum.db"),
        None => PathBuf::from("curriculum.db"),
    }
}

fn parse_value<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}
