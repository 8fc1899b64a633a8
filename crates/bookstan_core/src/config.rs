//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::default_log_level;
use crate::paging::normalize_page_size;
use crate::paging::DEFAULT_PAGE_SIZE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BOOKSTAN_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BOOKSTAN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKSTAN_LOG_DIR";
pub const PAGE_SIZE_ENV: &str = "BOOKSTAN_PAGE_SIZE";

const DEFAULT_DB_FILE_NAME: &str = "bookstan.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPageSize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageSize(value) => write!(
                f,
                "{PAGE_SIZE_ENV} must be a non-negative integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub default_page_size: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    /// Reads `BOOKSTAN_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let default_page_size = match read(PAGE_SIZE_ENV) {
            Some(raw) => raw
                .parse::<u32>()
                .map(normalize_page_size)
                .map_err(|_| ConfigError::InvalidPageSize(raw))?,
            None => defaults.default_page_size,
        };

        Ok(Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
            default_page_size,
        })
    }
}
