//! Process configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Logging is only enabled when a log directory is configured.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "PERPUS_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "PERPUS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PERPUS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "perpus.sqlite3";

/// Store and logging settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Store file. Defaults to `perpus.sqlite3` in the temp directory.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`; validated by `init_logging`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads `PERPUS_DB_PATH`, `PERPUS_LOG_LEVEL` and `PERPUS_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}
