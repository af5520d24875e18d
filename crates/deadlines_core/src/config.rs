//! Environment-driven configuration for hosts embedding the core.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; unusable values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "DEADLINES_DB_PATH";
pub const LOG_DIR_ENV: &str = "DEADLINES_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "DEADLINES_LOG_LEVEL";
pub const DEFAULT_DB_FILE_NAME: &str = "deadlines.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    /// Absolute log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl CoreConfig {
    /// Reads `DEADLINES_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let env = HashMap::from([(DB_PATH_ENV, "   ")]);
        let config = CoreConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert!(config.db_path.ends_with(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let env = HashMap::from([
            (DB_PATH_ENV, " /data/deadlines.db "),
            (LOG_DIR_ENV, "/var/log/deadlines"),
            (LOG_LEVEL_ENV, "warn"),
        ]);
        let config = CoreConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/deadlines.db"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/deadlines")));
        assert_eq!(config.log_level, "warn");
    }
}
