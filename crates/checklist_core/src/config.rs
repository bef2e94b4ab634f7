//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Locate the state database file.
//! - Pick the log level and optional log directory.
//!
//! # Invariants
//! - Blank variables behave exactly like unset ones.
//! - Resolution never fails; every field has a fallback except `log_dir`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CHECKLIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CHECKLIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CHECKLIST_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "checklist_state.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays disabled when `None`.
    pub log_dir: Option<String>,
}

impl ChecklistConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChecklistConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)]) -> ChecklistConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ChecklistConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = resolve(&[]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("checklist_state.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed_and_blank_is_unset() {
        let config = resolve(&[
            (DB_PATH_ENV, "  /var/lib/checklist.db "),
            (LOG_LEVEL_ENV, "   "),
            (LOG_DIR_ENV, " /var/log/checklist "),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/checklist.db"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/checklist"));
    }
}
