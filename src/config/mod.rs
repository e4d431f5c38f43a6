//! Configuration management.
//!
//! Everything lives under one home directory:
//! - `~/.painel/config.json` - user settings ([`Settings`])
//! - `~/.painel/session.json` - connection state ([`SessionState`])
//! - `~/.painel/data/painel.db` - SQLite cache, exclusions and event log
//!
//! `PAINEL_HOME` relocates the whole tree, which is how tests isolate runs.

mod session_state;
mod settings;

pub use session_state::{SessionFile, SessionState};
pub use settings::Settings;

use std::path::{Path, PathBuf};

/// Get the Painel home directory.
///
/// `$PAINEL_HOME` if set and non-empty, else `~/.painel/`.
#[must_use]
pub fn painel_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("PAINEL_HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".painel"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `PAINEL_DB` environment variable
/// 3. `<home>/data/painel.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var("PAINEL_DB") {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    painel_home().map(|dir| dir.join("data").join("painel.db"))
}

/// Path of the settings file.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    painel_home().map(|dir| dir.join("config.json"))
}

/// Path of the persisted session state.
#[must_use]
pub fn session_path() -> Option<PathBuf> {
    painel_home().map(|dir| dir.join("session.json"))
}

/// Get the default actor name recorded in the event log.
///
/// Priority:
/// 1. `PAINEL_ACTOR` environment variable
/// 2. System username
/// 3. "unknown"
#[must_use]
pub fn default_actor() -> String {
    if let Ok(actor) = std::env::var("PAINEL_ACTOR") {
        if !actor.is_empty() {
            return actor;
        }
    }

    if let Ok(user) = std::env::var("USER") {
        return user;
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actor() {
        let actor = default_actor();
        assert!(!actor.is_empty());
    }

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/painel.db");
        let result = resolve_db_path(Some(&explicit));
        assert_eq!(result, Some(explicit));
    }

    #[test]
    fn test_default_paths_share_home() {
        let Some(home) = painel_home() else {
            return;
        };
        assert_eq!(settings_path(), Some(home.join("config.json")));
        assert_eq!(session_path(), Some(home.join("session.json")));
    }
}
