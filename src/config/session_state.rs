//! Persisted connection state (`session.json`).
//!
//! Holds what must survive between runs: the connected URL for silent
//! auto-reconnect, the custom letters sheet name, a stable client id used as
//! the cache key, the recent-letters snapshot and the per-connection dedup
//! state of the change detector.
//!
//! Writes go to a temp file that is renamed over the real one, so a reader
//! never sees a partial file.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::LetterRecord;

/// Session state entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    /// Last successfully connected spreadsheet URL
    pub url: Option<String>,

    /// Letters sheet name override
    pub custom_sheet: Option<String>,

    /// Stable per-install id, generated once
    pub client_id: Option<String>,

    /// Small window of the most recent letters, for quick display
    pub recent_letters: Vec<LetterRecord>,

    /// Form used to request a block review, shown next to blocked letters
    pub block_form_url: Option<String>,

    /// Newest emission instant seen by the change detector
    pub last_seen: Option<NaiveDateTime>,

    /// Identity keys already notified in this connection
    pub notified_keys: BTreeSet<String>,

    /// Whether the one-time recent digest was already shown
    pub digest_shown: bool,
}

impl SessionState {
    /// Return the client id, generating and storing one if missing.
    pub fn ensure_client_id(&mut self) -> &str {
        self.client_id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
    }

    /// Forget the connection and its dedup state. The client id is kept.
    pub fn clear_connection(&mut self) {
        self.url = None;
        self.recent_letters.clear();
        self.last_seen = None;
        self.notified_keys.clear();
        self.digest_shown = false;
    }
}

/// Location of the session file; `None` keeps state in memory only.
#[derive(Debug, Clone, Default)]
pub struct SessionFile {
    path: Option<PathBuf>,
}

impl SessionFile {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// A session that is never written to disk.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self { path: None }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the state; a missing or corrupted file yields the default.
    #[must_use]
    pub fn load(&self) -> SessionState {
        let Some(path) = &self.path else {
            return SessionState::default();
        };
        let Ok(content) = fs::read_to_string(path) else {
            return SessionState::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupted session file");
            SessionState::default()
        })
    }

    /// Write the state atomically (temp file + rename, 0600 on unix).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, temp file or rename fails.
    pub fn save(&self, state: &SessionState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(state)?;
        let temp_path = path.with_extension("json.tmp");
        {
            let mut opts = fs::OpenOptions::new();
            opts.write(true).create(true).truncate(true);
            #[cfg(unix)]
            opts.mode(0o600);
            let mut file = opts.open(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_corrupted_file_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        assert_eq!(file.load(), SessionState::default());

        fs::write(dir.path().join("session.json"), "{{{{").unwrap();
        assert_eq!(file.load(), SessionState::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("sub").join("session.json"));

        let mut state = SessionState {
            url: Some("https://docs.google.com/spreadsheets/d/abc/edit".into()),
            custom_sheet: Some("Respostas".into()),
            ..SessionState::default()
        };
        state.notified_keys.insert("k1".into());
        let id = state.ensure_client_id().to_string();
        file.save(&state).unwrap();

        let loaded = file.load();
        assert_eq!(loaded, state);
        assert_eq!(loaded.client_id.as_deref(), Some(id.as_str()));
        assert!(!dir.path().join("sub").join("session.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionFile::new(path.clone())
            .save(&SessionState::default())
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_client_id_is_stable() {
        let mut state = SessionState::default();
        let first = state.ensure_client_id().to_string();
        assert_eq!(state.ensure_client_id(), first);
    }

    #[test]
    fn test_clear_connection_keeps_client_id() {
        let mut state = SessionState {
            url: Some("u".into()),
            digest_shown: true,
            ..SessionState::default()
        };
        state.ensure_client_id();
        state.notified_keys.insert("x".into());
        state.clear_connection();

        assert!(state.url.is_none());
        assert!(state.notified_keys.is_empty());
        assert!(!state.digest_shown);
        assert!(state.client_id.is_some());
    }

    #[test]
    fn test_in_memory_never_writes() {
        let file = SessionFile::in_memory();
        file.save(&SessionState::default()).unwrap();
        assert!(file.path().is_none());
    }
}
