//! Read-through cache and side stores used by the sync engine.
//!
//! Every operation is fire-and-forget from the engine's point of view:
//! failures are logged and swallowed, never surfaced as connect errors.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::model::LetterRecord;
use crate::storage::{EventType, SqliteStorage};

/// Offline snapshot, exclusion list and event log, keyed by client id.
pub trait RecordCache: Send + Sync {
    /// Last snapshot written for `client_id`, newest first.
    fn read(&self, client_id: &str) -> Option<Vec<LetterRecord>>;

    /// Replace the snapshot for `client_id`.
    fn write(&self, client_id: &str, letters: &[LetterRecord]);

    /// Identity keys of records deleted upstream.
    fn excluded_keys(&self) -> HashSet<String>;

    /// Exclude one identity key.
    fn exclude(&self, identity_key: &str, label: Option<&str>, actor: &str);

    /// Forget exclusions for keys a fresh sync no longer returns.
    fn prune_excluded(&self, present: &HashSet<String>);

    /// Append to the sync event log.
    fn log_event(&self, event_type: EventType, detail: Option<&str>, actor: &str);
}

/// [`RecordCache`] backed by the local SQLite database.
pub struct SqliteRecordCache {
    storage: Mutex<SqliteStorage>,
}

impl SqliteRecordCache {
    #[must_use]
    pub const fn new(storage: SqliteStorage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    fn with_storage<T>(&self, op: &str, f: impl FnOnce(&mut SqliteStorage) -> crate::error::Result<T>) -> Option<T> {
        let mut storage = match self.storage.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match f(&mut storage) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(op, error = %e, "cache operation failed");
                None
            }
        }
    }
}

impl RecordCache for SqliteRecordCache {
    fn read(&self, client_id: &str) -> Option<Vec<LetterRecord>> {
        self.with_storage("read", |s| s.read_letter_cache(client_id))
            .flatten()
    }

    fn write(&self, client_id: &str, letters: &[LetterRecord]) {
        if let Some(false) = self.with_storage("write", |s| s.write_letter_cache(client_id, letters)) {
            tracing::debug!("cache snapshot unchanged");
        }
    }

    fn excluded_keys(&self) -> HashSet<String> {
        self.with_storage("excluded_keys", |s| s.excluded_keys())
            .unwrap_or_default()
    }

    fn exclude(&self, identity_key: &str, label: Option<&str>, actor: &str) {
        self.with_storage("exclude", |s| s.exclude_record(identity_key, label, actor));
    }

    fn prune_excluded(&self, present: &HashSet<String>) {
        if let Some(removed) = self.with_storage("prune_excluded", |s| s.prune_excluded(present)) {
            if removed > 0 {
                tracing::info!(removed, "pruned exclusions no longer in the sheet");
            }
        }
    }

    fn log_event(&self, event_type: EventType, detail: Option<&str>, actor: &str) {
        self.with_storage("log_event", |s| s.log_event(event_type, detail, actor));
    }
}
