//! SQLite storage implementation.
//!
//! Holds the offline letters cache, the excluded-records list and the sync
//! event log. Writes go through [`SqliteStorage::mutate`] so each operation
//! and its log events commit atomically.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;

use crate::error::Result;
use crate::model::LetterRecord;
use crate::storage::events::{insert_event, recent_events, Event, EventType};
use crate::storage::schema::apply_schema;
use crate::sync::hash::{content_hash, has_changed};

const BUSY_TIMEOUT_MS: u64 = 5000;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Context for a mutation operation, collecting log events.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Actor performing the operation.
    pub actor: String,
    /// Events to write at the end of the transaction.
    pub events: Vec<Event>,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str, actor: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            actor: actor.to_string(),
            events: Vec::new(),
        }
    }

    /// Record an event for this operation.
    pub fn record_event(&mut self, event_type: EventType, detail: Option<String>) {
        let mut event = Event::new(event_type, &self.actor);
        event.detail = detail;
        self.events.push(event);
    }
}

/// One excluded (deleted upstream) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedRecord {
    pub identity_key: String,
    pub label: Option<String>,
    /// Unix milliseconds
    pub excluded_at: i64,
}

/// Summary of the cached snapshot for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub record_count: usize,
    /// Unix milliseconds
    pub updated_at: i64,
}

impl SqliteStorage {
    /// Open a database at the given path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;

        // `watch` and one-shot commands may share the file
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a mutation inside an IMMEDIATE transaction.
    ///
    /// Events recorded on the context are written before commit; on error
    /// everything is rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&mut self, op: &str, actor: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op, actor);
        let result = f(&tx, &mut ctx)?;

        for event in &ctx.events {
            insert_event(&tx, event)?;
        }

        tx.commit()?;
        Ok(result)
    }

    // ==================
    // Letters Cache
    // ==================

    /// Replace the cached snapshot for `client_id`.
    ///
    /// Returns `false` without writing when the snapshot is identical to the
    /// last one stored.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_letter_cache(&mut self, client_id: &str, letters: &[LetterRecord]) -> Result<bool> {
        let hash = content_hash(&letters)?;
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT content_hash FROM cache_meta WHERE client_id = ?1",
                [client_id],
                |row| row.get(0),
            )
            .optional()?;
        if !has_changed(&hash, stored.as_deref()) {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp_millis();
        self.mutate("write_letter_cache", client_id, |tx, _ctx| {
            tx.execute("DELETE FROM letter_cache WHERE client_id = ?1", [client_id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO letter_cache (client_id, position, identity_key, payload, cached_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for (position, letter) in letters.iter().enumerate() {
                    stmt.execute(rusqlite::params![
                        client_id,
                        i64::try_from(position).unwrap_or(i64::MAX),
                        letter.identity_key(),
                        serde_json::to_string(letter)?,
                        now,
                    ])?;
                }
            }
            tx.execute(
                "INSERT INTO cache_meta (client_id, content_hash, record_count, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(client_id) DO UPDATE SET
                    content_hash = excluded.content_hash,
                    record_count = excluded.record_count,
                    updated_at = excluded.updated_at",
                rusqlite::params![
                    client_id,
                    hash,
                    i64::try_from(letters.len()).unwrap_or(i64::MAX),
                    now
                ],
            )?;
            Ok(())
        })?;
        Ok(true)
    }

    /// Read the cached snapshot for `client_id`, newest first.
    ///
    /// Returns `None` when nothing was ever cached for this client.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a payload cannot be decoded.
    pub fn read_letter_cache(&self, client_id: &str) -> Result<Option<Vec<LetterRecord>>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM letter_cache WHERE client_id = ?1 ORDER BY position ASC",
        )?;
        let payloads = stmt
            .query_map([client_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if payloads.is_empty() {
            return Ok(None);
        }
        let letters = payloads
            .iter()
            .map(|p| serde_json::from_str(p))
            .collect::<std::result::Result<Vec<LetterRecord>, _>>()?;
        Ok(Some(letters))
    }

    /// Snapshot summary for `client_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn cache_info(&self, client_id: &str) -> Result<Option<CacheInfo>> {
        let info = self
            .conn
            .query_row(
                "SELECT record_count, updated_at FROM cache_meta WHERE client_id = ?1",
                [client_id],
                |row| {
                    Ok(CacheInfo {
                        record_count: usize::try_from(row.get::<_, i64>(0)?).unwrap_or(0),
                        updated_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }

    // ==================
    // Excluded Records
    // ==================

    /// Exclude a record by identity key.
    ///
    /// Returns `true` if the key was newly excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn exclude_record(&mut self, identity_key: &str, label: Option<&str>, actor: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp_millis();
        self.mutate("exclude_record", actor, |tx, ctx| {
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO excluded_records (identity_key, label, excluded_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![identity_key, label, now],
            )?;
            if inserted > 0 {
                let detail = label.map_or_else(|| identity_key.to_string(), |l| format!("{l} ({identity_key})"));
                ctx.record_event(EventType::RecordExcluded, Some(detail));
            }
            Ok(inserted > 0)
        })
    }

    /// All excluded identity keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn excluded_keys(&self) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT identity_key FROM excluded_records")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(keys)
    }

    /// Excluded records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_excluded(&self) -> Result<Vec<ExcludedRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT identity_key, label, excluded_at FROM excluded_records ORDER BY excluded_at DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ExcludedRecord {
                    identity_key: row.get(0)?,
                    label: row.get(1)?,
                    excluded_at: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Drop exclusions whose key is not in `present`.
    ///
    /// Called after a fresh sync: a key the sheet no longer returns has been
    /// dropped upstream and needs no filtering. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or delete fails.
    pub fn prune_excluded(&mut self, present: &HashSet<String>) -> Result<usize> {
        let stale: Vec<String> = self
            .excluded_keys()?
            .into_iter()
            .filter(|k| !present.contains(k))
            .collect();
        if stale.is_empty() {
            return Ok(0);
        }

        self.mutate("prune_excluded", "sync", |tx, _ctx| {
            let mut stmt = tx.prepare("DELETE FROM excluded_records WHERE identity_key = ?1")?;
            for key in &stale {
                stmt.execute([key])?;
            }
            Ok(stale.len())
        })
    }

    // ==================
    // Event Log
    // ==================

    /// Append one event to the sync log.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn log_event(&mut self, event_type: EventType, detail: Option<&str>, actor: &str) -> Result<()> {
        self.mutate("log_event", actor, |_tx, ctx| {
            ctx.record_event(event_type, detail.map(str::to_string));
            Ok(())
        })
    }

    /// Most recent log events, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_events(&self, limit: Option<u32>) -> Result<Vec<Event>> {
        Ok(recent_events(&self.conn, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(name: &str) -> LetterRecord {
        LetterRecord {
            name: name.into(),
            doc_id: format!("doc-{name}"),
            ..LetterRecord::empty()
        }
    }

    #[test]
    fn test_cache_roundtrip_keeps_order() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.read_letter_cache("c1").unwrap().is_none());

        let letters = vec![letter("Bia"), letter("Ana")];
        assert!(storage.write_letter_cache("c1", &letters).unwrap());

        assert_eq!(storage.read_letter_cache("c1").unwrap(), Some(letters));
        assert!(storage.read_letter_cache("c2").unwrap().is_none());
        assert_eq!(storage.cache_info("c1").unwrap().unwrap().record_count, 2);
    }

    #[test]
    fn test_identical_snapshot_skipped() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let letters = vec![letter("Ana")];
        assert!(storage.write_letter_cache("c1", &letters).unwrap());
        assert!(!storage.write_letter_cache("c1", &letters).unwrap());

        let smaller: Vec<LetterRecord> = Vec::new();
        assert!(storage.write_letter_cache("c1", &smaller).unwrap());
        assert!(storage.read_letter_cache("c1").unwrap().is_none());
    }

    #[test]
    fn test_exclusions_and_prune() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.exclude_record("k1", Some("Ana"), "tester").unwrap());
        assert!(!storage.exclude_record("k1", None, "tester").unwrap());
        storage.exclude_record("k2", None, "tester").unwrap();

        let present: HashSet<String> = ["k1".to_string()].into_iter().collect();
        assert_eq!(storage.prune_excluded(&present).unwrap(), 1);
        assert_eq!(storage.excluded_keys().unwrap(), present);

        let events = storage.recent_events(None).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type == EventType::RecordExcluded));
        assert!(events.iter().any(|e| e.detail.as_deref() == Some("Ana (k1)")));
    }

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("painel.db");
        let mut storage = SqliteStorage::open(&path).unwrap();
        storage
            .log_event(EventType::Connected, Some("ok"), "tester")
            .unwrap();
        assert!(path.exists());
        assert_eq!(storage.list_excluded().unwrap().len(), 0);
    }
}
