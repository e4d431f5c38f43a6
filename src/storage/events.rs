//! Sync event log.
//!
//! Records connection lifecycle, notifications and exclusions so `painel
//! status` can show what the engine did while nobody was watching.

use rusqlite::{Connection, Result};
use serde::Serialize;

/// Event types for the sync log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Connected,
    ConnectedOffline,
    ConnectFailed,
    Disconnected,
    Notified,
    RecordExcluded,
}

impl EventType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::ConnectedOffline => "connected_offline",
            Self::ConnectFailed => "connect_failed",
            Self::Disconnected => "disconnected",
            Self::Notified => "notified",
            Self::RecordExcluded => "record_excluded",
        }
    }

    /// Parse from the stored string. Unknown values return `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "connected" => Self::Connected,
            "connected_offline" => Self::ConnectedOffline,
            "connect_failed" => Self::ConnectFailed,
            "disconnected" => Self::Disconnected,
            "notified" => Self::Notified,
            "record_excluded" => Self::RecordExcluded,
            _ => return None,
        })
    }
}

/// A sync log record.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub detail: Option<String>,
    pub actor: String,
    /// Unix milliseconds
    pub created_at: i64,
}

impl Event {
    /// Create a new event (id will be assigned by database).
    #[must_use]
    pub fn new(event_type: EventType, actor: &str) -> Self {
        Self {
            id: 0,
            event_type,
            detail: None,
            actor: actor.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Attach a human-readable detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Insert an event into the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(conn: &Connection, event: &Event) -> Result<i64> {
    conn.execute(
        "INSERT INTO events (event_type, detail, actor, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            event.event_type.as_str(),
            event.detail,
            event.actor,
            event.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent events, newest first. Rows with unknown types are skipped.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn recent_events(conn: &Connection, limit: Option<u32>) -> Result<Vec<Event>> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(
        "SELECT id, event_type, detail, actor, created_at
         FROM events
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut events = Vec::new();
    for row in rows {
        let (id, kind, detail, actor, created_at) = row?;
        if let Some(event_type) = EventType::parse(&kind) {
            events.push(Event {
                id,
                event_type,
                detail,
                actor,
                created_at,
            });
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::apply_schema;

    #[test]
    fn test_event_insert_and_list() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let first = Event::new(EventType::Connected, "ana").with_detail("CARTAS_DB: 3 letters");
        let id = insert_event(&conn, &first).unwrap();
        assert!(id > 0);
        insert_event(&conn, &Event::new(EventType::Disconnected, "ana")).unwrap();

        let events = recent_events(&conn, Some(10)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::Disconnected);
        assert_eq!(events[1].detail.as_deref(), Some("CARTAS_DB: 3 letters"));
        assert_eq!(events[1].actor, "ana");
    }

    #[test]
    fn test_unknown_event_types_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO events (event_type, actor, created_at) VALUES ('mystery', 'x', 1)",
            [],
        )
        .unwrap();
        insert_event(&conn, &Event::new(EventType::Notified, "x")).unwrap();

        let events = recent_events(&conn, None).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Notified);
    }
}
