//! SQLite storage layer for Painel.
//!
//! Local persistence for the offline letters cache, the excluded-records
//! list and the sync event log:
//! - WAL mode so `watch` and one-shot commands can share the file
//! - IMMEDIATE transactions for writes
//! - Event rows written in the same transaction as the change they describe
//!
//! # Submodules
//!
//! - [`events`] - Sync event log
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod events;
pub mod schema;
pub mod sqlite;

pub use events::{Event, EventType};
pub use sqlite::{CacheInfo, ExcludedRecord, MutationContext, SqliteStorage};
