//! Ingestion pipeline: CSV text to canonical records.
//!
//! - [`csv`] decodes published sheet exports into [`RawRow`]s
//! - [`alias`] resolves canonical fields against varying header text
//! - [`headers`] holds the static alias tables
//! - [`role`] collapses role spellings and marker columns into one label
//! - [`dates`] parses the date formats found in the sheets
//! - [`transform`] builds canonical records from raw rows

pub mod alias;
pub mod csv;
pub mod dates;
pub mod headers;
pub mod role;
pub mod transform;

pub use alias::{normalize_compact, normalize_key, resolve, Aliases};
pub use csv::{parse, RawRow};
pub use dates::{parse_date, parse_timestamp};
pub use transform::{transform_access, transform_letter, transform_worker};

use crate::model::CanonicalRecord;

/// Parse CSV text and build canonical records, dropping blank ones.
#[must_use]
pub fn records_from_csv<R: CanonicalRecord>(text: &str) -> Vec<R> {
    parse(text)
        .iter()
        .map(R::from_row)
        .filter(|record| !record.is_blank())
        .collect()
}
