//! Access/status join record.

use serde::{Deserialize, Serialize};

use super::{is_absent, CanonicalRecord, RecordKind};
use crate::ingest::{transform_access, RawRow};

/// One row of the access sheet. Only used to enrich letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub email: String,
    /// Display name; falls back to the email column when empty
    pub name: String,
    pub phone: String,
    pub status: String,
    /// Block reason (motivo)
    pub reason: String,
}

impl CanonicalRecord for AccessRecord {
    const KIND: RecordKind = RecordKind::Access;

    fn from_row(row: &RawRow) -> Self {
        transform_access(row)
    }

    fn is_blank(&self) -> bool {
        is_absent(&self.email) && is_absent(&self.name) && is_absent(&self.phone)
    }
}
