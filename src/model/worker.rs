//! Worker (obreiro) record.

use serde::{Deserialize, Serialize};

use super::{is_absent, CanonicalRecord, RecordKind, ABSENT};
use crate::ingest::{transform_worker, RawRow};

/// One registered worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    #[serde(rename = "nome")]
    pub name: String,

    /// Derived role label
    #[serde(rename = "cargo")]
    pub role: String,

    #[serde(rename = "igreja")]
    pub church: String,

    /// Field (campo), the administrative region the worker reports to
    #[serde(rename = "campo")]
    pub field: String,

    pub status: String,

    #[serde(rename = "data_ordenacao")]
    pub ordination_date: String,

    #[serde(rename = "data_batismo")]
    pub baptism_date: String,

    #[serde(rename = "telefone")]
    pub phone: String,

    pub email: String,

    #[serde(rename = "funcao")]
    pub ministry_function: String,

    #[serde(rename = "regiao")]
    pub region: String,

    #[serde(rename = "foto")]
    pub photo_url: String,
}

impl WorkerRecord {
    /// A record with every field at [`ABSENT`].
    #[must_use]
    pub fn empty() -> Self {
        let absent = || ABSENT.to_string();
        Self {
            name: absent(),
            role: absent(),
            church: absent(),
            field: absent(),
            status: absent(),
            ordination_date: absent(),
            baptism_date: absent(),
            phone: absent(),
            email: absent(),
            ministry_function: absent(),
            region: absent(),
            photo_url: absent(),
        }
    }
}

impl CanonicalRecord for WorkerRecord {
    const KIND: RecordKind = RecordKind::Workers;

    fn from_row(row: &RawRow) -> Self {
        transform_worker(row)
    }

    fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.role,
            &self.church,
            &self.field,
            &self.status,
            &self.phone,
            &self.email,
        ]
        .iter()
        .all(|v| is_absent(v))
    }
}
