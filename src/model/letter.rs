//! Letter (carta de pregação) record.

use serde::{Deserialize, Serialize};

use super::{is_absent, CanonicalRecord, RecordKind, ABSENT};
use crate::ingest::{transform_letter, RawRow};
use crate::sync::hash::row_fingerprint;

/// One preaching letter request.
///
/// Serialized field names follow the sheet vocabulary (`data_emissao`,
/// `igreja_origem`, ...) so cached snapshots stay readable by other tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRecord {
    /// Form submission timestamp, as written in the sheet
    #[serde(rename = "data_emissao")]
    pub emitted_at: String,

    #[serde(rename = "regiao")]
    pub region: String,

    #[serde(rename = "igreja_origem")]
    pub origin_church: String,

    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    #[serde(rename = "telefone")]
    pub phone: String,

    #[serde(rename = "data_pregacao")]
    pub preaching_date: String,

    #[serde(rename = "data_ordenacao")]
    pub ordination_date: String,

    /// Ministerial function as typed in the form
    #[serde(rename = "funcao")]
    pub ministry_role: String,

    #[serde(rename = "ipda_destino")]
    pub destination_ipda: String,

    #[serde(rename = "igreja_destino")]
    pub destination_church: String,

    /// Access status; replaced by the access sheet when a merge runs
    pub status: String,

    /// Document merge pipeline status
    #[serde(rename = "status_merge")]
    pub merge_status: String,

    #[serde(rename = "url_pdf")]
    pub pdf_url: String,

    pub doc_id: String,

    /// Derived role label (Pastor, Diácono, Obreiro, Membro or free text)
    #[serde(rename = "cargo")]
    pub role: String,

    /// Block reason, only ever set by the access merge
    #[serde(rename = "motivo_bloqueio", default = "absent")]
    pub block_reason: String,
}

fn absent() -> String {
    ABSENT.to_string()
}

impl LetterRecord {
    /// A record with every field at [`ABSENT`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            emitted_at: absent(),
            region: absent(),
            origin_church: absent(),
            name: absent(),
            email: absent(),
            phone: absent(),
            preaching_date: absent(),
            ordination_date: absent(),
            ministry_role: absent(),
            destination_ipda: absent(),
            destination_church: absent(),
            status: absent(),
            merge_status: absent(),
            pdf_url: absent(),
            doc_id: absent(),
            role: absent(),
            block_reason: absent(),
        }
    }

    /// `(field, value)` pairs in declaration order, using the serialized names.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 17] {
        [
            ("data_emissao", self.emitted_at.as_str()),
            ("regiao", self.region.as_str()),
            ("igreja_origem", self.origin_church.as_str()),
            ("nome", self.name.as_str()),
            ("email", self.email.as_str()),
            ("telefone", self.phone.as_str()),
            ("data_pregacao", self.preaching_date.as_str()),
            ("data_ordenacao", self.ordination_date.as_str()),
            ("funcao", self.ministry_role.as_str()),
            ("ipda_destino", self.destination_ipda.as_str()),
            ("igreja_destino", self.destination_church.as_str()),
            ("status", self.status.as_str()),
            ("status_merge", self.merge_status.as_str()),
            ("url_pdf", self.pdf_url.as_str()),
            ("doc_id", self.doc_id.as_str()),
            ("cargo", self.role.as_str()),
            ("motivo_bloqueio", self.block_reason.as_str()),
        ]
    }

    /// Composite identity used for dedup and exclusion.
    ///
    /// `doc_id|url_pdf|data_emissao|nome`, lowercased, absent parts empty.
    /// When all four parts are absent, falls back to `row:<sha256>` over the
    /// sorted `field:value` pairs.
    #[must_use]
    pub fn identity_key(&self) -> String {
        let parts = [&self.doc_id, &self.pdf_url, &self.emitted_at, &self.name];
        if parts.iter().all(|p| is_absent(p)) {
            return format!("row:{}", row_fingerprint(self.fields()));
        }
        parts
            .iter()
            .map(|p| if is_absent(p) { "" } else { p.trim() })
            .collect::<Vec<_>>()
            .join("|")
            .to_lowercase()
    }
}

impl CanonicalRecord for LetterRecord {
    const KIND: RecordKind = RecordKind::Letters;

    fn from_row(row: &RawRow) -> Self {
        transform_letter(row)
    }

    fn is_blank(&self) -> bool {
        [
            &self.emitted_at,
            &self.name,
            &self.preaching_date,
            &self.origin_church,
            &self.destination_church,
            &self.status,
            &self.pdf_url,
        ]
        .iter()
        .all(|v| is_absent(v))
    }
}
