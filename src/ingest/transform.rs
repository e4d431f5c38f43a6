//! Row transformers: raw sheet rows to canonical records.
//!
//! Transformers are total. Any row, including one with no recognized header,
//! produces a record; unresolved fields hold [`ABSENT`](crate::model::ABSENT).

use super::alias::Aliases;
use super::csv::RawRow;
use super::headers::{access, letter, worker};
use super::role::derive_role;
use crate::model::{or_absent, AccessRecord, LetterRecord, WorkerRecord, ABSENT};

fn field(row: &RawRow, aliases: &Aliases) -> String {
    or_absent(aliases.resolve(row).to_string())
}

/// Build a [`LetterRecord`] from a letters-sheet row.
#[must_use]
pub fn transform_letter(row: &RawRow) -> LetterRecord {
    LetterRecord {
        emitted_at: field(row, &letter::EMITTED_AT),
        region: field(row, &letter::REGION),
        origin_church: field(row, &letter::ORIGIN_CHURCH),
        name: field(row, &letter::NAME),
        email: field(row, &letter::EMAIL),
        phone: field(row, &letter::PHONE),
        preaching_date: field(row, &letter::PREACHING_DATE),
        ordination_date: field(row, &letter::ORDINATION_DATE),
        ministry_role: field(row, &letter::MINISTRY_ROLE),
        destination_ipda: field(row, &letter::DESTINATION_IPDA),
        destination_church: field(row, &letter::DESTINATION_CHURCH),
        status: field(row, &letter::STATUS),
        merge_status: field(row, &letter::MERGE_STATUS),
        pdf_url: field(row, &letter::PDF_URL),
        doc_id: field(row, &letter::DOC_ID),
        role: derive_role(row, &letter::ROLE, &letter::MARKERS),
        block_reason: ABSENT.to_string(),
    }
}

/// Build a [`WorkerRecord`] from a workers-sheet row.
#[must_use]
pub fn transform_worker(row: &RawRow) -> WorkerRecord {
    WorkerRecord {
        name: field(row, &worker::NAME),
        role: derive_role(row, &worker::ROLE, &worker::MARKERS),
        church: field(row, &worker::CHURCH),
        field: field(row, &worker::FIELD),
        status: field(row, &worker::STATUS),
        ordination_date: field(row, &worker::ORDINATION_DATE),
        baptism_date: field(row, &worker::BAPTISM_DATE),
        phone: field(row, &worker::PHONE),
        email: field(row, &worker::EMAIL),
        ministry_function: field(row, &worker::MINISTRY_FUNCTION),
        region: field(row, &worker::REGION),
        photo_url: field(row, &worker::PHOTO_URL),
    }
}

/// Build an [`AccessRecord`] from an access-sheet row.
///
/// People sometimes type their name into the email column, so an empty name
/// falls back to whatever the email column holds.
#[must_use]
pub fn transform_access(row: &RawRow) -> AccessRecord {
    let email = field(row, &access::EMAIL);
    let name = access::NAME.resolve(row);
    let name = if name.is_empty() {
        email.clone()
    } else {
        or_absent(name.to_string())
    };

    AccessRecord {
        email,
        name,
        phone: field(row, &access::PHONE),
        status: field(row, &access::STATUS),
        reason: field(row, &access::REASON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::csv::parse;
    use crate::ingest::role::{DEACON, PASTOR};
    use crate::model::CanonicalRecord;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_letter_from_current_form_export() {
        let csv = "Carimbo de data/hora,Qual região Pertence,Qual Igreja Você Pertence?,Nome completo,Telefone,Data da pregação.,Qual Igreja você está indo pregar?,Document Merge Status - Cartas,Merged Doc URL - Cartas,Merged Doc ID - Cartas,Ps\n\
                   19/10/2026 14:03:22,Norte,Sede,Ana Souza,(81) 99999-0000,26/10/2026,Vila Nova,Document successfully merged,https://docs/x,DOC1,x\n";
        let rows = parse(csv);
        let l = transform_letter(&rows[0]);

        assert_eq!(l.emitted_at, "19/10/2026 14:03:22");
        assert_eq!(l.region, "Norte");
        assert_eq!(l.origin_church, "Sede");
        assert_eq!(l.name, "Ana Souza");
        assert_eq!(l.phone, "(81) 99999-0000");
        assert_eq!(l.preaching_date, "26/10/2026");
        assert_eq!(l.destination_church, "Vila Nova");
        assert_eq!(l.merge_status, "Document successfully merged");
        assert_eq!(l.pdf_url, "https://docs/x");
        assert_eq!(l.doc_id, "DOC1");
        assert_eq!(l.role, PASTOR);
        assert_eq!(l.email, ABSENT);
        assert_eq!(l.status, ABSENT);
        assert_eq!(l.block_reason, ABSENT);
    }

    #[test]
    fn test_letter_mangled_headers_and_positional_status() {
        // 26 columns: the status column is Z and its header got mangled
        let mut headers: Vec<String> = (0..25).map(|i| format!("h{i}")).collect();
        headers[0] = "Qual regiÃ£o Pertence".into();
        headers[1] = "FUNÇÃO MINISTERIAL".into();
        headers.push("???".into());
        let mut values: Vec<String> = (0..25).map(|_| String::new()).collect();
        values[0] = "Sul".into();
        values[1] = "dic".into();
        values.push("Liberado".into());
        let csv = format!("{}\n{}\n", headers.join(","), values.join(","));

        let l = transform_letter(&parse(&csv)[0]);
        assert_eq!(l.region, "Sul");
        assert_eq!(l.ministry_role, "dic");
        assert_eq!(l.role, DEACON);
        assert_eq!(l.status, "Liberado");
    }

    #[test]
    fn test_transform_totality() {
        let empty = RawRow::new();
        assert_eq!(transform_letter(&empty), crate::model::LetterRecord::empty());
        let w = transform_worker(&row(&[("Nada", "x")]));
        assert!(w.is_blank());
        assert_eq!(w.photo_url, ABSENT);
        let a = transform_access(&empty);
        assert_eq!(a.name, ABSENT);
    }

    #[test]
    fn test_transform_idempotent() {
        let r = row(&[("Nome completo", "Ana"), ("Status", "Bloqueado"), ("Dic", "1")]);
        assert_eq!(transform_letter(&r), transform_letter(&r));
        assert_eq!(transform_worker(&r), transform_worker(&r));
    }

    #[test]
    fn test_sentinel_spellings_collapse() {
        let r = row(&[("Nome completo", "\u{2014}"), ("Telefone", "-")]);
        let l = transform_letter(&r);
        assert_eq!(l.name, ABSENT);
        assert_eq!(l.phone, ABSENT);
    }

    #[test]
    fn test_worker_fields() {
        let r = row(&[
            ("Nome", "João"),
            ("cargo", "pastor"),
            ("igreja", "Sede"),
            ("campo", "Recife"),
            ("Status", "Ativo"),
            ("WhatsApp", "81988887777"),
            ("Link da foto", "https://img/1.jpg"),
        ]);
        let w = WorkerRecord::from_row(&r);
        assert_eq!(w.name, "João");
        assert_eq!(w.role, PASTOR);
        assert_eq!(w.church, "Sede");
        assert_eq!(w.field, "Recife");
        assert_eq!(w.status, "Ativo");
        assert_eq!(w.phone, "81988887777");
        assert_eq!(w.photo_url, "https://img/1.jpg");
    }

    #[test]
    fn test_access_name_falls_back_to_email() {
        let a = transform_access(&row(&[("email", "MIGUEL"), ("Situação", "Bloqueado")]));
        assert_eq!(a.email, "MIGUEL");
        assert_eq!(a.name, "MIGUEL");
        assert_eq!(a.status, "Bloqueado");
        assert_eq!(a.reason, ABSENT);

        let a = transform_access(&row(&[("Nome", "Ana"), ("Motivo do bloqueio", "Pendência")]));
        assert_eq!(a.name, "Ana");
        assert_eq!(a.email, ABSENT);
        assert_eq!(a.reason, "Pendência");
    }
}
