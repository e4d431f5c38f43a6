//! Cross-sheet merge of access status onto letters.

use std::collections::HashMap;

use crate::ingest::normalize_compact;
use crate::model::{is_absent, AccessRecord, LetterRecord, ABSENT};

/// Access records indexed by normalized email, phone and name.
///
/// For each key the first occurrence wins.
struct AccessIndex<'a> {
    by_email: HashMap<String, &'a AccessRecord>,
    by_phone: HashMap<String, &'a AccessRecord>,
    by_name: HashMap<String, &'a AccessRecord>,
}

impl<'a> AccessIndex<'a> {
    fn build(records: &'a [AccessRecord]) -> Self {
        let mut index = Self {
            by_email: HashMap::new(),
            by_phone: HashMap::new(),
            by_name: HashMap::new(),
        };
        for record in records {
            insert_first(&mut index.by_email, &record.email, record);
            insert_first(&mut index.by_phone, &record.phone, record);
            insert_first(&mut index.by_name, &record.name, record);
        }
        index
    }

    /// Email, then phone, then name.
    fn lookup(&self, letter: &LetterRecord) -> Option<&'a AccessRecord> {
        find(&self.by_email, &letter.email)
            .or_else(|| find(&self.by_phone, &letter.phone))
            .or_else(|| find(&self.by_name, &letter.name))
    }
}

fn insert_first<'a>(map: &mut HashMap<String, &'a AccessRecord>, raw: &str, record: &'a AccessRecord) {
    let key = normalize_compact(raw);
    if !key.is_empty() {
        map.entry(key).or_insert(record);
    }
}

fn find<'a>(map: &HashMap<String, &'a AccessRecord>, raw: &str) -> Option<&'a AccessRecord> {
    let key = normalize_compact(raw);
    if key.is_empty() {
        return None;
    }
    map.get(&key).copied()
}

/// Copy access status and block reason onto each letter.
///
/// A matched letter takes the access status (even a sentinel one) and the
/// reason when it is present. An unmatched letter gets [`ABSENT`] status and
/// reason. With no access records at all the letters are returned unchanged.
#[must_use]
pub fn merge_access(letters: Vec<LetterRecord>, access: &[AccessRecord]) -> Vec<LetterRecord> {
    if access.is_empty() {
        return letters;
    }

    let index = AccessIndex::build(access);
    letters
        .into_iter()
        .map(|mut letter| {
            match index.lookup(&letter) {
                Some(found) => {
                    letter.status.clone_from(&found.status);
                    if !is_absent(&found.reason) {
                        letter.block_reason.clone_from(&found.reason);
                    }
                }
                None => {
                    letter.status = ABSENT.to_string();
                    letter.block_reason = ABSENT.to_string();
                }
            }
            letter
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(email: &str, phone: &str, name: &str, status: &str, reason: &str) -> AccessRecord {
        AccessRecord {
            email: email.into(),
            name: name.into(),
            phone: phone.into(),
            status: status.into(),
            reason: reason.into(),
        }
    }

    fn letter(email: &str, phone: &str, name: &str) -> LetterRecord {
        LetterRecord {
            email: email.into(),
            phone: phone.into(),
            name: name.into(),
            status: "Pendente".into(),
            ..LetterRecord::empty()
        }
    }

    #[test]
    fn test_email_beats_phone() {
        let table = vec![
            access("-", "81 99999-0000", "X", "Bloqueado", "Documento"),
            access("ANA@Mail.com", "-", "Y", "Liberado", "-"),
        ];
        let out = merge_access(vec![letter("ana@mail.com", "(81) 99999-0000", "Ana")], &table);
        assert_eq!(out[0].status, "Liberado");
        assert_eq!(out[0].block_reason, ABSENT);
    }

    #[test]
    fn test_phone_then_name_fallback() {
        let table = vec![
            access("-", "81999990000", "-", "Bloqueado", "Débito"),
            access("-", "-", "José da Silva", "Liberado", "-"),
        ];
        let out = merge_access(
            vec![
                letter("-", "(81) 99999-0000", "Outro"),
                letter("x@y.z", "-", "JOSE DA SILVA"),
            ],
            &table,
        );
        assert_eq!(out[0].status, "Bloqueado");
        assert_eq!(out[0].block_reason, "Débito");
        assert_eq!(out[1].status, "Liberado");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let table = vec![
            access("a@b.c", "-", "-", "Primeiro", "-"),
            access("a@b.c", "-", "-", "Segundo", "-"),
        ];
        let out = merge_access(vec![letter("a@b.c", "-", "-")], &table);
        assert_eq!(out[0].status, "Primeiro");
    }

    #[test]
    fn test_unmatched_resets_to_absent() {
        let table = vec![access("a@b.c", "-", "-", "Liberado", "-")];
        let out = merge_access(vec![letter("z@z.z", "-", "Ninguém")], &table);
        assert_eq!(out[0].status, ABSENT);
        assert_eq!(out[0].block_reason, ABSENT);
    }

    #[test]
    fn test_sentinel_status_overwrites() {
        let table = vec![access("a@b.c", "-", "-", "-", "-")];
        let out = merge_access(vec![letter("a@b.c", "-", "-")], &table);
        assert_eq!(out[0].status, ABSENT);
    }

    #[test]
    fn test_no_access_records_is_noop() {
        let letters = vec![letter("a@b.c", "-", "Ana")];
        assert_eq!(merge_access(letters.clone(), &[]), letters);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let table = vec![access("a@b.c", "1", "Ana", "Liberado", "ok")];
        let letters = vec![letter("a@b.c", "-", "-"), letter("-", "-", "ana")];
        assert_eq!(
            merge_access(letters.clone(), &table),
            merge_access(letters, &table)
        );
    }
}
