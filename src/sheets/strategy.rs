//! Ordered candidate sheet resolution.
//!
//! Each record kind lives in a sheet tab whose name changed over the life of
//! the form. Candidates are tried strictly in order and the first one that
//! yields at least one non-blank record wins; later candidates are never
//! requested.

use crate::ingest::records_from_csv;
use crate::model::{CanonicalRecord, RecordKind};

use super::source::SheetSource;

/// Candidate tab names per kind. The last entry is the generic fallback.
const LETTER_SHEETS: &[&str] = &["CARTAS_DB", "CARTAS DB", "Cartas_DB", "CARTAS"];
const WORKER_SHEETS: &[&str] = &["OBREIROS_DB", "OBREIROS DB", "Obreiros_DB", "OBREIROS"];
const ACCESS_SHEETS: &[&str] = &["ACESSO", "ACESSOS", "ACESSO_DB"];

/// One candidate that did not produce data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub sheet: String,
    pub reason: String,
}

/// Outcome of resolving one record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<R> {
    /// `sheet` was the first candidate with usable rows.
    Found { records: Vec<R>, sheet: String },
    /// Every candidate failed or came back empty.
    NotFound { attempts: Vec<FailedAttempt> },
}

impl<R> Resolution<R> {
    /// Name of the sheet that produced data, if any.
    #[must_use]
    pub fn sheet(&self) -> Option<&str> {
        match self {
            Self::Found { sheet, .. } => Some(sheet),
            Self::NotFound { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Records found, or an empty list.
    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Found { records, .. } => records,
            Self::NotFound { .. } => Vec::new(),
        }
    }
}

/// Candidate tab names for `kind`, in request order.
///
/// A non-empty `hint` goes right before the generic fallback unless it is
/// already in the list.
#[must_use]
pub fn candidate_sheets(kind: RecordKind, hint: Option<&str>) -> Vec<String> {
    let defaults = match kind {
        RecordKind::Letters => LETTER_SHEETS,
        RecordKind::Workers => WORKER_SHEETS,
        RecordKind::Access => ACCESS_SHEETS,
    };
    let (fallback, named) = defaults
        .split_last()
        .map_or((None, defaults), |(last, rest)| (Some(*last), rest));

    let mut sheets: Vec<String> = named.iter().map(|s| (*s).to_string()).collect();
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        if !defaults.contains(&hint) {
            sheets.push(hint.to_string());
        }
    }
    sheets.extend(fallback.map(str::to_string));
    sheets
}

/// Resolve records of type `R` from the first usable candidate sheet.
///
/// Fetch failures and empty sheets are recorded and skipped; this never
/// returns an error.
pub async fn fetch_canonical<R, S>(
    source: &S,
    spreadsheet_id: &str,
    hint: Option<&str>,
) -> Resolution<R>
where
    R: CanonicalRecord,
    S: SheetSource,
{
    let kind = R::KIND;
    let mut attempts = Vec::new();

    for sheet in candidate_sheets(kind, hint) {
        match source.fetch_csv(spreadsheet_id, &sheet).await {
            Ok(text) => {
                let records: Vec<R> = records_from_csv(&text);
                if records.is_empty() {
                    tracing::debug!(%kind, sheet = %sheet, "sheet has no usable rows");
                    attempts.push(FailedAttempt {
                        sheet,
                        reason: "no rows".to_string(),
                    });
                } else {
                    tracing::info!(%kind, sheet = %sheet, rows = records.len(), "resolved sheet");
                    return Resolution::Found { records, sheet };
                }
            }
            Err(e) => {
                tracing::debug!(%kind, sheet = %sheet, error = %e, "candidate sheet failed");
                attempts.push(FailedAttempt {
                    sheet,
                    reason: e.to_string(),
                });
            }
        }
    }

    Resolution::NotFound { attempts }
}
