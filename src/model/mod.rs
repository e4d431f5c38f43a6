//! Canonical record types.
//!
//! - [`LetterRecord`] - one preaching letter (carta) request
//! - [`WorkerRecord`] - one registered worker (obreiro)
//! - [`AccessRecord`] - one row of the access/status join table
//!
//! Every field is a plain `String`. A value that could not be resolved is
//! stored as [`ABSENT`], never as an empty string.

mod access;
mod letter;
mod worker;

pub use access::AccessRecord;
pub use letter::LetterRecord;
pub use worker::WorkerRecord;

use crate::ingest::RawRow;

/// Sentinel for a field with no value.
pub const ABSENT: &str = "-";

/// Placeholder spellings that mean "no value".
///
/// Older exports carry an em-dash, sometimes double-decoded.
const ABSENT_SPELLINGS: [&str; 4] = ["", ABSENT, "\u{2014}", "\u{e2}\u{20ac}\u{201d}"];

/// Whether `value` is empty or one of the sentinel spellings.
#[must_use]
pub fn is_absent(value: &str) -> bool {
    ABSENT_SPELLINGS.contains(&value.trim())
}

/// Return `value` unchanged, or [`ABSENT`] when it carries no data.
#[must_use]
pub fn or_absent(value: String) -> String {
    if is_absent(&value) {
        ABSENT.to_string()
    } else {
        value
    }
}

/// Record kinds the sheet strategy knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Letters,
    Workers,
    Access,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Letters => write!(f, "letters"),
            Self::Workers => write!(f, "workers"),
            Self::Access => write!(f, "access"),
        }
    }
}

/// A record shape built from one raw spreadsheet row.
pub trait CanonicalRecord: Sized {
    /// Which sheet family this record comes from.
    const KIND: RecordKind;

    /// Build the canonical record. Never fails: unresolved fields are [`ABSENT`].
    fn from_row(row: &RawRow) -> Self;

    /// True when every business field is absent; such rows are dropped.
    fn is_blank(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absent_spellings() {
        assert!(is_absent(""));
        assert!(is_absent("  "));
        assert!(is_absent("-"));
        assert!(is_absent("\u{2014}"));
        assert!(is_absent("\u{e2}\u{20ac}\u{201d}"));
        assert!(!is_absent("Pastor"));
        assert!(!is_absent("--"));
    }

    #[test]
    fn test_or_absent() {
        assert_eq!(or_absent(String::new()), ABSENT);
        assert_eq!(or_absent("\u{2014}".into()), ABSENT);
        assert_eq!(or_absent("Ana".into()), "Ana");
    }
}
