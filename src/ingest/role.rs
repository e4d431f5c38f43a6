//! Ministerial role labels.
//!
//! Role text arrives either as free text in a role column or as one of
//! several marker columns (`Ps`, `Dic`, `ob`, `Mem`) holding any non-empty
//! value. Both paths end in the same small vocabulary so filters and counts
//! group correctly. Resolution: role column → marker cascade → absent.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::alias::{normalize_compact, Aliases};
use super::csv::RawRow;
use crate::model::{is_absent, ABSENT};

/// Canonical role labels.
pub const PASTOR: &str = "Pastor";
pub const DEACON: &str = "Diácono";
pub const WORKER: &str = "Obreiro";
pub const MEMBER: &str = "Membro";

/// Free-text spellings (after [`normalize_compact`]) mapped to a canonical label.
static ROLE_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("ps", PASTOR),
        ("pastor", PASTOR),
        ("pr", PASTOR),
        ("dic", DEACON),
        ("diacono", DEACON),
        ("diaconoa", DEACON),
        ("diaconisa", DEACON),
        ("ob", WORKER),
        ("obreiro", WORKER),
        ("obreira", WORKER),
        ("mem", MEMBER),
        ("membro", MEMBER),
    ]
    .into_iter()
    .collect()
});

/// Marker columns in precedence order, each with the label it implies.
#[derive(Debug, Clone, Copy)]
pub struct RoleMarkers {
    pub pastor: Aliases,
    pub deacon: Aliases,
    pub worker: Aliases,
    pub member: Aliases,
}

impl RoleMarkers {
    /// Label of the first marker column holding a value: pastor > deacon > worker > member.
    #[must_use]
    pub fn cascade(&self, row: &RawRow) -> Option<&'static str> {
        [
            (&self.pastor, PASTOR),
            (&self.deacon, DEACON),
            (&self.worker, WORKER),
            (&self.member, MEMBER),
        ]
        .into_iter()
        .find(|(aliases, _)| !aliases.resolve(row).is_empty())
        .map(|(_, label)| label)
    }
}

/// Collapse a role spelling onto the canonical vocabulary.
///
/// Matching ignores case, accents and punctuation. Unknown text passes
/// through trimmed; empty or sentinel input yields [`ABSENT`].
#[must_use]
pub fn normalize_role_label(value: &str) -> String {
    let raw = value.trim();
    if is_absent(raw) {
        return ABSENT.to_string();
    }
    ROLE_SYNONYMS
        .get(normalize_compact(raw).as_str())
        .map_or_else(|| raw.to_string(), |label| (*label).to_string())
}

/// Derive the role label for a row.
///
/// An explicit role value wins; only when it is empty do the marker
/// columns cascade.
#[must_use]
pub fn derive_role(row: &RawRow, role: &Aliases, markers: &RoleMarkers) -> String {
    let explicit = role.resolve(row);
    if !explicit.is_empty() {
        return normalize_role_label(explicit);
    }
    markers
        .cascade(row)
        .map_or_else(|| ABSENT.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKERS: RoleMarkers = RoleMarkers {
        pastor: Aliases::new(&["Ps"]),
        deacon: Aliases::new(&["Dic"]),
        worker: Aliases::new(&["ob"]),
        member: Aliases::new(&["Mem"]),
    };
    const ROLE: Aliases = Aliases::new(&["cargo"]);

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_normalize_role_label_vocabulary() {
        assert_eq!(normalize_role_label("PASTOR"), PASTOR);
        assert_eq!(normalize_role_label(" ps "), PASTOR);
        assert_eq!(normalize_role_label("Diácono"), DEACON);
        assert_eq!(normalize_role_label("diacono(a)"), DEACON);
        assert_eq!(normalize_role_label("Dic."), DEACON);
        assert_eq!(normalize_role_label("obreiro"), WORKER);
        assert_eq!(normalize_role_label("MEMBRO"), MEMBER);
    }

    #[test]
    fn test_normalize_role_label_passthrough_and_absent() {
        assert_eq!(normalize_role_label(" Evangelista "), "Evangelista");
        assert_eq!(normalize_role_label(""), ABSENT);
        assert_eq!(normalize_role_label("\u{2014}"), ABSENT);
    }

    #[test]
    fn test_marker_cascade() {
        let r = row(&[("cargo", ""), ("Ps", "x")]);
        assert_eq!(derive_role(&r, &ROLE, &MARKERS), PASTOR);
    }

    #[test]
    fn test_marker_precedence_pastor_over_deacon() {
        let r = row(&[("Dic", "x"), ("Ps", "x"), ("Mem", "x")]);
        assert_eq!(derive_role(&r, &ROLE, &MARKERS), PASTOR);

        let r = row(&[("Mem", "1"), ("ob", "1")]);
        assert_eq!(derive_role(&r, &ROLE, &MARKERS), WORKER);
    }

    #[test]
    fn test_explicit_role_beats_markers() {
        let r = row(&[("cargo", "diacono"), ("Ps", "x")]);
        assert_eq!(derive_role(&r, &ROLE, &MARKERS), DEACON);
    }

    #[test]
    fn test_no_role_information() {
        let r = row(&[("Nome", "Ana")]);
        assert_eq!(derive_role(&r, &ROLE, &MARKERS), ABSENT);
    }
}
