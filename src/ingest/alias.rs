//! Header alias resolution.
//!
//! Form versions, export pipelines and manual edits all produce different
//! header text for the same column. An [`Aliases`] table lists the known
//! spellings for one canonical field; [`resolve`] picks the first usable
//! value from a row.
//!
//! Resolution runs two passes over the alias list:
//! 1. **Exact**: the alias is a key of the row and its value is non-empty
//! 2. **Normalized**: the alias and the row keys compare equal after
//!    [`normalize_key`] (case, diacritics and punctuation ignored)
//!
//! The normalized pass does most of the work. The exact mojibake spellings
//! kept in [`Aliases::legacy`] cover one historical export that double-decoded
//! UTF-8; that list is frozen.

use unicode_normalization::UnicodeNormalization;

use super::csv::RawRow;

/// Known header spellings for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct Aliases {
    /// Current and historical labels, in priority order.
    pub names: &'static [&'static str],
    /// Double-decoded (mojibake) spellings, tried after `names`.
    pub legacy: &'static [&'static str],
}

impl Aliases {
    /// Aliases with no legacy spellings.
    #[must_use]
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names, legacy: &[] }
    }

    /// Aliases with a frozen list of mojibake spellings.
    #[must_use]
    pub const fn with_legacy(
        names: &'static [&'static str],
        legacy: &'static [&'static str],
    ) -> Self {
        Self { names, legacy }
    }

    /// All spellings in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + Clone {
        self.names.iter().chain(self.legacy.iter()).copied()
    }

    /// Resolve this field from `row`. See [`resolve`].
    #[must_use]
    pub fn resolve<'r>(&self, row: &'r RawRow) -> &'r str {
        resolve_iter(row, self.iter())
    }
}

/// Return the first non-empty value of `row` matching one of `aliases`.
///
/// Exact matches win over normalized ones regardless of alias order.
/// Returns `""` when nothing matches.
#[must_use]
pub fn resolve<'r>(row: &'r RawRow, aliases: &[&str]) -> &'r str {
    resolve_iter(row, aliases.iter().copied())
}

fn resolve_iter<'a, 'r>(row: &'r RawRow, aliases: impl Iterator<Item = &'a str> + Clone) -> &'r str {
    for alias in aliases.clone() {
        if let Some(value) = row.get(alias) {
            if !value.is_empty() {
                return value;
            }
        }
    }

    let normalized_keys: Vec<(String, &str)> = row
        .iter()
        .map(|(key, value)| (normalize_key(key), value))
        .collect();

    for alias in aliases {
        let wanted = normalize_key(alias);
        if wanted.is_empty() {
            continue;
        }
        // First matching key decides; an empty value moves on to the next alias
        if let Some((_, value)) = normalized_keys.iter().find(|(key, _)| *key == wanted) {
            if !value.is_empty() {
                return *value;
            }
        }
    }

    ""
}

/// Normalize a header for comparison.
///
/// Lowercases, strips combining diacritics after canonical decomposition,
/// collapses every run of characters outside `[a-z0-9]` into one `_` and
/// trims leading/trailing `_`.
///
/// `"Qual Região Pertence"` → `"qual_regiao_pertence"`.
#[must_use]
pub fn normalize_key(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_sep = false;

    for ch in strip_diacritics(&value.trim().to_lowercase()).chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Normalize a value for join keys: like [`normalize_key`] with no separators.
///
/// `"Maria José da Silva"` → `"mariajosedasilva"`.
#[must_use]
pub fn normalize_compact(value: &str) -> String {
    strip_diacritics(&value.trim().to_lowercase())
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Canonical decomposition with combining marks (U+0300..U+036F) removed.
#[must_use]
pub fn strip_diacritics(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}
