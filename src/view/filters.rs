//! Letter and worker filters.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ingest::{normalize_key, parse_date};
use crate::model::{is_absent, LetterRecord, WorkerRecord};

/// Filter over letters. Every criterion is optional; unset means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterFilter {
    /// Substring of the name, accent and case insensitive
    pub search: Option<String>,
    pub church: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    /// Emitted on or after this day
    pub from: Option<NaiveDate>,
    /// Emitted on or before this day (whole day included)
    pub to: Option<NaiveDate>,
}

impl LetterFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn matches(&self, letter: &LetterRecord) -> bool {
        if let Some(search) = &self.search {
            if !contains_folded(&letter.name, search) {
                return false;
            }
        }
        if !equals_folded(self.church.as_deref(), &letter.origin_church)
            || !equals_folded(self.role.as_deref(), &letter.role)
            || !equals_folded(self.status.as_deref(), &letter.status)
        {
            return false;
        }

        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(emitted) = parse_date(&letter.emitted_at) else {
            return false;
        };
        self.from.is_none_or(|from| emitted >= from) && self.to.is_none_or(|to| emitted <= to)
    }

    /// Letters matching the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, letters: &'a [LetterRecord]) -> Vec<&'a LetterRecord> {
        letters.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Workers whose name contains `search` (all of them when `None`).
#[must_use]
pub fn search_workers<'a>(workers: &'a [WorkerRecord], search: Option<&str>) -> Vec<&'a WorkerRecord> {
    workers
        .iter()
        .filter(|w| search.is_none_or(|s| contains_folded(&w.name, s)))
        .collect()
}

/// Distinct values offered by each letter filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub churches: Vec<String>,
    pub roles: Vec<String>,
    pub statuses: Vec<String>,
}

impl FilterOptions {
    /// Collect sorted distinct values, ignoring absent ones.
    #[must_use]
    pub fn from_letters(letters: &[LetterRecord]) -> Self {
        Self {
            churches: distinct(letters.iter().map(|l| l.origin_church.as_str())),
            roles: distinct(letters.iter().map(|l| l.role.as_str())),
            statuses: distinct(letters.iter().map(|l| l.status.as_str())),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !is_absent(v))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = normalize_key(needle);
    needle.is_empty() || normalize_key(haystack).contains(&needle)
}

fn equals_folded(wanted: Option<&str>, value: &str) -> bool {
    wanted.is_none_or(|w| normalize_key(w) == normalize_key(value))
}
