//! Dashboard counters.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::ingest::parse_date;
use crate::model::{is_absent, LetterRecord, WorkerRecord};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total_letters: usize,
    pub letters_today: usize,
    /// Today and the six days before it
    pub letters_last_7_days: usize,
    pub total_workers: usize,
    /// Role label and count, most frequent first
    pub by_role: Vec<RoleCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

impl Metrics {
    /// Compute metrics as of `today`.
    ///
    /// Role counts come from workers when there are any, else from letters.
    #[must_use]
    pub fn compute(letters: &[LetterRecord], workers: &[WorkerRecord], today: NaiveDate) -> Self {
        let week_start = today - TimeDelta::days(6);
        let dates: Vec<NaiveDate> = letters
            .iter()
            .filter_map(|l| parse_date(&l.emitted_at))
            .collect();

        let by_role = if workers.is_empty() {
            count_roles(letters.iter().map(|l| l.role.as_str()))
        } else {
            count_roles(workers.iter().map(|w| w.role.as_str()))
        };

        Self {
            total_letters: letters.len(),
            letters_today: dates.iter().filter(|d| **d == today).count(),
            letters_last_7_days: dates
                .iter()
                .filter(|d| (week_start..=today).contains(*d))
                .count(),
            total_workers: workers.len(),
            by_role,
        }
    }
}

fn count_roles<'a>(roles: impl Iterator<Item = &'a str>) -> Vec<RoleCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for role in roles.map(str::trim).filter(|r| !is_absent(r)) {
        *counts.entry(role).or_default() += 1;
    }

    let mut out: Vec<RoleCount> = counts
        .into_iter()
        .map(|(role, count)| RoleCount {
            role: role.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.role.cmp(&b.role)));
    out
}
