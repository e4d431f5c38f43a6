//! New-letter detection and notification policy.
//!
//! Pure functions over the letters of one cycle and the dedup state kept in
//! [`SessionState`]. The caller supplies `now`, so tests control the clock.

use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};

use crate::config::SessionState;
use crate::ingest::parse_timestamp;
use crate::model::LetterRecord;

use super::notify::Notification;

/// Time windows for the digest and for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    /// Letters this recent show up in the one-time digest
    pub recent: TimeDelta,
    /// Letters older than this never notify
    pub notify: TimeDelta,
}

impl Windows {
    #[must_use]
    pub fn from_minutes(recent: i64, notify: i64) -> Self {
        Self {
            recent: TimeDelta::minutes(recent.max(0)),
            notify: TimeDelta::minutes(notify.max(0)),
        }
    }
}

/// What one cycle found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// One-time digest of recent letters (first non-silent connect only)
    pub digest: Vec<LetterRecord>,
    /// Letters newer than the last cycle, not yet notified
    pub new_letters: Vec<LetterRecord>,
}

impl Detection {
    /// The single notification for this burst, if any.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        let first = self.new_letters.first()?;
        let count = self.new_letters.len();
        let title = if count == 1 {
            "New preaching letter".to_string()
        } else {
            format!("{count} new preaching letters")
        };
        let names: Vec<&str> = self.new_letters.iter().map(|l| l.name.as_str()).collect();
        let url = (!crate::model::is_absent(&first.pdf_url)).then(|| first.pdf_url.clone());
        Some(Notification {
            title,
            body: names.join(", "),
            url,
            data: serde_json::json!({
                "count": count,
                "keys": self.new_letters.iter().map(LetterRecord::identity_key).collect::<Vec<_>>(),
            }),
        })
    }
}

/// Sort letters newest first. Unparsable timestamps go last, in input order.
pub fn sort_newest_first(letters: &mut [LetterRecord]) {
    letters.sort_by_cached_key(|l| std::cmp::Reverse(parse_timestamp(&l.emitted_at)));
}

/// Compare this cycle's letters against the dedup state and update it.
///
/// - First cycle (no last-seen instant): seed it. A non-silent first connect
///   also yields the recent digest, once per connection.
/// - Later cycles: letters strictly newer than last-seen, not notified yet and
///   within the notify window of `now` are new.
pub fn detect(
    state: &mut SessionState,
    letters: &[LetterRecord],
    windows: Windows,
    now: NaiveDateTime,
    silent: bool,
) -> Detection {
    let stamped: Vec<(NaiveDateTime, &LetterRecord)> = letters
        .iter()
        .filter_map(|l| parse_timestamp(&l.emitted_at).map(|ts| (ts, l)))
        .collect();
    let newest = stamped.iter().map(|(ts, _)| *ts).max();
    let mut detection = Detection::default();

    let Some(last_seen) = state.last_seen else {
        state.last_seen = newest;
        if !silent && !state.digest_shown {
            let since = now - windows.recent;
            detection.digest = stamped
                .iter()
                .filter(|(ts, _)| *ts >= since)
                .map(|(_, l)| (*l).clone())
                .collect();
            state.digest_shown = true;
        }
        return detection;
    };

    let cutoff = now - windows.notify;
    for (ts, letter) in &stamped {
        if *ts <= last_seen || *ts < cutoff {
            continue;
        }
        let key = letter.identity_key();
        if state.notified_keys.insert(key) {
            detection.new_letters.push((*letter).clone());
        }
    }

    if let Some(newest) = newest {
        state.last_seen = Some(newest.max(last_seen));
    }

    // Keys older than the notify window can never pass the gates again
    let live: HashSet<String> = stamped
        .iter()
        .filter(|(ts, _)| *ts >= cutoff)
        .map(|(_, letter)| letter.identity_key())
        .collect();
    state.notified_keys.retain(|key| live.contains(key));
    detection
}
