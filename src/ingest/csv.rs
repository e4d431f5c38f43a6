//! CSV decoding for published sheet exports.
//!
//! The decoder is deliberately forgiving: unbalanced quotes never abort a
//! parse, they only change how the remaining characters are grouped.
//!
//! Decoding happens in two passes:
//! 1. Split the text into records on newlines that are outside quotes
//! 2. Split each record into fields on commas that are outside quotes

/// Prefix of the positional pseudo-header added to every row.
pub const POSITIONAL_PREFIX: &str = "col_";

/// One decoded data row: header text to trimmed value.
///
/// Keys keep the header order of the sheet. Every named field is followed by
/// a positional key (`col_A`, `col_B`, ...) holding the same value, so a
/// column can still be found when its header text is mangled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    ///
    /// A repeated key keeps its original position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(key, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys, positional keys included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Decode CSV text into rows keyed by the first record's headers.
///
/// Returns an empty list when there is no header plus at least one record.
/// Blank records are skipped. Header names and values are trimmed. A row
/// with fewer values than headers gets empty strings for the missing ones;
/// values past the last header are dropped.
#[must_use]
pub fn parse(text: &str) -> Vec<RawRow> {
    let records = split_records(text);
    if records.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = split_fields(&records[0])
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(records.len() - 1);
    for record in &records[1..] {
        if record.trim().is_empty() {
            continue;
        }
        let values = split_fields(record);
        let mut row = RawRow::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = values.get(idx).map_or("", |v| v.trim());
            row.insert(header.as_str(), value);
            row.insert(positional_key(idx), value);
        }
        rows.push(row);
    }
    rows
}

/// Positional pseudo-header for a 0-based column index (`col_A`, `col_AA`, ...).
#[must_use]
pub fn positional_key(index: usize) -> String {
    format!("{POSITIONAL_PREFIX}{}", column_letter(index))
}

/// Spreadsheet column name for a 0-based index: 0 → `A`, 25 → `Z`, 26 → `AA`.
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, always a valid ASCII offset
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Split text into records on newlines outside quotes.
///
/// Quote characters are kept so the field pass can interpret them.
fn split_records(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = normalized.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push_str("\"\"");
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => records.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Split one record into raw (untrimmed) field values.
fn split_fields(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
    }
    fields.push(current);
    fields
}
