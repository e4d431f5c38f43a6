//! Spreadsheet access: fetching, candidate resolution and merging.

pub mod merge;
pub mod source;
pub mod strategy;

pub use merge::merge_access;
pub use source::{
    build_csv_url, extract_spreadsheet_id, FetchError, HttpSheetSource, SheetSource,
    DEFAULT_SHEETS_HOST,
};
pub use strategy::{candidate_sheets, fetch_canonical, FailedAttempt, Resolution};
