//! Read-side helpers for the dashboard: filters, metrics and row actions.
//!
//! Everything here works on canonical records and never mutates them.

pub mod actions;
pub mod filters;
pub mod metrics;

pub use actions::{display, whatsapp_link, StatusClass, DISPLAY_ABSENT};
pub use filters::{search_workers, FilterOptions, LetterFilter};
pub use metrics::{Metrics, RoleCount};
