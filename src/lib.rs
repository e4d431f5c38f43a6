//! Painel - letters and workers dashboard fed by published Google Sheets
//!
//! This crate provides the core functionality for the `painel` CLI tool.
//!
//! # Architecture
//!
//! - [`ingest`] - CSV decoding, header aliases, row transformers, dates
//! - [`model`] - Canonical records (letters, workers, access rows)
//! - [`sheets`] - Sheet fetching, candidate resolution, access merge
//! - [`sync`] - Sync engine, change detection, notifications, polling
//! - [`view`] - Filters, metrics and row actions
//! - [`storage`] - SQLite cache, exclusions and event log
//! - [`config`] - Settings and persisted session state
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod sheets;
pub mod storage;
pub mod sync;
pub mod view;

pub use error::{Error, Result};
pub use model::{is_absent, AccessRecord, LetterRecord, WorkerRecord, ABSENT};
pub use sync::{ConnectOutcome, SyncEngine};
