//! Sync engine and its collaborators.
//!
//! - **Engine**: connect / refresh / disconnect state machine with an
//!   in-flight guard and offline cache fallback
//! - **Detect**: new-letter detection, recent digest, notification policy
//! - **Notify**: log and webhook notifiers
//! - **Cache**: offline snapshot, exclusions and event log behind a trait
//! - **Poll**: periodic silent refresh
//! - **Hash**: SHA256 fingerprints for change detection and identity keys
//!
//! # Example
//!
//! ```ignore
//! use painel::sync::{EngineConfig, SyncEngine, SqliteRecordCache, LogNotifier};
//!
//! let engine = SyncEngine::new(source, Box::new(cache), Box::new(LogNotifier), session, config);
//! match engine.connect(url, None, false).await {
//!     ConnectOutcome::Connected(report) => println!("{} letters", report.letters),
//!     ConnectOutcome::Failed(message) => eprintln!("{message}"),
//!     _ => {}
//! }
//! ```

pub mod cache;
pub mod detect;
pub mod engine;
pub mod hash;
pub mod notify;
pub mod poll;

pub use cache::{RecordCache, SqliteRecordCache};
pub use detect::{detect, sort_newest_first, Detection, Windows};
pub use engine::{ConnectOutcome, ConnectionState, EngineConfig, SyncEngine, SyncReport};
pub use notify::{LogNotifier, Notification, Notifier, WebhookNotifier};
pub use poll::poll;
