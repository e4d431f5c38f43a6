//! Command implementations.
//!
//! Commands that talk to the spreadsheet build a [`SyncEngine`] over the
//! local database and session file, then drive it on a short-lived tokio
//! runtime.

pub mod completions;
pub mod config;
pub mod connection;
pub mod hide;
pub mod records;
pub mod status;
pub mod version;
pub mod watch;

use std::path::PathBuf;

use crate::config::{
    default_actor, resolve_db_path, session_path, settings_path, SessionFile, Settings,
};
use crate::error::{Error, Result};
use crate::sheets::HttpSheetSource;
use crate::storage::SqliteStorage;
use crate::sync::{
    ConnectOutcome, EngineConfig, LogNotifier, Notifier, SqliteRecordCache, SyncEngine,
    SyncReport, WebhookNotifier,
};

/// Engine type used by the binary.
pub type Engine = SyncEngine<HttpSheetSource>;

/// Settings from `config.json` with environment overrides applied.
///
/// # Errors
///
/// Returns an error if the settings file exists but is invalid.
pub fn load_settings() -> Result<Settings> {
    let settings = match settings_path() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}

/// Open the local database.
///
/// # Errors
///
/// Returns an error if no path can be resolved or the database fails to open.
pub fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine the painel home directory".into()))?;
    SqliteStorage::open(&path)
}

/// Session file under the painel home (in memory when there is no home).
#[must_use]
pub fn session_file() -> SessionFile {
    session_path().map_or_else(SessionFile::in_memory, SessionFile::new)
}

/// Build the engine with its HTTP source, SQLite cache and notifier.
///
/// # Errors
///
/// Returns an error if settings, database or HTTP client setup fails.
pub fn open_engine(db_path: Option<&PathBuf>, actor: Option<&str>) -> Result<Engine> {
    let settings = load_settings()?;
    let storage = open_storage(db_path)?;
    let source = HttpSheetSource::new(settings.sheets_host.clone(), settings.request_timeout())?;

    let notifier: Box<dyn Notifier> = match &settings.notify_endpoint {
        Some(endpoint) => Box::new(WebhookNotifier::new(
            endpoint.clone(),
            settings.notify_api_key.clone(),
            settings.request_timeout(),
        )?),
        None => Box::new(LogNotifier),
    };

    let actor = actor.map_or_else(default_actor, str::to_string);
    Ok(SyncEngine::new(
        source,
        Box::new(SqliteRecordCache::new(storage)),
        notifier,
        session_file(),
        EngineConfig::from_settings(&settings, actor),
    ))
}

/// Runtime for one command invocation.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Silent re-sync of the persisted connection.
///
/// # Errors
///
/// Returns [`Error::NotConnected`] without a persisted URL, or
/// [`Error::NoSheetData`] when neither live data nor cache is available.
pub fn sync_persisted(engine: &Engine, rt: &tokio::runtime::Runtime) -> Result<SyncReport> {
    let outcome = rt
        .block_on(engine.auto_reconnect())
        .ok_or(Error::NotConnected)?;
    report_or_error(outcome, engine)
}

/// Turn a connect outcome into a report, warning when offline.
///
/// # Errors
///
/// Returns [`Error::NoSheetData`] for a failed connect.
pub fn report_or_error(outcome: ConnectOutcome, engine: &Engine) -> Result<SyncReport> {
    match outcome {
        ConnectOutcome::Connected(report) => Ok(report),
        ConnectOutcome::Offline(report) => {
            tracing::warn!(
                error = engine.last_error().as_deref().unwrap_or("unknown"),
                "spreadsheet unreachable, showing cached letters"
            );
            Ok(report)
        }
        ConnectOutcome::Failed(message) => Err(Error::NoSheetData(message)),
        ConnectOutcome::Skipped | ConnectOutcome::Stale => {
            Err(Error::Other("Sync was interrupted, try again".into()))
        }
    }
}

/// Truncate to `max` characters, marking the cut.
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Left-align `s` in a column of `width` characters.
#[must_use]
pub fn pad(s: &str, width: usize) -> String {
    let t = truncate(s, width);
    let fill = width.saturating_sub(t.chars().count());
    format!("{t}{}", " ".repeat(fill))
}
