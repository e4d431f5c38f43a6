//! Sync engine: one spreadsheet connection and its lifecycle.
//!
//! ```text
//! Disconnected -> Connecting -> Connected <-> Refreshing
//!       ^             |             |
//!       +-------------+-------------+  (failure without cache / disconnect)
//! ```
//!
//! All mutable state lives in this struct. Locks are only taken in
//! synchronous sections, never across a fetch.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::{SessionFile, SessionState, Settings};
use crate::error::Error;
use crate::model::{AccessRecord, LetterRecord, RecordKind, WorkerRecord};
use crate::sheets::strategy::{candidate_sheets, fetch_canonical, Resolution};
use crate::sheets::{extract_spreadsheet_id, merge_access, SheetSource};
use crate::storage::EventType;

use super::cache::RecordCache;
use super::detect::{detect, sort_newest_first, Windows};
use super::notify::Notifier;

/// Letters kept in the session file for quick display.
const RECENT_SNAPSHOT_LEN: usize = 10;

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Refreshing,
}

/// Engine tunables, usually built from [`Settings`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub windows: Windows,
    pub cache_top_n: usize,
    /// Recorded on log events
    pub actor: String,
}

impl EngineConfig {
    #[must_use]
    pub fn from_settings(settings: &Settings, actor: impl Into<String>) -> Self {
        Self {
            windows: Windows::from_minutes(
                settings.recent_window_minutes,
                settings.notify_window_minutes,
            ),
            cache_top_n: settings.cache_top_n,
            actor: actor.into(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), "painel")
    }
}

/// Summary of one successful (or offline) cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub letters: usize,
    pub workers: usize,
    pub letters_sheet: Option<String>,
    pub workers_sheet: Option<String>,
    /// Whether an access sheet was found and merged
    pub access_merged: bool,
    pub notifications: usize,
    /// One-time recent digest, newest first
    pub digest: Vec<LetterRecord>,
}

/// Result of [`SyncEngine::connect`]. Fetch problems never escape as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(SyncReport),
    /// Live fetch failed; serving the cached snapshot
    Offline(SyncReport),
    /// Another connect was running
    Skipped,
    /// A disconnect happened while fetching; the result was dropped
    Stale,
    Failed(String),
}

impl ConnectOutcome {
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_) | Self::Offline(_))
    }
}

#[derive(Debug)]
struct EngineState {
    phase: ConnectionState,
    letters: Vec<LetterRecord>,
    workers: Vec<WorkerRecord>,
    letters_sheet: Option<String>,
    offline: bool,
    last_error: Option<String>,
    session: SessionState,
}

/// Clears the in-flight flag when a connect finishes, however it returns.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Owns the records, dedup state and collaborators of one connection.
pub struct SyncEngine<S> {
    source: S,
    cache: Box<dyn RecordCache>,
    notifier: Box<dyn Notifier>,
    session_file: SessionFile,
    config: EngineConfig,
    clock: Clock,
    in_flight: AtomicBool,
    generation: AtomicU64,
    state: Mutex<EngineState>,
}

impl<S: SheetSource> SyncEngine<S> {
    /// Build an engine, loading persisted session state from `session_file`.
    pub fn new(
        source: S,
        cache: Box<dyn RecordCache>,
        notifier: Box<dyn Notifier>,
        session_file: SessionFile,
        config: EngineConfig,
    ) -> Self {
        let mut session = session_file.load();
        session.ensure_client_id();
        Self {
            source,
            cache,
            notifier,
            session_file,
            config,
            clock: Box::new(|| chrono::Local::now().naive_local()),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            state: Mutex::new(EngineState {
                phase: ConnectionState::Disconnected,
                letters: Vec::new(),
                workers: Vec::new(),
                letters_sheet: None,
                offline: false,
                last_error: None,
                session,
            }),
        }
    }

    /// Replace the wall clock used for change detection.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fetch letters, access and workers from `url` and apply the result.
    ///
    /// `sheet_hint` names a custom letters tab. `silent` suppresses
    /// user-facing signaling (warnings, digest) but still updates state and
    /// runs change detection.
    pub async fn connect(&self, url: &str, sheet_hint: Option<&str>, silent: bool) -> ConnectOutcome {
        let Some(spreadsheet_id) = extract_spreadsheet_id(url) else {
            let message = Error::InvalidUrl { url: url.to_string() }.to_string();
            if !silent {
                tracing::warn!(url, "rejected spreadsheet URL");
            }
            return ConnectOutcome::Failed(message);
        };

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!(silent, "sync already running, skipping");
            return ConnectOutcome::Skipped;
        };

        let generation = self.generation.load(Ordering::Acquire);
        let hint = self.begin(url, sheet_hint);
        tracing::debug!(spreadsheet_id, hint = ?hint, silent, "sync started");

        let letters: Resolution<LetterRecord> =
            fetch_canonical(&self.source, spreadsheet_id, hint.as_deref()).await;
        let access: Resolution<AccessRecord> =
            fetch_canonical(&self.source, spreadsheet_id, None).await;
        let workers: Resolution<WorkerRecord> =
            fetch_canonical(&self.source, spreadsheet_id, None).await;

        let fetched = Fetched {
            letters_sheet: letters.sheet().map(str::to_string),
            workers_sheet: workers.sheet().map(str::to_string),
            access_merged: access.is_found(),
            letters: letters.into_records(),
            access: access.into_records(),
            workers: workers.into_records(),
        };

        self.finish(url, hint, generation, fetched, silent)
    }

    /// Reconnect silently to the persisted URL, if any.
    pub async fn auto_reconnect(&self) -> Option<ConnectOutcome> {
        let url = self.lock().session.url.clone()?;
        Some(self.connect(&url, None, true).await)
    }

    /// Mark the start of a cycle and settle the letters sheet hint.
    fn begin(&self, url: &str, sheet_hint: Option<&str>) -> Option<String> {
        let mut state = self.lock();
        state.phase = match state.phase {
            ConnectionState::Connected | ConnectionState::Refreshing => ConnectionState::Refreshing,
            ConnectionState::Disconnected | ConnectionState::Connecting => ConnectionState::Connecting,
        };

        let explicit = sheet_hint
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);
        let same_url = state.session.url.as_deref() == Some(url);
        let previous_id = state.session.url.as_deref().and_then(extract_spreadsheet_id);
        if previous_id.is_some_and(|id| Some(id) != extract_spreadsheet_id(url)) {
            // Dedup state belongs to the previous spreadsheet
            tracing::debug!("switching spreadsheet, resetting dedup state");
            state.session.clear_connection();
        }
        explicit.or_else(|| {
            if same_url {
                state.session.custom_sheet.clone()
            } else {
                None
            }
        })
    }

    fn finish(
        &self,
        url: &str,
        hint: Option<String>,
        generation: u64,
        fetched: Fetched,
        silent: bool,
    ) -> ConnectOutcome {
        let mut state = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("disconnected during sync, dropping result");
            return ConnectOutcome::Stale;
        }

        let outcome = if fetched.letters.is_empty() && fetched.workers.is_empty() {
            self.fall_back(&mut state, url, hint.as_deref(), silent)
        } else {
            self.apply(&mut state, url, hint, fetched, silent)
        };

        if let Err(e) = self.session_file.save(&state.session) {
            tracing::warn!(error = %e, "failed to save session state");
        }
        outcome
    }

    fn apply(
        &self,
        state: &mut EngineState,
        url: &str,
        hint: Option<String>,
        fetched: Fetched,
        silent: bool,
    ) -> ConnectOutcome {
        let Fetched {
            mut letters,
            access,
            workers,
            letters_sheet,
            workers_sheet,
            access_merged,
        } = fetched;

        if access_merged {
            letters = merge_access(letters, &access);
        }
        sort_newest_first(&mut letters);

        let present: HashSet<String> = letters.iter().map(LetterRecord::identity_key).collect();
        self.cache.prune_excluded(&present);
        let excluded = self.cache.excluded_keys();
        if !excluded.is_empty() {
            letters.retain(|l| !excluded.contains(&l.identity_key()));
        }

        let was_connected = state.phase == ConnectionState::Refreshing && !state.offline;
        let client_id = state.session.ensure_client_id().to_string();
        let top = &letters[..letters.len().min(self.config.cache_top_n)];
        self.cache.write(&client_id, top);

        let session = &mut state.session;
        session.url = Some(url.to_string());
        session.custom_sheet = hint;
        session.recent_letters = letters.iter().take(RECENT_SNAPSHOT_LEN).cloned().collect();

        let detection = detect(session, &letters, self.config.windows, (self.clock)(), silent);
        let mut notifications = 0;
        if let Some(notification) = detection.notification() {
            self.notifier.notify(&notification);
            self.cache.log_event(
                EventType::Notified,
                Some(&format!("{}: {}", notification.title, notification.body)),
                &self.config.actor,
            );
            notifications = 1;
        }

        let report = SyncReport {
            letters: letters.len(),
            workers: workers.len(),
            letters_sheet: letters_sheet.clone(),
            workers_sheet,
            access_merged,
            notifications,
            digest: detection.digest,
        };

        if !was_connected {
            self.cache.log_event(
                EventType::Connected,
                Some(&format!(
                    "{} letters ({}), {} workers ({})",
                    report.letters,
                    report.letters_sheet.as_deref().unwrap_or("none"),
                    report.workers,
                    report.workers_sheet.as_deref().unwrap_or("none"),
                )),
                &self.config.actor,
            );
        }
        tracing::info!(
            letters = report.letters,
            workers = report.workers,
            notifications,
            silent,
            "sync complete"
        );

        state.phase = ConnectionState::Connected;
        state.letters = letters;
        state.workers = workers;
        state.letters_sheet = letters_sheet;
        state.offline = false;
        state.last_error = None;
        ConnectOutcome::Connected(report)
    }

    fn fall_back(
        &self,
        state: &mut EngineState,
        url: &str,
        hint: Option<&str>,
        silent: bool,
    ) -> ConnectOutcome {
        let message = no_data_message(hint);
        let client_id = state.session.ensure_client_id().to_string();
        let refreshing = state.phase == ConnectionState::Refreshing;

        if let Some(mut cached) = self.cache.read(&client_id).filter(|c| !c.is_empty()) {
            let excluded = self.cache.excluded_keys();
            cached.retain(|l| !excluded.contains(&l.identity_key()));
            tracing::warn!(cached = cached.len(), "live fetch failed, serving cached letters");

            if !state.offline {
                self.cache
                    .log_event(EventType::ConnectedOffline, Some(&message), &self.config.actor);
            }
            state.session.url = Some(url.to_string());
            state.phase = ConnectionState::Connected;
            state.offline = true;
            state.last_error = Some(message);
            state.letters_sheet = None;
            state.workers.clear();
            let report = SyncReport {
                letters: cached.len(),
                ..SyncReport::default()
            };
            state.letters = cached;
            return ConnectOutcome::Offline(report);
        }

        if silent {
            tracing::debug!(error = %message, "silent sync failed");
        } else {
            tracing::warn!(error = %message, "connect failed");
        }
        if !silent || refreshing {
            self.cache
                .log_event(EventType::ConnectFailed, Some(&message), &self.config.actor);
        }

        // the persisted URL stays so the next start can retry
        state.phase = ConnectionState::Disconnected;
        state.letters.clear();
        state.workers.clear();
        state.letters_sheet = None;
        state.offline = false;
        state.last_error = Some(message.clone());
        ConnectOutcome::Failed(message)
    }

    /// Drop the connection, its records and its dedup state.
    pub fn disconnect(&self) {
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);

        state.phase = ConnectionState::Disconnected;
        state.letters.clear();
        state.workers.clear();
        state.letters_sheet = None;
        state.offline = false;
        state.last_error = None;
        state.session.clear_connection();
        state.session.custom_sheet = None;

        if let Err(e) = self.session_file.save(&state.session) {
            tracing::warn!(error = %e, "failed to save session state");
        }
        self.cache
            .log_event(EventType::Disconnected, None, &self.config.actor);
        tracing::info!("disconnected");
    }

    /// Exclude a record deleted upstream until a resync drops it.
    pub fn record_deleted(&self, letter: &LetterRecord) {
        let key = letter.identity_key();
        self.cache.exclude(&key, Some(&letter.name), &self.config.actor);

        let mut state = self.lock();
        state.letters.retain(|l| l.identity_key() != key);
        state.session.recent_letters.retain(|l| l.identity_key() != key);
        if let Err(e) = self.session_file.save(&state.session) {
            tracing::warn!(error = %e, "failed to save session state");
        }
    }

    // ==================
    // Accessors
    // ==================

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.lock().phase
    }

    /// Current letters, newest first.
    #[must_use]
    pub fn letters(&self) -> Vec<LetterRecord> {
        self.lock().letters.clone()
    }

    #[must_use]
    pub fn workers(&self) -> Vec<WorkerRecord> {
        self.lock().workers.clone()
    }

    /// Whether the last cycle returned any workers.
    #[must_use]
    pub fn has_workers(&self) -> bool {
        !self.lock().workers.is_empty()
    }

    #[must_use]
    pub fn letters_sheet_used(&self) -> Option<String> {
        self.lock().letters_sheet.clone()
    }

    /// Connected but serving the cached snapshot.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.lock().offline
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// URL persisted for auto-reconnect.
    #[must_use]
    pub fn session_url(&self) -> Option<String> {
        self.lock().session.url.clone()
    }

    /// Recent-letters snapshot from the session file.
    #[must_use]
    pub fn recent_letters(&self) -> Vec<LetterRecord> {
        self.lock().session.recent_letters.clone()
    }

    #[must_use]
    pub fn block_form_url(&self) -> Option<String> {
        self.lock().session.block_form_url.clone()
    }
}

struct Fetched {
    letters: Vec<LetterRecord>,
    access: Vec<AccessRecord>,
    workers: Vec<WorkerRecord>,
    letters_sheet: Option<String>,
    workers_sheet: Option<String>,
    access_merged: bool,
}

/// Human message naming the sheets that were expected.
fn no_data_message(hint: Option<&str>) -> String {
    let letters = candidate_sheets(RecordKind::Letters, hint).join(", ");
    let workers = candidate_sheets(RecordKind::Workers, None).join(", ");
    Error::NoSheetData(format!(
        "No data found. Expected a letters sheet ({letters}) or a workers sheet ({workers}), published to the web."
    ))
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::sheets::strategy::tests::FakeSource;
    use crate::storage::SqliteStorage;
    use crate::sync::cache::SqliteRecordCache;
    use crate::sync::notify::tests::RecordingNotifier;

    const URL: &str = "https://docs.google.com/spreadsheets/d/abc123/edit#gid=0";

    const LETTERS: &str = "Carimbo de data/hora,Nome completo,Telefone,Status\n\
        19/10/2026 11:00:00,Ana,11 99999-0000,Liberado\n\
        19/10/2026 10:00:00,Bia,,Pendente\n";

    const WORKERS: &str = "nome,cargo\nCaio,Pastor\n";

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// Engine sharing its notifier with the test through an `Arc`.
    fn engine(source: FakeSource) -> (SyncEngine<FakeSource>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = SyncEngine::new(
            source,
            Box::new(SqliteRecordCache::new(SqliteStorage::open_memory().unwrap())),
            Box::new(SharedNotifier(Arc::clone(&notifier))),
            SessionFile::in_memory(),
            EngineConfig::default(),
        )
        .with_clock(noon);
        (engine, notifier)
    }

    struct SharedNotifier(Arc<RecordingNotifier>);

    impl Notifier for SharedNotifier {
        fn notify(&self, notification: &crate::sync::notify::Notification) {
            self.0.notify(notification);
        }
    }

    #[tokio::test]
    async fn test_connect_success() {
        let source = FakeSource::default()
            .with("CARTAS_DB", LETTERS)
            .with("OBREIROS_DB", WORKERS);
        let (engine, _) = engine(source);

        let ConnectOutcome::Connected(report) = engine.connect(URL, None, false).await else {
            panic!("expected Connected");
        };
        assert_eq!(report.letters, 2);
        assert_eq!(report.workers, 1);
        assert_eq!(report.letters_sheet.as_deref(), Some("CARTAS_DB"));
        assert!(!report.access_merged);
        assert_eq!(report.digest.len(), 2);

        assert_eq!(engine.state(), ConnectionState::Connected);
        assert_eq!(engine.letters()[0].name, "Ana");
        assert_eq!(engine.letters()[0].status, "Liberado");
        assert_eq!(engine.session_url().as_deref(), Some(URL));
        assert!(engine.has_workers());
    }

    #[tokio::test]
    async fn test_invalid_url_changes_nothing() {
        let (engine, _) = engine(FakeSource::default());
        let outcome = engine.connect("https://example.com/x", None, false).await;

        assert!(matches!(outcome, ConnectOutcome::Failed(ref m) if m.contains("Invalid spreadsheet URL")));
        assert_eq!(engine.state(), ConnectionState::Disconnected);
        assert!(engine.session_url().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_connect_runs_once() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, _) = engine(source);

        let (first, second) = tokio::join!(
            engine.connect(URL, None, false),
            engine.connect(URL, None, true)
        );

        assert!(first.is_connected());
        assert_eq!(second, ConnectOutcome::Skipped);
        let requested = engine.source.requested();
        assert_eq!(requested.iter().filter(|s| *s == "CARTAS_DB").count(), 1);
    }

    #[tokio::test]
    async fn test_partial_data_is_success() {
        let source = FakeSource::default().with("OBREIROS", WORKERS);
        let (engine, _) = engine(source);

        let ConnectOutcome::Connected(report) = engine.connect(URL, None, false).await else {
            panic!("expected Connected");
        };
        assert_eq!(report.letters, 0);
        assert_eq!(report.workers, 1);
        assert!(engine.letters_sheet_used().is_none());
    }

    #[tokio::test]
    async fn test_no_data_no_cache_fails_with_sheet_names() {
        let (engine, _) = engine(FakeSource::default());

        let ConnectOutcome::Failed(message) = engine.connect(URL, Some("Respostas"), false).await
        else {
            panic!("expected Failed");
        };
        assert!(message.contains("CARTAS_DB"));
        assert!(message.contains("Respostas"));
        assert!(message.contains("OBREIROS_DB"));
        assert_eq!(engine.state(), ConnectionState::Disconnected);
        assert_eq!(engine.last_error(), Some(message));
    }

    #[tokio::test]
    async fn test_refresh_failure_serves_cache() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, _) = engine(source);
        assert!(engine.connect(URL, None, false).await.is_connected());

        engine.source.clear();
        let ConnectOutcome::Offline(report) = engine.connect(URL, None, true).await else {
            panic!("expected Offline");
        };
        assert_eq!(report.letters, 2);
        assert!(engine.is_offline());
        assert_eq!(engine.state(), ConnectionState::Connected);
        assert_eq!(engine.letters().len(), 2);
    }

    #[tokio::test]
    async fn test_access_merge_applied() {
        let source = FakeSource::default()
            .with("CARTAS_DB", LETTERS)
            .with("ACESSO", "nome,status,motivo\nAna,Bloqueado,Pendência\n");
        let (engine, _) = engine(source);

        let ConnectOutcome::Connected(report) = engine.connect(URL, None, false).await else {
            panic!("expected Connected");
        };
        assert!(report.access_merged);
        let letters = engine.letters();
        assert_eq!(letters[0].status, "Bloqueado");
        assert_eq!(letters[0].block_reason, "Pendência");
        assert_eq!(letters[1].status, crate::model::ABSENT);
    }

    #[tokio::test]
    async fn test_new_letters_notify_once() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, notifier) = engine(source);
        engine.connect(URL, None, true).await;
        assert_eq!(notifier.count(), 0);

        let newer = format!("{LETTERS}19/10/2026 11:45:00,Caio,,Pendente\n");
        engine.source.set("CARTAS_DB", &newer);
        let ConnectOutcome::Connected(report) = engine.connect(URL, None, true).await else {
            panic!("expected Connected");
        };
        assert_eq!(report.notifications, 1);

        // same newest timestamp again
        engine.connect(URL, None, true).await;
        assert_eq!(notifier.count(), 1);
        assert_eq!(notifier.sent.lock().unwrap()[0].body, "Caio");
    }

    #[tokio::test]
    async fn test_disconnect_clears_state() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, _) = engine(source);
        engine.connect(URL, Some("Respostas"), false).await;

        engine.disconnect();
        assert_eq!(engine.state(), ConnectionState::Disconnected);
        assert!(engine.letters().is_empty());
        assert!(engine.session_url().is_none());
        assert!(engine.recent_letters().is_empty());
        assert!(engine.auto_reconnect().await.is_none());
    }

    #[tokio::test]
    async fn test_switching_spreadsheet_resets_dedup_state() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, notifier) = engine(source);
        let ConnectOutcome::Connected(first) = engine.connect(URL, None, false).await else {
            panic!("expected Connected");
        };
        assert_eq!(first.digest.len(), 2);

        let other = "https://docs.google.com/spreadsheets/d/xyz789/edit";
        engine.source.set(
            "CARTAS_DB",
            "Carimbo de data/hora,Nome completo\n\
             19/10/2026 10:30:00,Caio\n\
             19/10/2026 09:30:00,Davi\n",
        );
        let ConnectOutcome::Connected(second) = engine.connect(other, None, false).await else {
            panic!("expected Connected");
        };
        assert_eq!(second.digest.len(), 2);
        assert_eq!(second.notifications, 0);
        assert_eq!(notifier.count(), 0);
        assert_eq!(engine.session_url().as_deref(), Some(other));

        // same spreadsheet under another URL form keeps its state
        let same = "https://docs.google.com/spreadsheets/d/xyz789/edit#gid=0";
        let ConnectOutcome::Connected(third) = engine.connect(same, None, false).await else {
            panic!("expected Connected");
        };
        assert!(third.digest.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_during_fetch_drops_result() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, _) = engine(source);

        let (outcome, ()) = tokio::join!(engine.connect(URL, None, false), async {
            engine.disconnect();
        });

        assert_eq!(outcome, ConnectOutcome::Stale);
        assert!(engine.letters().is_empty());
        assert!(engine.session_url().is_none());
    }

    #[tokio::test]
    async fn test_record_deleted_is_hidden_until_gone() {
        let source = FakeSource::default().with("CARTAS_DB", LETTERS);
        let (engine, _) = engine(source);
        engine.connect(URL, None, false).await;

        let ana = engine.letters()[0].clone();
        engine.record_deleted(&ana);
        assert_eq!(engine.letters().len(), 1);

        // still in the sheet: stays hidden
        engine.connect(URL, None, true).await;
        assert!(engine.letters().iter().all(|l| l.name != "Ana"));

        // dropped upstream: exclusion pruned
        engine
            .source
            .set("CARTAS_DB", "Carimbo de data/hora,Nome completo\n19/10/2026 10:00:00,Bia\n");
        engine.connect(URL, None, true).await;
        assert!(engine.cache.excluded_keys().is_empty());
    }

    #[tokio::test]
    async fn test_auto_reconnect_uses_persisted_hint() {
        let source = FakeSource::default().with("Respostas", LETTERS);
        let (engine, _) = engine(source);
        assert!(engine.connect(URL, Some("Respostas"), false).await.is_connected());

        let outcome = engine.auto_reconnect().await.unwrap();
        assert!(outcome.is_connected());
        assert_eq!(engine.letters_sheet_used().as_deref(), Some("Respostas"));
    }
}
