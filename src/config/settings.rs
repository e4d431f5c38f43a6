//! User settings from `config.json`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sheets::DEFAULT_SHEETS_HOST;

/// Tunables for fetching, polling and notifications.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Seconds between silent refreshes in `painel watch`
    pub poll_interval_secs: u64,

    /// Letters emitted within this window show up in the one-time digest
    pub recent_window_minutes: i64,

    /// New letters older than this never raise a notification
    pub notify_window_minutes: i64,

    /// Letters kept in the offline cache snapshot
    pub cache_top_n: usize,

    /// Base URL of the sheet CSV export
    pub sheets_host: String,

    pub request_timeout_secs: u64,

    /// Push fan-out endpoint; notifications are only logged when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            recent_window_minutes: 300,
            notify_window_minutes: 30,
            cache_top_n: 50,
            sheets_host: DEFAULT_SHEETS_HOST.to_string(),
            request_timeout_secs: 20,
            notify_endpoint: None,
            notify_api_key: None,
        }
    }
}

impl Settings {
    /// Keys accepted by [`Settings::set`], as written in the file.
    pub const KEYS: [&'static str; 8] = [
        "pollIntervalSecs",
        "recentWindowMinutes",
        "notifyWindowMinutes",
        "cacheTopN",
        "sheetsHost",
        "requestTimeoutSecs",
        "notifyEndpoint",
        "notifyApiKey",
    ];

    /// Load settings from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
    }

    /// Save settings to `path`, creating the parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
    }

    /// Apply `PAINEL_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok());
        self
    }

    /// Apply overrides from `lookup` (env var name to value).
    ///
    /// Empty values are ignored; unparsable numbers are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("PAINEL_SHEETS_HOST") {
            self.sheets_host = host;
        }
        if let Some(raw) = get("PAINEL_POLL_INTERVAL") {
            match raw.trim().parse() {
                Ok(secs) => self.poll_interval_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid PAINEL_POLL_INTERVAL"),
            }
        }
        if let Some(endpoint) = get("PAINEL_NOTIFY_ENDPOINT") {
            self.notify_endpoint = Some(endpoint);
        }
    }

    /// Set one key from its string form.
    ///
    /// Optional keys are cleared by `""` or `none`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown keys or unparsable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "pollIntervalSecs" => self.poll_interval_secs = parse_number(key, value)?,
            "recentWindowMinutes" => self.recent_window_minutes = parse_number(key, value)?,
            "notifyWindowMinutes" => self.notify_window_minutes = parse_number(key, value)?,
            "cacheTopN" => self.cache_top_n = parse_number(key, value)?,
            "requestTimeoutSecs" => self.request_timeout_secs = parse_number(key, value)?,
            "sheetsHost" => {
                if value.is_empty() {
                    return Err(Error::InvalidArgument("sheetsHost cannot be empty".into()));
                }
                self.sheets_host = value.to_string();
            }
            "notifyEndpoint" => self.notify_endpoint = optional(value),
            "notifyApiKey" => self.notify_api_key = optional(value),
            other => {
                return Err(Error::InvalidArgument(format!("unknown config key: {other}")));
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{key} expects a number, got '{value}'")))
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty() && !value.eq_ignore_ascii_case("none")).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.notify_window_minutes, 30);
        assert_eq!(settings.recent_window_minutes, 300);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"cacheTopN": 10, "notifyEndpoint": "https://push"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.cache_top_n, 10);
        assert_eq!(settings.notify_endpoint.as_deref(), Some("https://push"));
        assert_eq!(settings.sheets_host, DEFAULT_SHEETS_HOST);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut settings = Settings::default();
        settings.set("pollIntervalSecs", "15").unwrap();
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap().poll_interval_secs, 15);
    }

    #[test]
    fn test_set_validates() {
        let mut settings = Settings::default();
        assert!(settings.set("cacheTopN", "abc").is_err());
        assert!(settings.set("colour", "blue").is_err());
        settings.set("notifyApiKey", "k").unwrap();
        assert_eq!(settings.notify_api_key.as_deref(), Some("k"));
        settings.set("notifyApiKey", "none").unwrap();
        assert_eq!(settings.notify_api_key, None);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(|name| match name {
            "PAINEL_SHEETS_HOST" => Some("http://localhost:9000".into()),
            "PAINEL_POLL_INTERVAL" => Some("nope".into()),
            "PAINEL_NOTIFY_ENDPOINT" => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.sheets_host, "http://localhost:9000");
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.notify_endpoint, None);
    }
}
