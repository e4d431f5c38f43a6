//! Error types for the Painel CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=state, 4=validation, 6=sheets, ...)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for Painel operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,

    // Connection state (exit 3)
    NotConnected,

    // Validation (exit 4)
    InvalidUrl,
    InvalidArgument,

    // Sheets (exit 6)
    NoSheetData,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NotConnected => "NOT_CONNECTED",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NoSheetData => "NO_SHEET_DATA",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::NotConnected => 3,
            Self::InvalidUrl | Self::InvalidArgument => 4,
            Self::NoSheetData => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether running the same command again later can succeed.
    ///
    /// Missing sheet data is transient; an unpublished sheet may be published
    /// in the meantime. A malformed spreadsheet URL never is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::NoSheetData | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Painel operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid spreadsheet URL: {url}")]
    InvalidUrl { url: String },

    /// Neither letters nor workers were found and no cache was available.
    #[error("{0}")]
    NoSheetData(String),

    #[error("Not connected to a spreadsheet")]
    NotConnected,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl { .. } => ErrorCode::InvalidUrl,
            Self::NoSheetData(_) => ErrorCode::NoSheetData,
            Self::NotConnected => ErrorCode::NotConnected,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::InvalidUrl { .. } => Some(
                "Paste a Google Sheets URL containing /spreadsheets/d/<ID>/".to_string(),
            ),

            Self::NoSheetData(_) => Some(
                "Publish the spreadsheet (File -> Share -> Publish to the web) \
                 or pass the letters sheet name with `painel connect <url> --sheet <name>`"
                    .to_string(),
            ),

            Self::NotConnected => {
                Some("Connect first: painel connect <spreadsheet-url>".to_string())
            }

            Self::Config(_) => Some(
                "Check ~/.painel/config.json or run `painel config show`".to_string(),
            ),

            Self::InvalidArgument(msg) => {
                if msg.contains("config key") {
                    Some(format!(
                        "Valid keys: {}",
                        crate::config::Settings::KEYS.join(", ")
                    ))
                } else if msg.contains("date") {
                    Some("Dates use DD/MM/YYYY or YYYY-MM-DD".to_string())
                } else {
                    None
                }
            }

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
