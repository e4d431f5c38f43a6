//! Where sheet CSV comes from.
//!
//! [`SheetSource`] is the seam between the fetch strategy and the network.
//! [`HttpSheetSource`] talks to the published-sheet CSV export; tests use an
//! in-memory fake.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::error::{Error, Result};

/// Default host of the spreadsheet CSV export.
pub const DEFAULT_SHEETS_HOST: &str = "https://docs.google.com";

const SPREADSHEET_PATH_MARKER: &str = "/spreadsheets/d/";

/// Why a single sheet fetch failed.
///
/// Always recoverable at the strategy level: the next candidate is tried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid export URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    /// HTML came back instead of CSV: the tab is missing or not published.
    #[error("sheet not found or spreadsheet not published")]
    NotPublished,
}

/// Fetches the raw CSV text of one sheet tab.
pub trait SheetSource: Send + Sync {
    /// Fetch sheet `sheet` of spreadsheet `spreadsheet_id` as CSV text.
    fn fetch_csv(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> impl Future<Output = std::result::Result<String, FetchError>> + Send;
}

/// Published-sheet CSV export over HTTPS.
pub struct HttpSheetSource {
    client: reqwest::Client,
    host: String,
}

impl HttpSheetSource {
    /// Create a source against `host` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            host: host.into(),
        })
    }
}

impl SheetSource for HttpSheetSource {
    async fn fetch_csv(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> std::result::Result<String, FetchError> {
        let url = build_csv_url(&self.host, spreadsheet_id, sheet)?;
        tracing::debug!(sheet, %url, "fetching sheet");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if is_html_payload(&text) {
            return Err(FetchError::NotPublished);
        }
        Ok(text)
    }
}

/// Build the CSV export URL for one sheet tab.
///
/// `{host}/spreadsheets/d/{id}/gviz/tq?tqx=out:csv&sheet={name}`, with the
/// sheet name form-encoded.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `host` is not a valid base URL.
pub fn build_csv_url(
    host: &str,
    spreadsheet_id: &str,
    sheet: &str,
) -> std::result::Result<Url, FetchError> {
    let base = format!(
        "{}{SPREADSHEET_PATH_MARKER}{spreadsheet_id}/gviz/tq?tqx=out:csv",
        host.trim_end_matches('/')
    );
    let mut url = Url::parse(&base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
    url.query_pairs_mut().append_pair("sheet", sheet);
    Ok(url)
}

/// Extract the spreadsheet id from a Google Sheets URL.
///
/// The id is the run of `[A-Za-z0-9_-]` right after `/spreadsheets/d/`.
#[must_use]
pub fn extract_spreadsheet_id(url: &str) -> Option<&str> {
    let start = url.find(SPREADSHEET_PATH_MARKER)? + SPREADSHEET_PATH_MARKER.len();
    let rest = &url[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

/// Whether a response body is an HTML page rather than CSV.
#[must_use]
pub fn is_html_payload(text: &str) -> bool {
    text.contains("<!DOCTYPE html>") || text.contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spreadsheet_id() {
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=0"),
            Some("1AbC-d_9")
        );
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/XYZ"),
            Some("XYZ")
        );
        assert_eq!(extract_spreadsheet_id("https://docs.google.com/document/d/XYZ/"), None);
        assert_eq!(extract_spreadsheet_id("https://docs.google.com/spreadsheets/d//"), None);
        assert_eq!(extract_spreadsheet_id(""), None);
    }

    #[test]
    fn test_build_csv_url() {
        let url = build_csv_url(DEFAULT_SHEETS_HOST, "abc", "CARTAS DB").unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:csv&sheet=CARTAS+DB"
        );

        let url = build_csv_url("http://127.0.0.1:8080/", "abc", "CARTAS_DB").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert!(url.as_str().ends_with("sheet=CARTAS_DB"));
    }

    #[test]
    fn test_build_csv_url_bad_host() {
        assert!(matches!(
            build_csv_url("not a host", "abc", "X"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_is_html_payload() {
        assert!(is_html_payload("<!DOCTYPE html><html><body>login</body></html>"));
        assert!(is_html_payload("\n<html lang=\"pt\">"));
        assert!(!is_html_payload("Nome,Status\nAna,Ativo\n"));
    }
}
