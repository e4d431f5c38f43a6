//! Notification delivery.
//!
//! The engine builds at most one [`Notification`] per burst of new letters
//! and hands it to a [`Notifier`]. Delivery is fire-and-forget.

use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};

/// Payload sent to the push fan-out endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub data: serde_json::Value,
}

/// Sink for notifications. Must never block or fail the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
    }
}

/// POSTs notifications as JSON to a push fan-out endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, notification: &Notification) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(endpoint = %self.endpoint, "no async runtime, notification dropped");
            return;
        };

        let mut request = self.client.post(&self.endpoint).json(notification);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let endpoint = self.endpoint.clone();

        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(endpoint = %endpoint, "notification delivered");
                }
                Ok(response) => {
                    tracing::warn!(endpoint = %endpoint, status = response.status().as_u16(), "push endpoint rejected notification");
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "push request failed");
                }
            }
        });
    }
}
