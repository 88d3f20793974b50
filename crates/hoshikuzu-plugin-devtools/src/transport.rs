//! Outbound delivery of notification payloads.

use crate::error::NotifyError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

/// Delivers a JSON body to a URL with a single POST.
///
/// Implementations report any failure as [`NotifyError`]; they never retry.
#[async_trait]
pub trait NotifyTransport: Send + Sync + std::fmt::Debug {
    async fn post_json(&self, url: &str, body: String) -> Result<(), NotifyError>;
}

/// [`NotifyTransport`] backed by a shared `reqwest` client.
///
/// Uses the client's default timeouts. The response status is not checked:
/// a listener answering 4xx/5xx still counts as delivered.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (connection pool, proxy settings, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotifyTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::delivery(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "listener answered with a non-success status");
        }

        Ok(())
    }
}
