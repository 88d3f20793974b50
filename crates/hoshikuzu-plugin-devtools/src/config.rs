//! Devtools plugin options.

use crate::error::DevtoolsError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Path appended to `notify_url` for server-ready events.
pub const ONLINE_PATH: &str = "/online";

/// Path appended to `notify_url` for file-change events.
pub const UPDATE_PATH: &str = "/update";

/// Options for [`DevtoolsPlugin`](crate::DevtoolsPlugin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevtoolsOptions {
    /// Base URL of the listener, e.g. `http://localhost:9000`.
    ///
    /// Endpoints are built by appending `/online` and `/update` verbatim, so a
    /// trailing slash is kept as written.
    pub notify_url: String,
}

impl DevtoolsOptions {
    /// Create options for the given listener base URL.
    pub fn new(notify_url: impl Into<String>) -> Self {
        Self {
            notify_url: notify_url.into(),
        }
    }

    /// Check that `notify_url` is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), DevtoolsError> {
        if self.notify_url.trim().is_empty() {
            return Err(DevtoolsError::invalid_notify_url(
                &self.notify_url,
                "the URL is empty",
            ));
        }

        let url = Url::parse(&self.notify_url)
            .map_err(|e| DevtoolsError::invalid_notify_url(&self.notify_url, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(DevtoolsError::invalid_notify_url(
                &self.notify_url,
                format!("unsupported scheme '{}'", other),
            )),
        }
    }

    /// Endpoint receiving [`ServerReadyEvent`](crate::ServerReadyEvent)s.
    pub fn online_url(&self) -> String {
        format!("{}{}", self.notify_url, ONLINE_PATH)
    }

    /// Endpoint receiving [`FileChangeEvent`](crate::FileChangeEvent)s.
    pub fn update_url(&self) -> String {
        format!("{}{}", self.notify_url, UPDATE_PATH)
    }
}
