//! Error types for the devtools plugin.

use miette::Diagnostic;
use thiserror::Error;

/// Boxed transport error, so test transports don't need a real HTTP client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to deliver a notification.
///
/// Never surfaced to the dev server: the plugin logs it and moves on.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The request could not be completed (refused, DNS, timeout, ...)
    #[error("failed to deliver notification to {url}: {source}")]
    Delivery {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The payload could not be serialized
    #[error("failed to encode notification payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl NotifyError {
    pub fn delivery(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Delivery {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Errors raised while constructing the plugin.
#[derive(Error, Debug, Diagnostic)]
pub enum DevtoolsError {
    #[error("invalid notify URL '{url}': {reason}")]
    #[diagnostic(
        code(hoshikuzu::devtools::invalid_notify_url),
        help("Use an absolute http(s) URL without the /online or /update suffix, e.g. http://localhost:9000")
    )]
    InvalidNotifyUrl { url: String, reason: String },
}

impl DevtoolsError {
    pub fn invalid_notify_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidNotifyUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
