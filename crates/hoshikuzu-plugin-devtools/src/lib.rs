//! Dev server plugin that reports development activity to an external listener.
//!
//! Two events are posted as JSON to a configurable base URL:
//!
//! - `{notify_url}/online` when the dev server starts listening, carrying the
//!   address a browser on this machine should use ([`ServerReadyEvent`]).
//! - `{notify_url}/update` when a source file changes ([`FileChangeEvent`]).
//!
//! Delivery is best effort. Failures are logged as warnings and never reach the
//! dev server: a missing or flaky listener cannot stall startup or hot reload.
//!
//! ## Architecture
//!
//! ```text
//! listening(addr) → resolve host → ServerReadyEvent → pretty JSON → POST /online (awaited)
//! hot update(file) → suffix filter → FileChangeEvent → JSON → POST /update (detached task)
//!                                                     ↳ modules returned unchanged
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hoshikuzu_plugin_devtools::{DevtoolsOptions, DevtoolsPlugin};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plugin = Arc::new(DevtoolsPlugin::new(DevtoolsOptions::new("http://localhost:9000"))?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use hoshikuzu_plugin::{DevPlugin, HotUpdateContext, ModuleNode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

mod config;
mod error;
mod event;
mod transport;

pub use config::{DevtoolsOptions, ONLINE_PATH, UPDATE_PATH};
pub use error::{BoxError, DevtoolsError, NotifyError};
pub use event::{is_tracked_source, resolve_host, FileChangeEvent, ServerReadyEvent, TRACKED_EXTENSIONS};
pub use transport::{HttpTransport, NotifyTransport};

/// Name reported by [`DevPlugin::name`].
pub const PLUGIN_NAME: &str = "hoshikuzu-devtools";

/// Dev server plugin posting lifecycle and file-change events to `notify_url`.
#[derive(Debug, Clone)]
pub struct DevtoolsPlugin {
    options: DevtoolsOptions,
    transport: Arc<dyn NotifyTransport>,
}

impl DevtoolsPlugin {
    /// Create the plugin with the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`DevtoolsError::InvalidNotifyUrl`] if `notify_url` is not an
    /// absolute http(s) URL.
    pub fn new(options: DevtoolsOptions) -> Result<Self, DevtoolsError> {
        Self::with_transport(options, Arc::new(HttpTransport::new()))
    }

    /// Create the plugin with a custom transport.
    pub fn with_transport(
        options: DevtoolsOptions,
        transport: Arc<dyn NotifyTransport>,
    ) -> Result<Self, DevtoolsError> {
        options.validate()?;
        Ok(Self { options, transport })
    }

    pub fn options(&self) -> &DevtoolsOptions {
        &self.options
    }

    /// Post a [`ServerReadyEvent`] for `addr` and wait for the outcome.
    pub async fn notify_online(&self, addr: SocketAddr) -> Result<(), NotifyError> {
        let event = ServerReadyEvent::from_addr(addr);
        let body = serde_json::to_string_pretty(&event)?;
        let url = self.options.online_url();

        debug!(%url, host = %event.host, port = event.port, "reporting server online");
        self.transport.post_json(&url, body).await
    }

    /// Post a [`FileChangeEvent`] for `file` on a detached task.
    ///
    /// Returns `None` without sending anything when `file` is not a tracked
    /// source. Delivery failures are logged by the task itself; the handle is
    /// only useful to callers that want to wait for the attempt.
    ///
    /// # Panics
    ///
    /// Panics if `file` is tracked and this is called outside a Tokio runtime.
    pub fn dispatch_update(&self, file: &str) -> Option<JoinHandle<()>> {
        if !is_tracked_source(file) {
            return None;
        }

        let body = match serde_json::to_string(&FileChangeEvent::single(file)) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "could not encode update notification");
                return None;
            }
        };
        let url = self.options.update_url();
        let transport = Arc::clone(&self.transport);

        debug!(%url, %file, "reporting source change");
        Some(tokio::spawn(async move {
            if let Err(err) = transport.post_json(&url, body).await {
                warn!(error = %err, "update notification failed");
            }
        }))
    }
}

#[async_trait]
impl DevPlugin for DevtoolsPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn on_listening(&self, addr: SocketAddr) {
        if let Err(err) = self.notify_online(addr).await {
            warn!(error = %err, "online notification failed");
        }
    }

    async fn handle_hot_update(&self, ctx: HotUpdateContext) -> Vec<ModuleNode> {
        let file = ctx.file.to_string_lossy();
        // Detached: hot reload must not wait on the listener.
        let _ = self.dispatch_update(&file);
        ctx.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_creation() {
        let plugin = DevtoolsPlugin::new(DevtoolsOptions::new("http://localhost:9000")).unwrap();
        assert_eq!(plugin.name(), PLUGIN_NAME);
        assert_eq!(plugin.options().notify_url, "http://localhost:9000");
    }

    #[test]
    fn test_plugin_rejects_invalid_url() {
        let err = DevtoolsPlugin::new(DevtoolsOptions::new("not a url")).unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[tokio::test]
    async fn test_untracked_file_dispatches_nothing() {
        let plugin = DevtoolsPlugin::new(DevtoolsOptions::new("http://localhost:9000")).unwrap();
        assert!(plugin.dispatch_update("/project/package.json").is_none());
        assert!(plugin.dispatch_update("/project/README").is_none());
    }

    #[test]
    fn test_untracked_file_needs_no_runtime() {
        let plugin = DevtoolsPlugin::new(DevtoolsOptions::new("http://localhost:9000")).unwrap();
        assert!(plugin.dispatch_update("/README.md").is_none());
    }

    #[test]
    #[should_panic]
    fn test_tracked_file_outside_runtime_panics() {
        let plugin = DevtoolsPlugin::new(DevtoolsOptions::new("http://localhost:9000")).unwrap();
        let _ = plugin.dispatch_update("/src/main.ts");
    }
}
