//! Development server module.
//!
//! - Static file serving from the project root
//! - Live reload via Server-Sent Events
//! - File watching with debouncing
//! - Plugin hooks for server start and hot updates

pub mod hmr;
pub mod plugins;
pub mod server;
pub mod state;
pub mod watcher;

pub use plugins::PluginContainer;
pub use server::DevServer;
pub use state::{DevServerState, SharedState};
pub use watcher::{FileChange, FileWatcher};

use serde::{Deserialize, Serialize};

/// Events pushed to live-reload clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DevEvent {
    /// Sent once to a client right after it subscribes
    Connected { id: usize },

    /// Modules to refetch, as URL paths
    Update { paths: Vec<String>, timestamp: i64 },

    /// Reload the whole page
    FullReload { path: Option<String> },
}
