//! Plugin hooks for the hoshikuzu development server.
//!
//! The dev server drives every registered [`DevPlugin`] through two points of
//! its lifecycle:
//!
//! - **listening**: once the HTTP listener is bound, with the socket address the
//!   OS actually assigned (which may differ from the configured one).
//! - **hot update**: whenever a watched file changes, with the list of modules
//!   the server considers affected. Each plugin receives the list returned by
//!   the previous one and hands back the list the next stage should see.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use hoshikuzu_plugin::{DevPlugin, HotUpdateContext, ModuleNode};
//!
//! #[derive(Debug)]
//! struct SkipStyles;
//!
//! #[async_trait]
//! impl DevPlugin for SkipStyles {
//!     fn name(&self) -> &str {
//!         "skip-styles"
//!     }
//!
//!     async fn handle_hot_update(&self, ctx: HotUpdateContext) -> Vec<ModuleNode> {
//!         ctx.modules
//!             .into_iter()
//!             .filter(|m| !m.url.ends_with(".css"))
//!             .collect()
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::net::SocketAddr;
use std::path::PathBuf;

/// A module the dev server considers affected by a file change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Stable module identifier (the absolute file path)
    pub id: String,
    /// URL path the module is served from, always `/`-separated
    pub url: String,
    /// File backing the module
    pub file: PathBuf,
}

impl ModuleNode {
    /// Create a module node for `file`, served at `url`.
    pub fn new(file: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            id: file.to_string_lossy().into_owned(),
            url: url.into(),
            file,
        }
    }
}

/// Input to [`DevPlugin::handle_hot_update`].
#[derive(Debug, Clone)]
pub struct HotUpdateContext {
    /// The changed file
    pub file: PathBuf,
    /// Milliseconds since the Unix epoch when the change was picked up
    pub timestamp: i64,
    /// Modules affected by the change, as produced by the previous stage
    pub modules: Vec<ModuleNode>,
}

/// A development server plugin.
///
/// Hooks have no error channel. A plugin that talks to the outside world owns
/// its failure policy; the server never waits on a plugin to decide whether it
/// can keep serving.
#[async_trait]
pub trait DevPlugin: Send + Sync + Debug {
    /// Plugin name, used in logs.
    fn name(&self) -> &str;

    /// Called once the server socket is listening.
    ///
    /// `addr` is the bound address, not the configured one.
    async fn on_listening(&self, _addr: SocketAddr) {}

    /// Called for every file change picked up by the watcher.
    ///
    /// Returns the module list the next stage should see. The default keeps it
    /// unchanged.
    async fn handle_hot_update(&self, ctx: HotUpdateContext) -> Vec<ModuleNode> {
        ctx.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Passthrough;

    #[async_trait]
    impl DevPlugin for Passthrough {
        fn name(&self) -> &str {
            "passthrough"
        }
    }

    #[test]
    fn module_node_id_is_file_path() {
        let node = ModuleNode::new("/project/src/main.ts", "/src/main.ts");
        assert_eq!(node.id, "/project/src/main.ts");
        assert_eq!(node.url, "/src/main.ts");
        assert_eq!(node.file, PathBuf::from("/project/src/main.ts"));
    }

    #[tokio::test]
    async fn default_hot_update_keeps_modules() {
        let modules = vec![
            ModuleNode::new("/project/src/a.ts", "/src/a.ts"),
            ModuleNode::new("/project/src/b.ts", "/src/b.ts"),
        ];
        let ctx = HotUpdateContext {
            file: PathBuf::from("/project/src/a.ts"),
            timestamp: 0,
            modules: modules.clone(),
        };

        assert_eq!(Passthrough.handle_hot_update(ctx).await, modules);
    }

    #[tokio::test]
    async fn default_on_listening_is_noop() {
        Passthrough
            .on_listening("127.0.0.1:5173".parse().unwrap())
            .await;
    }
}
