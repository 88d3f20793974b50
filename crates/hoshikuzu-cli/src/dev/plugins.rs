//! Plugin container driving [`DevPlugin`] hooks in registration order.

use hoshikuzu_plugin::{DevPlugin, HotUpdateContext, ModuleNode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PluginContainer {
    plugins: Vec<Arc<dyn DevPlugin>>,
}

impl PluginContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plugin: Arc<dyn DevPlugin>) {
        debug!(plugin = plugin.name(), "registered dev plugin");
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every plugin's listening hook, one after another.
    pub async fn listening(&self, addr: SocketAddr) {
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), %addr, "listening hook");
            plugin.on_listening(addr).await;
        }
    }

    /// Thread the affected module list through every plugin.
    ///
    /// Each plugin sees the list returned by the one before it.
    pub async fn hot_update(&self, mut ctx: HotUpdateContext) -> Vec<ModuleNode> {
        for plugin in &self.plugins {
            let modules = plugin.handle_hot_update(ctx.clone()).await;
            ctx.modules = modules;
        }
        ctx.modules
    }
}
