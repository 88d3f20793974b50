//! `hoshikuzu dev`: serve, watch and report.
//!
//! 1. Load and validate configuration
//! 2. Register plugins (devtools when a notify URL is configured)
//! 3. Bind the server and start serving; listening hooks fire on the bound address
//! 4. Watch the root and turn changes into hot updates
//! 5. Stop on Ctrl+C

use crate::cli::DevArgs;
use crate::config::DevConfig;
use crate::dev::{hmr, DevServer, DevServerState, FileWatcher, PluginContainer};
use crate::error::Result;
use crate::ui;
use hoshikuzu_plugin_devtools::{DevtoolsOptions, DevtoolsPlugin};
use std::sync::Arc;
use tokio::signal;

/// Execute the dev command.
pub async fn execute(args: DevArgs) -> Result<()> {
    let config = DevConfig::load(&args)?;
    let root = config.canonical_root();
    ui::info(&format!("Serving {}", root.display()));

    let plugins = Arc::new(build_plugins(&config)?);
    if !plugins.is_empty() {
        ui::info(&format!("Plugins: {}", plugins.names().join(", ")));
    }

    let state = Arc::new(DevServerState::new(root.clone()));

    let (watcher, mut change_rx) =
        FileWatcher::new(root.clone(), config.watch_ignore.clone(), config.debounce_ms)?;
    ui::info(&format!("Watching for changes in {}", watcher.root().display()));

    let server = DevServer::bind(&config, state.clone()).await?;
    ui::success(&format!("Development server running at {}", server.url()));

    let server_plugins = plugins.clone();
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(server_plugins).await {
            ui::error(&e.to_string());
        }
    });

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = change_rx.recv() => {
                hmr::handle_file_change(change, &root, &plugins, &state).await;
            }

            _ = signal::ctrl_c() => {
                ui::info("Shutting down development server...");
                break;
            }

            _ = &mut server_handle => {
                ui::warning("Server task completed unexpectedly");
                break;
            }
        }
    }

    server_handle.abort();
    ui::success("Development server stopped");
    Ok(())
}

/// Plugins enabled by `config`, in hook order.
pub fn build_plugins(config: &DevConfig) -> Result<PluginContainer> {
    let mut plugins = PluginContainer::new();

    if let Some(notify_url) = &config.notify_url {
        let devtools = DevtoolsPlugin::new(DevtoolsOptions::new(notify_url.clone()))?;
        tracing::info!(notify_url = %notify_url, "devtools notifications enabled");
        plugins.push(Arc::new(devtools));
    }

    Ok(plugins)
}
