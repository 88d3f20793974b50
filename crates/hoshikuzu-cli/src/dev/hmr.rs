//! Turns watcher events into client reload events.
//!
//! Created and modified files become a single affected module that is run
//! through the plugin pipeline; whatever modules survive are pushed to clients
//! as an update. Removed files always trigger a full reload.

use crate::dev::{DevEvent, FileChange, PluginContainer, SharedState};
use hoshikuzu_plugin::{HotUpdateContext, ModuleNode};
use std::path::{Component, Path};

/// URL path a file under `root` is served from (`/src/App.vue`).
///
/// Returns `None` for files outside `root`.
pub fn url_path(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let mut url = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            url.push('/');
            url.push_str(&part.to_string_lossy());
        }
    }
    if url.is_empty() {
        url.push('/');
    }
    Some(url)
}

/// Modules affected by a change, before plugins see them.
pub fn affected_modules(root: &Path, change: &FileChange) -> Vec<ModuleNode> {
    match change {
        FileChange::Removed(_) => Vec::new(),
        FileChange::Created(path) | FileChange::Modified(path) => url_path(root, path)
            .map(|url| vec![ModuleNode::new(path.clone(), url)])
            .unwrap_or_default(),
    }
}

/// Decide what to tell clients about `change`, running plugin hooks on the way.
///
/// Returns `None` when plugins dropped every affected module.
pub async fn process_change(
    root: &Path,
    change: &FileChange,
    plugins: &PluginContainer,
) -> Option<DevEvent> {
    let timestamp = chrono::Utc::now().timestamp_millis();

    if let FileChange::Removed(path) = change {
        return Some(DevEvent::FullReload {
            path: url_path(root, path),
        });
    }

    let ctx = HotUpdateContext {
        file: change.path().to_path_buf(),
        timestamp,
        modules: affected_modules(root, change),
    };
    let modules = plugins.hot_update(ctx).await;

    if modules.is_empty() {
        tracing::debug!(file = %change.path().display(), "hot update handled by plugins");
        return None;
    }

    Some(DevEvent::Update {
        paths: modules.into_iter().map(|m| m.url).collect(),
        timestamp,
    })
}

/// Handle one watcher event end to end.
pub async fn handle_file_change(
    change: FileChange,
    root: &Path,
    plugins: &PluginContainer,
    state: &SharedState,
) {
    tracing::info!(file = %change.path().display(), "file changed");

    if let Some(event) = process_change(root, &change, plugins).await {
        state.broadcast(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hoshikuzu_plugin::DevPlugin;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Debug)]
    struct DropAll;

    #[async_trait]
    impl DevPlugin for DropAll {
        fn name(&self) -> &str {
            "drop-all"
        }

        async fn handle_hot_update(&self, _ctx: HotUpdateContext) -> Vec<ModuleNode> {
            Vec::new()
        }
    }

    #[test]
    fn test_url_path() {
        let root = Path::new("/project");
        assert_eq!(
            url_path(root, Path::new("/project/src/App.vue")).as_deref(),
            Some("/src/App.vue")
        );
        assert_eq!(url_path(root, Path::new("/project")).as_deref(), Some("/"));
        assert_eq!(url_path(root, Path::new("/elsewhere/App.vue")), None);
    }

    #[test]
    fn test_affected_modules() {
        let root = Path::new("/project");
        let change = FileChange::Modified(PathBuf::from("/project/src/main.ts"));
        assert_eq!(
            affected_modules(root, &change),
            vec![ModuleNode::new("/project/src/main.ts", "/src/main.ts")]
        );

        let removed = FileChange::Removed(PathBuf::from("/project/src/main.ts"));
        assert!(affected_modules(root, &removed).is_empty());
    }

    #[tokio::test]
    async fn test_modified_file_becomes_update() {
        let root = Path::new("/project");
        let change = FileChange::Modified(PathBuf::from("/project/src/App.vue"));

        match process_change(root, &change, &PluginContainer::new()).await {
            Some(DevEvent::Update { paths, .. }) => assert_eq!(paths, vec!["/src/App.vue"]),
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_removed_file_becomes_full_reload() {
        let root = Path::new("/project");
        let change = FileChange::Removed(PathBuf::from("/project/src/App.vue"));

        assert_eq!(
            process_change(root, &change, &PluginContainer::new()).await,
            Some(DevEvent::FullReload {
                path: Some("/src/App.vue".to_string())
            })
        );
    }

    #[tokio::test]
    async fn test_plugins_can_swallow_update() {
        let mut plugins = PluginContainer::new();
        plugins.push(Arc::new(DropAll));
        let change = FileChange::Created(PathBuf::from("/project/src/new.ts"));

        assert_eq!(process_change(Path::new("/project"), &change, &plugins).await, None);
    }
}
