//! File system watcher for development mode.
//!
//! Watches the served root recursively and forwards relevant changes over a
//! channel, skipping ignored paths, hidden files and rapid repeats.

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_kind(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Drops events for a path seen again within the debounce window.
#[derive(Debug)]
struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    fn admit(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last_seen.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_seen.insert(path.to_path_buf(), now);
        true
    }
}

/// Recursive watcher over the served root.
///
/// Dropping it stops watching.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`.
    ///
    /// Returns the watcher and the receiving end of the change channel.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` doesn't exist or the OS watcher can't be set up.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut debouncer = Debouncer::new(Duration::from_millis(debounce_ms));
        let watch_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "file watcher error");
                    return;
                }
            };

            for path in event.paths {
                if should_ignore(&path, &watch_root, &ignore_patterns) {
                    continue;
                }
                if !debouncer.admit(&path, Instant::now()) {
                    continue;
                }
                if let Some(change) = FileChange::from_kind(&event.kind, path) {
                    // Receiver gone means the dev loop is shutting down.
                    let _ = tx.blocking_send(change);
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Check if a path should be ignored.
///
/// Paths outside `root`, hidden entries and anything matching a pattern are
/// skipped. `*.ext` patterns match by suffix, other patterns match a path
/// component.
pub(crate) fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
    let rel_path = match path.strip_prefix(root) {
        Ok(p) => p,
        Err(_) => return true,
    };

    let path_str = rel_path.to_string_lossy();
    for pattern in ignore_patterns {
        if let Some(suffix) = pattern.strip_prefix('*') {
            if path_str.ends_with(suffix) {
                return true;
            }
        } else if rel_path
            .components()
            .any(|c| c.as_os_str() == pattern.as_str())
        {
            return true;
        }
    }

    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
