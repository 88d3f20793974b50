//! Shared state for the development server.
//!
//! Tracks connected live-reload clients and fans events out to them.

use crate::dev::DevEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Per-client queue depth; a client that falls this far behind is dropped.
const CLIENT_BUFFER: usize = 100;

/// Shared development server state.
pub struct DevServerState {
    /// Connected SSE clients
    clients: RwLock<HashMap<usize, mpsc::Sender<String>>>,

    /// Next client ID
    next_client_id: AtomicUsize,

    /// Directory being served
    root: PathBuf,
}

impl DevServerState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_client_id: AtomicUsize::new(0),
            root,
        }
    }

    /// Register a new SSE client.
    ///
    /// Returns the client ID and the receiving end of its event queue.
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send an event to every connected client.
    ///
    /// Never waits: clients whose queue is full or closed are dropped.
    pub fn broadcast(&self, event: &DevEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "could not encode dev event");
                return;
            }
        };

        let mut gone = Vec::new();
        for (id, tx) in self.clients.read().iter() {
            match tx.try_send(json.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(client = id, "dropping client that stopped reading");
                    gone.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(client = id, "dropping disconnected client");
                    gone.push(*id);
                }
            }
        }

        if !gone.is_empty() {
            let mut clients = self.clients.write();
            for id in gone {
                clients.remove(&id);
            }
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

/// Shared state handle.
pub type SharedState = Arc<DevServerState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let state = DevServerState::new(PathBuf::from("."));
        let (id1, _rx1) = state.register_client();
        let (id2, _rx2) = state.register_client();

        assert_ne!(id1, id2);
        assert_eq!(state.client_count(), 2);

        state.unregister_client(id1);
        assert_eq!(state.client_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_clients() {
        let state = DevServerState::new(PathBuf::from("."));
        let (_id, mut rx) = state.register_client();

        state.broadcast(&DevEvent::FullReload { path: None });

        let json = rx.recv().await.unwrap();
        assert!(json.contains("full-reload"));
    }

    #[tokio::test]
    async fn test_broadcast_prunes_closed_clients() {
        let state = DevServerState::new(PathBuf::from("."));
        let (_alive, _rx) = state.register_client();
        let (_dead, rx) = state.register_client();
        drop(rx);

        state.broadcast(&DevEvent::FullReload { path: None });
        assert_eq!(state.client_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_drops_stalled_client_without_blocking() {
        let state = DevServerState::new(PathBuf::from("."));
        let (_stalled, _undrained) = state.register_client();
        let (_live, mut rx) = state.register_client();

        for _ in 0..CLIENT_BUFFER {
            state.broadcast(&DevEvent::FullReload { path: None });
            rx.recv().await.unwrap();
        }
        assert_eq!(state.client_count(), 2);

        state.broadcast(&DevEvent::FullReload { path: None });
        assert_eq!(state.client_count(), 1);
        assert!(rx.recv().await.unwrap().contains("full-reload"));
    }
}
