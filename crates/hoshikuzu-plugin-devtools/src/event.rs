//! Notification payloads.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Source file suffixes worth reporting.
pub const TRACKED_EXTENSIONS: &[&str] = &[".ts", ".js", ".tsx", ".jsx", ".vue", ".scss", ".css"];

/// Sent to `{notify_url}/online` once the server is listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReadyEvent {
    pub http: String,
    pub ws: String,
    pub host: String,
    pub port: u16,
    pub time_unix: i64,
}

impl ServerReadyEvent {
    /// Build the event for a bound socket address, stamped with the current time.
    pub fn from_addr(addr: SocketAddr) -> Self {
        Self::with_time(addr, now_millis())
    }

    fn with_time(addr: SocketAddr, time_unix: i64) -> Self {
        let host = resolve_host(addr);
        let port = addr.port();
        Self {
            http: format!("http://{}:{}", host, port),
            ws: format!("ws://{}:{}", host, port),
            host,
            port,
            time_unix,
        }
    }
}

/// Sent to `{notify_url}/update` when a tracked source file changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeEvent {
    pub files: Vec<String>,
    pub time: i64,
}

impl FileChangeEvent {
    /// Build the event for a single changed file, stamped with the current time.
    pub fn single(file: impl Into<String>) -> Self {
        Self {
            files: vec![file.into()],
            time: now_millis(),
        }
    }
}

/// Hostname a browser on this machine should use to reach `addr`.
///
/// Any IPv6 bind maps to the loopback literal `[::1]`, the IPv4 wildcard maps
/// to `localhost`, anything else is reported as bound.
pub fn resolve_host(addr: SocketAddr) -> String {
    match addr {
        SocketAddr::V6(_) => "[::1]".to_string(),
        SocketAddr::V4(v4) if v4.ip().is_unspecified() => "localhost".to_string(),
        SocketAddr::V4(v4) => v4.ip().to_string(),
    }
}

/// Whether a changed path is a source file the listener cares about.
pub fn is_tracked_source(path: &str) -> bool {
    TRACKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
