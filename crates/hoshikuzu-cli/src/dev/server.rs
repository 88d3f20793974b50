//! Development server: static files, live reload over SSE and plugin hooks.

use crate::config::DevConfig;
use crate::dev::{DevEvent, PluginContainer, SharedState};
use crate::error::{CliError, ConfigError, Result};
use crate::ui;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::get,
    Router,
};
use hoshikuzu_plugin_devtools::resolve_host;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// SSE endpoint live-reload clients subscribe to.
pub const SSE_PATH: &str = "/__hoshikuzu_sse__";

/// Path of the injected live-reload client.
pub const CLIENT_PATH: &str = "/__hoshikuzu_client__.js";

/// How many ports past the requested one are tried when it is taken.
const PORT_ATTEMPTS: u16 = 10;

const RELOAD_CLIENT: &str = include_str!("../../assets/reload-client.js");

/// A bound development server, ready to serve.
pub struct DevServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: SharedState,
}

impl DevServer {
    /// Bind the listener for `config`.
    ///
    /// If the requested port is in use the next free one (up to +10) is used;
    /// port 0 lets the OS pick. Either way [`DevServer::local_addr`] reports
    /// the socket actually bound.
    ///
    /// # Errors
    ///
    /// Returns an error if no port could be bound.
    pub async fn bind(config: &DevConfig, state: SharedState) -> Result<Self> {
        let listener = bind_with_fallback(config.requested_addr()).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Browsable URL, with wildcard binds shown the way plugins report them.
    pub fn url(&self) -> String {
        format!("http://{}:{}", resolve_host(self.local_addr), self.local_addr.port())
    }

    /// Build the router with all routes.
    pub fn router(state: SharedState) -> Router {
        let static_files = ServeDir::new(state.root().clone());

        Router::new()
            .route(SSE_PATH, get(handle_sse))
            .route(CLIENT_PATH, get(handle_client_script))
            .route("/", get(handle_index))
            .fallback_service(static_files)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }

    /// Serve until the task is dropped.
    ///
    /// Listening hooks run on their own task so a slow plugin never holds up
    /// the first request.
    pub async fn run(self, plugins: Arc<PluginContainer>) -> Result<()> {
        let addr = self.local_addr;
        tokio::spawn(async move {
            plugins.listening(addr).await;
        });

        axum::serve(self.listener, Self::router(self.state))
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}

async fn bind_with_fallback(addr: SocketAddr) -> Result<TcpListener> {
    if addr.port() == 0 {
        return TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)));
    }

    for offset in 0..=PORT_ATTEMPTS {
        let Some(port) = addr.port().checked_add(offset) else {
            break;
        };
        let candidate = SocketAddr::new(addr.ip(), port);

        match TcpListener::bind(candidate).await {
            Ok(listener) => {
                if offset > 0 {
                    ui::warning(&format!(
                        "Port {} is busy, using port {} instead",
                        addr.port(),
                        port
                    ));
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => continue,
            Err(e) => {
                return Err(CliError::Server(format!(
                    "Failed to bind to {}: {}",
                    candidate, e
                )))
            }
        }
    }

    Err(ConfigError::InvalidValue {
        field: "port".to_string(),
        value: addr.port().to_string(),
        hint: format!(
            "Ports {}-{} are all in use. Try a different port.",
            addr.port(),
            addr.port().saturating_add(PORT_ATTEMPTS)
        ),
    }
    .into())
}

/// Handle SSE connections for reload events.
async fn handle_sse(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    tracing::debug!(client = id, "live reload client connected");

    let hello = serde_json::to_string(&DevEvent::Connected { id }).unwrap_or_default();
    let stream = tokio_stream::once(hello)
        .chain(ReceiverStream::new(rx))
        .map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn handle_client_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_CLIENT,
    )
}

/// Serve `index.html` from the root with the reload client injected.
async fn handle_index(State(state): State<SharedState>) -> Response {
    let path = state.root().join("index.html");
    match tokio::fs::read(&path).await {
        Ok(html) => (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            inject_client_script(&html),
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no index.html to serve");
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

/// Insert the reload client tag before `</body>`, or append it.
fn inject_client_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{}"></script>"#, CLIENT_PATH);

    match html.rfind("</body>") {
        Some(pos) => {
            let mut result = String::with_capacity(html.len() + script_tag.len() + 4);
            result.push_str(&html[..pos]);
            result.push_str("  ");
            result.push_str(&script_tag);
            result.push('\n');
            result.push_str(&html[pos..]);
            result.into_bytes()
        }
        None => {
            let mut result = html.into_owned();
            result.push('\n');
            result.push_str(&script_tag);
            result.into_bytes()
        }
    }
}
