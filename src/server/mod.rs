//! Static page server.
//!
//! Hosts the browser version of the exercise: `index.html` at `/`, every
//! other file under the root directory as-is, and a `/health` probe for
//! container platforms.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::FocusError;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `OK` while the process is serving.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

/// Where and what to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Listen address.
    pub bind: String,
    /// Listen port.
    pub port: u16,
    /// Directory with `index.html` and assets.
    pub root: PathBuf,
}

impl ServerOptions {
    /// Parsed socket address.
    ///
    /// # Errors
    ///
    /// Returns `FocusError::Server` if `bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, FocusError> {
        let ip = self
            .bind
            .parse()
            .map_err(|e| FocusError::Server(format!("Invalid bind address '{}': {e}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

type SharedRoot = Arc<PathBuf>;

/// Build the router for a root directory.
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .fallback(static_file)
        .with_state(Arc::new(root))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Focus Dot App is running".to_string(),
    })
}

async fn index(State(root): State<SharedRoot>) -> Response {
    send_file(&root.join("index.html")).await
}

async fn static_file(State(root): State<SharedRoot>, uri: Uri) -> Response {
    match resolve_static_path(&root, uri.path()) {
        Some(path) => send_file(&path).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn send_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(path))], bytes).into_response(),
        Err(e) => {
            log::debug!("Not serving {}: {e}", path.display());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Map a request path onto a file under `root`.
///
/// Returns `None` for anything that could escape the root.
#[must_use]
pub fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return Some(root.join("index.html"));
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Content type by file extension.
#[must_use]
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns `FocusError::Server` if binding or serving fails.
pub async fn serve(options: ServerOptions) -> Result<(), FocusError> {
    let addr = options.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| FocusError::Server(format!("Failed to bind {addr}: {e}")))?;

    log::info!(
        "Focus Dot App is running on port {} (root {})",
        options.port,
        options.root.display()
    );

    axum::serve(listener, router(options.root))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Failed to listen for Ctrl-C: {e}");
            }
        })
        .await
        .map_err(|e| FocusError::Server(format!("Server error: {e}")))
}

/// Run [`serve`] on a fresh multi-threaded runtime.
///
/// # Errors
///
/// Returns `FocusError::Server` if the runtime cannot start or serving fails.
pub fn run_blocking(options: ServerOptions) -> Result<(), FocusError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| FocusError::Server(format!("Failed to start runtime: {e}")))?;
    runtime.block_on(serve(options))
}
