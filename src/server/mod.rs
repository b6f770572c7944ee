//! Read-only publishing server
//!
//! Serves the crawl artifact verbatim and a static viewer page. It never
//! touches crawl state; it only reads the two files from disk on each
//! request, so a crawl running in another process can replace the artifact
//! at any time.

use crate::config::Config;
use crate::CrawlError;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Route the artifact is published under
pub const ARTIFACT_ROUTE: &str = "/pageLinkMapping.json";

#[derive(Debug, Clone)]
struct ServerState {
    artifact_path: Arc<PathBuf>,
    viewer_path: Arc<PathBuf>,
}

/// Builds the router with the viewer at `/` and the artifact at [`ARTIFACT_ROUTE`]
pub fn router(artifact_path: &Path, viewer_path: &Path) -> Router {
    let state = ServerState {
        artifact_path: Arc::new(artifact_path.to_path_buf()),
        viewer_path: Arc::new(viewer_path.to_path_buf()),
    };

    Router::new()
        .route("/", get(viewer_handler))
        .route(ARTIFACT_ROUTE, get(artifact_handler))
        .with_state(state)
}

/// Binds the configured address and serves until the process exits
pub async fn serve(config: &Config) -> Result<(), CrawlError> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| {
            CrawlError::Server(format!(
                "invalid bind address {}: {}",
                config.server.bind, e
            ))
        })?;

    let listener = TcpListener::bind(addr).await?;
    let app = router(
        Path::new(&config.output.artifact_path),
        Path::new(&config.server.viewer_path),
    );

    tracing::info!("Server running at http://{}/", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .map_err(|e| CrawlError::Server(e.to_string()))
}

async fn viewer_handler(State(state): State<ServerState>) -> Response {
    send_file(&state.viewer_path, "text/html; charset=utf-8").await
}

async fn artifact_handler(State(state): State<ServerState>) -> Response {
    send_file(&state.artifact_path, "application/json").await
}

/// Streams a file back verbatim, or maps the read error to a status code
async fn send_file(path: &Path, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} not found", path.display());
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
