//! Static preview server.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

/// Page `/` redirects to when the directory has no `index.html`.
pub const REPORT_PAGE: &str = "report.html";

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewServerConfig {
    /// Directory to serve
    pub directory: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for PreviewServerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("build"),
            port: 8080,
            host: "127.0.0.1".to_string(),
            open: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Directory not found: {0}. Run 'scriptura build' first.")]
    DirectoryNotFound(String),

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Router serving `directory` as static files.
///
/// Directory requests resolve to their `index.html`. Without one at the top
/// level, `/` redirects to the assembled report.
pub fn router(directory: impl Into<PathBuf>) -> Router {
    let directory = directory.into();
    let redirect_root = !directory.join("index.html").is_file();
    let service = ServeDir::new(directory).append_index_html_on_directories(true);

    let router = Router::new();
    let router = if redirect_root {
        router.route(
            "/",
            get(|| async { Redirect::temporary(&format!("/{}", REPORT_PAGE)) }),
        )
    } else {
        router
    };
    router.fallback_service(service)
}

/// Preview server.
pub struct PreviewServer {
    config: PreviewServerConfig,
}

impl PreviewServer {
    /// Create a new preview server.
    pub fn new(config: PreviewServerConfig) -> Self {
        Self { config }
    }

    /// Address the server binds to.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        if !self.config.directory.is_dir() {
            return Err(ServerError::DirectoryNotFound(
                self.config.directory.display().to_string(),
            ));
        }

        let addr = self.addr()?;
        let app = router(&self.config.directory);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = if self.config.directory.join("index.html").is_file() {
            format!("http://{}/", addr)
        } else {
            format!("http://{}/{}", addr, REPORT_PAGE)
        };
        tracing::info!("Serving {} at {}", self.config.directory.display(), url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Server stopped.");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
