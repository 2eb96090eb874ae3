//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use easel_site::Builder;

use crate::watcher::RebuildWatcher;

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory tree watched for changes.
    pub watch_root: PathBuf,

    /// Host to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Open the served site in a browser on start.
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            watch_root: PathBuf::from("."),
            host: "0.0.0.0".to_string(),
            port: 8000,
            open: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid listen address {0}: {1}")]
    Address(String, String),

    #[error("failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("server error: {0}")]
    Serve(String),

    #[error("file watch error: {0}")]
    Watch(String),

    #[error(transparent)]
    Build(#[from] easel_site::BuildError),
}

/// Development server: serves the build output and rebuilds on change.
pub struct DevServer {
    config: DevServerConfig,
    builder: Arc<Builder>,
}

impl DevServer {
    pub fn new(config: DevServerConfig, builder: Builder) -> Self {
        Self {
            config,
            builder: Arc::new(builder),
        }
    }

    /// Run until interrupted.
    ///
    /// Builds once if the output directory is missing, then serves it while
    /// a background watcher rebuilds on qualifying changes. A failed
    /// rebuild is logged and the previous output stays served. On ctrl-c
    /// the server drains and the watcher is stopped and joined.
    pub async fn run(self) -> Result<(), ServerError> {
        let output_dir = self.builder.config().output_dir.clone();

        if !output_dir.exists() {
            tracing::info!("output directory missing, building it first");
            self.builder.build()?;
        }

        let builder = Arc::clone(&self.builder);
        let watcher = RebuildWatcher::spawn(&self.config.watch_root, move |path| {
            tracing::info!("{} changed, rebuilding", path.display());
            match builder.build() {
                Ok(report) => tracing::info!("rebuilt in {}ms", report.duration_ms),
                Err(e) => tracing::error!("rebuild failed: {e}"),
            }
        })
        .map_err(|e| ServerError::Watch(e.to_string()))?;

        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::Address(raw_addr, e.to_string()))?;

        // Serve the output tree as-is; no extra routes, no request logging.
        let app = Router::new().fallback_service(ServeDir::new(&output_dir));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        let url = format!("http://localhost:{}", self.config.port);
        tracing::info!("serving {} at {}", output_dir.display(), url);
        tracing::info!("press ctrl-c to stop");

        if self.config.open {
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("shutting down");
        watcher.stop();

        Ok(())
    }
}

async fn shutdown_signal() {
    // If the signal handler cannot be installed the server just runs until
    // the process is killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
