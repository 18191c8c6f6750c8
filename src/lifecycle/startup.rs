//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start the cache evictor
//! - Bind the listener and serve until shutdown

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::backend::{BackendError, HttpBackend};
use crate::cache::{MemoryCache, StatusCache};
use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::tls::{self, TlsError};

/// Error type for startup failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not create backend: {0}")]
    Backend(#[from] BackendError),

    #[error("could not configure TLS: {0}")]
    Tls(#[from] TlsError),

    #[error("could not start frontend: {0}")]
    Io(#[from] std::io::Error),

    #[error("bind address {0} did not resolve")]
    BindAddress(String),
}

/// Run the service until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let cache = Arc::new(MemoryCache::new(&config.cache));
    tracing::info!(
        enabled = cache.is_enabled(),
        ttl = ?cache.ttl(),
        interval = ?cache.interval(),
        "Status cache created"
    );
    let evictor = cache.spawn_evictor(shutdown.subscribe());

    let status_cache: Arc<dyn StatusCache> = cache;
    let backend = Arc::new(HttpBackend::new(&config.backend, status_cache)?);
    tracing::info!(backend = %backend.endpoint().base_url(), "Backend configured");

    let server = HttpServer::new(&config.frontend, backend);
    let bind_address = config.frontend.bind_address();

    let served = match config.frontend.tls_files() {
        Some((cert, key)) => {
            let tls_config = tls::load_tls_config(&config.frontend, Path::new(cert), Path::new(key))?;
            let addr = tokio::net::lookup_host(&bind_address)
                .await?
                .next()
                .ok_or_else(|| StartupError::BindAddress(bind_address.clone()))?;
            server.run_tls(addr, tls_config, shutdown.subscribe()).await
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, shutdown.subscribe()).await
        }
    };

    // The server may have stopped on its own; make sure the evictor follows.
    shutdown.trigger();
    let _ = evictor.await;

    served.map_err(StartupError::from)
}
