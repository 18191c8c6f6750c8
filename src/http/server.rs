//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, access log, content type)
//! - Serve over plain TCP or TLS
//! - Drain in-flight probes on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::backend::HttpBackend;
use crate::config::FrontendConfig;
use crate::http::handlers::{self, Dispatcher};
use crate::http::request::{access_log, X_REQUEST_ID};

/// How long in-flight TLS connections may take to finish after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP server exposing the probe endpoints.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server resolving statuses through `backend`.
    pub fn new(frontend: &FrontendConfig, backend: Arc<HttpBackend>) -> Self {
        let state = AppState {
            dispatcher: Dispatcher::new(backend),
        };
        let router = Self::build_router(frontend, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(frontend: &FrontendConfig, state: AppState) -> Router {
        let log_format: Arc<str> = Arc::from(frontend.logformat.as_str());

        Router::new()
            .route("/health", get(handlers::health))
            .route("/master", get(handlers::primary).options(handlers::primary))
            .route("/primary", get(handlers::primary).options(handlers::primary))
            .route("/read-write", get(handlers::read_write).options(handlers::read_write))
            .route("/replica", get(handlers::replica).options(handlers::replica))
            .route("/read-only", get(handlers::read_only).options(handlers::read_only))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(middleware::from_fn_with_state(log_format, access_log))
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on a plain TCP listener until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server listening");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until shutdown is signalled.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server listening");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTPS server draining");
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
