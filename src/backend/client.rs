//! Cache-backed status resolution against the Patroni REST API.

use std::sync::Arc;

use reqwest::StatusCode;

use crate::backend::{BackendEndpoint, BackendError, StatusKey};
use crate::cache::StatusCache;
use crate::config::BackendConfig;
use crate::observability::metrics;

const USER_AGENT: &str = concat!("patroniglue/", env!("CARGO_PKG_VERSION"));

/// Resolves statuses from the cache, falling back to the backend on a miss.
///
/// Cheap to share behind an `Arc`; the inner client pools connections.
pub struct HttpBackend {
    endpoint: BackendEndpoint,
    client: reqwest::Client,
    cache: Arc<dyn StatusCache>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig, cache: Arc<dyn StatusCache>) -> Result<Self, BackendError> {
        let endpoint = BackendEndpoint::new(config)?;

        if endpoint.insecure {
            tracing::warn!(
                backend = %endpoint.base_url(),
                "Upstream certificate verification disabled"
            );
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(endpoint.insecure)
            .timeout(endpoint.timeout)
            .connect_timeout(endpoint.connect_timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            endpoint,
            client,
            cache,
        })
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    /// Resolve a status, serving from cache when possible.
    ///
    /// On a miss exactly one upstream request is made: 200 means `true`,
    /// any other status `false`. The answer is cached before it is returned;
    /// if the cache refuses it the call fails.
    pub async fn resolve(&self, key: StatusKey) -> Result<bool, BackendError> {
        let cached = self.cache.get(key.as_str()).map_err(|source| {
            tracing::warn!(key = %key, error = %source, "Could not get key from cache");
            BackendError::CacheRead { key, source }
        })?;

        metrics::record_cache_lookup(key.as_str(), cached.is_some());
        if let Some(state) = cached {
            return Ok(state);
        }

        let url = self.endpoint.url_for(key);
        tracing::debug!(url = %url, "GET");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not request remote backend");
                metrics::record_upstream_request(key.as_str(), "error");
                return Err(BackendError::Transport(e));
            }
        };

        let state = response.status() == StatusCode::OK;
        tracing::debug!(key = %key, status = %response.status(), state, "Backend answered");
        metrics::record_upstream_request(key.as_str(), if state { "true" } else { "false" });

        self.cache.set(key.as_str(), state).map_err(|source| {
            tracing::warn!(key = %key, error = %source, "Could not save key to cache");
            BackendError::CacheWrite { key, source }
        })?;

        Ok(state)
    }

    /// Calls the `/primary` route.
    pub async fn is_primary(&self) -> Result<bool, BackendError> {
        self.resolve(StatusKey::Primary).await
    }

    /// Calls the `/read-write` route.
    pub async fn is_read_write(&self) -> Result<bool, BackendError> {
        self.resolve(StatusKey::ReadWrite).await
    }

    /// Calls the `/replica` route.
    pub async fn is_replica(&self) -> Result<bool, BackendError> {
        self.resolve(StatusKey::Replica).await
    }

    /// Calls the `/read-only` route.
    pub async fn is_read_only(&self) -> Result<bool, BackendError> {
        self.resolve(StatusKey::ReadOnly).await
    }
}
