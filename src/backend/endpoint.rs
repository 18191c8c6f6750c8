//! Backend connection descriptor.

use std::time::Duration;

use url::Url;

use crate::backend::{BackendError, StatusKey};
use crate::config::{BackendConfig, Scheme};

/// Where and how to reach the Patroni API. Immutable after startup.
#[derive(Debug, Clone)]
pub struct BackendEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Skip upstream certificate verification.
    pub insecure: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Pre-calculated base URL.
    base_url: Url,
}

impl BackendEndpoint {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&format!(
            "{}://{}:{}",
            config.scheme, config.host, config.port
        ))?;

        Ok(Self {
            scheme: config.scheme,
            host: config.host.clone(),
            port: config.port,
            insecure: config.insecure,
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the upstream route for a status.
    pub fn url_for(&self, key: StatusKey) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(key.as_str());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_each_key() {
        let config = BackendConfig {
            host: "db1.example.com".into(),
            port: 8008,
            scheme: Scheme::Https,
            ..BackendConfig::default()
        };
        let endpoint = BackendEndpoint::new(&config).unwrap();

        assert_eq!(
            endpoint.url_for(StatusKey::ReadWrite).as_str(),
            "https://db1.example.com:8008/read-write"
        );
        assert_eq!(
            endpoint.url_for(StatusKey::Primary).as_str(),
            "https://db1.example.com:8008/primary"
        );
    }

    #[test]
    fn test_defaults() {
        let endpoint = BackendEndpoint::new(&BackendConfig::default()).unwrap();
        assert_eq!(endpoint.host, "localhost");
        assert_eq!(endpoint.port, 80);
        assert_eq!(endpoint.timeout, Duration::from_secs(5));
        assert_eq!(
            endpoint.url_for(StatusKey::Replica).as_str(),
            "http://localhost/replica"
        );
    }

    #[test]
    fn test_invalid_host() {
        let config = BackendConfig {
            host: "bad host".into(),
            ..BackendConfig::default()
        };
        assert!(matches!(
            BackendEndpoint::new(&config),
            Err(BackendError::Endpoint(_))
        ));
    }
}
