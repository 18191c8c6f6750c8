//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listening side exposed to load balancers and probes.
    pub frontend: FrontendConfig,

    /// Patroni REST API being polled.
    pub backend: BackendConfig,

    /// Status cache settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Frontend listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Path to certificate file (PEM). TLS is enabled when both files are set.
    pub certfile: Option<String>,

    /// Path to private key file (PEM).
    pub keyfile: Option<String>,

    /// Minimum TLS protocol version (e.g. "TLSv1.2").
    pub tls_min_version: Option<String>,

    /// Allowed TLS cipher suites, empty means the library defaults.
    pub tls_ciphers: Vec<String>,

    /// Access log template (`%a` remote address, `%m` method, `%U` URI).
    pub logformat: String,
}

impl FrontendConfig {
    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Certificate and key paths when TLS is configured.
    pub fn tls_files(&self) -> Option<(&str, &str)> {
        match (self.certfile.as_deref(), self.keyfile.as_deref()) {
            (Some(cert), Some(key)) if !cert.is_empty() && !key.is_empty() => Some((cert, key)),
            _ => None,
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            certfile: None,
            keyfile: None,
            tls_min_version: None,
            tls_ciphers: Vec::new(),
            logformat: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

/// Default access log template.
pub const DEFAULT_LOG_FORMAT: &str = "%a - %m %U";

/// Upstream URL scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patroni backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Patroni API host.
    pub host: String,

    /// Patroni API port.
    pub port: u16,

    /// Scheme used to reach the API.
    pub scheme: Scheme,

    /// Skip certificate verification on the upstream connection.
    pub insecure: bool,

    /// Total request timeout in seconds.
    pub timeout: f64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout: f64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        seconds(self.connect_timeout)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 80,
            scheme: Scheme::Http,
            insecure: false,
            timeout: 5.0,
            connect_timeout: 2.0,
        }
    }
}

/// Sweep interval used when none is configured.
pub const DEFAULT_CACHE_INTERVAL_SECS: f64 = 0.25;

/// Shortest sweep period the evictor will run with.
pub const MIN_CACHE_INTERVAL: Duration = Duration::from_millis(1);

/// Status cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live of cached statuses in seconds. Zero or less disables caching.
    pub ttl: f64,

    /// Seconds between two eviction sweeps. Zero selects the default, values
    /// below one millisecond are raised to it.
    pub interval: f64,
}

impl CacheConfig {
    pub fn enabled(&self) -> bool {
        self.ttl > 0.0
    }

    /// TTL as a duration, zero when caching is disabled.
    pub fn ttl(&self) -> Duration {
        if self.enabled() {
            seconds(self.ttl)
        } else {
            Duration::ZERO
        }
    }

    pub fn interval(&self) -> Duration {
        if self.interval > 0.0 {
            seconds(self.interval).max(MIN_CACHE_INTERVAL)
        } else {
            seconds(DEFAULT_CACHE_INTERVAL_SECS)
        }
    }
}

/// Fractional seconds to a duration. Out-of-range values saturate; validation
/// rejects them before they reach a running service.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(if value > 0.0 { Duration::MAX } else { Duration::ZERO })
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: 0.0,
            interval: DEFAULT_CACHE_INTERVAL_SECS,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9187".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_disabled_by_default() {
        let config = CacheConfig::default();
        assert!(!config.enabled());
        assert_eq!(config.ttl(), Duration::ZERO);
        assert_eq!(config.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_interval_falls_back_to_default() {
        let config = CacheConfig { ttl: 1.5, interval: 0.0 };
        assert!(config.enabled());
        assert_eq!(config.ttl(), Duration::from_millis(1500));
        assert_eq!(config.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_tiny_interval_is_raised_to_minimum() {
        let config = CacheConfig { ttl: 0.05, interval: 1e-10 };
        assert_eq!(config.interval(), MIN_CACHE_INTERVAL);

        let config = CacheConfig { ttl: 0.05, interval: 0.0005 };
        assert_eq!(config.interval(), MIN_CACHE_INTERVAL);

        let config = CacheConfig { ttl: 0.05, interval: 0.002 };
        assert_eq!(config.interval(), Duration::from_millis(2));
    }

    #[test]
    fn test_tls_files_require_both_paths() {
        let mut frontend = FrontendConfig::default();
        assert!(frontend.tls_files().is_none());

        frontend.certfile = Some("cert.pem".into());
        assert!(frontend.tls_files().is_none());

        frontend.keyfile = Some("key.pem".into());
        assert_eq!(frontend.tls_files(), Some(("cert.pem", "key.pem")));
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("backend:\n  port: 8008\n").unwrap();
        assert_eq!(config.backend.port, 8008);
        assert_eq!(config.backend.host, "localhost");
        assert_eq!(config.backend.scheme, Scheme::Http);
        assert_eq!(config.frontend.logformat, DEFAULT_LOG_FORMAT);
    }
}
