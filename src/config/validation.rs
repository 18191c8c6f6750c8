//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, finite durations)
//! - Reject TLS settings the listener cannot honor
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::net::tls;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("frontend.{present} is set without frontend.{missing}")]
    IncompleteTls {
        present: &'static str,
        missing: &'static str,
    },

    #[error("frontend TLS settings are invalid: {0}")]
    Tls(String),

    #[error("backend.host must not be empty")]
    EmptyBackendHost,

    #[error("backend.port must not be 0")]
    BackendPort,

    #[error("{field} must be a positive number of seconds, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("cache.interval must not be negative, got {0}")]
    NegativeInterval(f64),

    #[error("observability.metrics_address is not a socket address: {0}")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let frontend = &config.frontend;
    match (frontend.certfile.as_deref(), frontend.keyfile.as_deref()) {
        (Some(_), None) => errors.push(ValidationError::IncompleteTls {
            present: "certfile",
            missing: "keyfile",
        }),
        (None, Some(_)) => errors.push(ValidationError::IncompleteTls {
            present: "keyfile",
            missing: "certfile",
        }),
        _ => {}
    }
    if let Some(version) = frontend.tls_min_version.as_deref() {
        if let Err(e) = tls::parse_min_version(version) {
            errors.push(ValidationError::Tls(e.to_string()));
        }
    }
    if let Err(e) = tls::parse_cipher_suites(&frontend.tls_ciphers) {
        errors.push(ValidationError::Tls(e.to_string()));
    }

    let backend = &config.backend;
    if backend.host.trim().is_empty() {
        errors.push(ValidationError::EmptyBackendHost);
    }
    if backend.port == 0 {
        errors.push(ValidationError::BackendPort);
    }
    check_positive(&mut errors, "backend.timeout", backend.timeout);
    check_positive(&mut errors, "backend.connect_timeout", backend.connect_timeout);

    let cache = &config.cache;
    if !cache.ttl.is_finite() {
        errors.push(ValidationError::NotFinite {
            field: "cache.ttl",
            value: cache.ttl,
        });
    }
    if !cache.interval.is_finite() {
        errors.push(ValidationError::NotFinite {
            field: "cache.interval",
            value: cache.interval,
        });
    } else if cache.interval < 0.0 {
        errors.push(ValidationError::NegativeInterval(cache.interval));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: f64) {
    if !value.is_finite() {
        errors.push(ValidationError::NotFinite { field, value });
    } else if value <= 0.0 {
        errors.push(ValidationError::NonPositive { field, value });
    }
}
