//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::crypto::ring::{cipher_suite, default_provider};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{SupportedCipherSuite, SupportedProtocolVersion};

use crate::config::FrontendConfig;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("unknown TLS version: {0}")]
    UnknownVersion(String),

    #[error("TLS version {0} is no longer supported")]
    UnsupportedVersion(String),

    #[error("unknown cipher detected: {0}")]
    UnknownCipher(String),

    #[error("cipher {0} is not supported by the TLS library")]
    UnsupportedCipher(String),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificate found in {0}")]
    NoCertificate(String),

    #[error("no private key found in {0}")]
    NoPrivateKey(String),

    #[error("invalid TLS configuration: {0}")]
    Rustls(#[from] rustls::Error),
}

static TLS12_AND_LATER: &[&SupportedProtocolVersion] =
    &[&rustls::version::TLS13, &rustls::version::TLS12];

static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// Map a minimum version name to the protocol versions to enable.
pub fn parse_min_version(
    name: &str,
) -> Result<&'static [&'static SupportedProtocolVersion], TlsError> {
    match name {
        "TLSv1.2" => Ok(TLS12_AND_LATER),
        "TLSv1.3" => Ok(TLS13_ONLY),
        "SSLv3.0" | "TLSv1.0" | "TLSv1.1" => Err(TlsError::UnsupportedVersion(name.to_string())),
        _ => Err(TlsError::UnknownVersion(name.to_string())),
    }
}

/// Convert cipher suite names to rustls suites, preserving order.
///
/// Names use the IANA spelling. TLS 1.3 suites are also accepted without
/// the `TLS13_` prefix, ECDHE/CHACHA20 suites with or without the `_SHA256`
/// suffix.
pub fn parse_cipher_suites(names: &[String]) -> Result<Vec<SupportedCipherSuite>, TlsError> {
    names.iter().map(|name| parse_cipher_suite(name)).collect()
}

fn parse_cipher_suite(name: &str) -> Result<SupportedCipherSuite, TlsError> {
    let suite = match name {
        "TLS_AES_128_GCM_SHA256" | "TLS13_AES_128_GCM_SHA256" => cipher_suite::TLS13_AES_128_GCM_SHA256,
        "TLS_AES_256_GCM_SHA384" | "TLS13_AES_256_GCM_SHA384" => cipher_suite::TLS13_AES_256_GCM_SHA384,
        "TLS_CHACHA20_POLY1305_SHA256" | "TLS13_CHACHA20_POLY1305_SHA256" => {
            cipher_suite::TLS13_CHACHA20_POLY1305_SHA256
        }
        "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256" => cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
        "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384" => cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
        "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305" | "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256" => {
            cipher_suite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256
        }
        "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256" => cipher_suite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384" => cipher_suite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305" | "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256" => {
            cipher_suite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256
        }
        "TLS_RSA_WITH_RC4_128_SHA"
        | "TLS_RSA_WITH_3DES_EDE_CBC_SHA"
        | "TLS_RSA_WITH_AES_128_CBC_SHA"
        | "TLS_RSA_WITH_AES_256_CBC_SHA"
        | "TLS_RSA_WITH_AES_128_CBC_SHA256"
        | "TLS_RSA_WITH_AES_128_GCM_SHA256"
        | "TLS_RSA_WITH_AES_256_GCM_SHA384"
        | "TLS_ECDHE_ECDSA_WITH_RC4_128_SHA"
        | "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA"
        | "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA"
        | "TLS_ECDHE_RSA_WITH_RC4_128_SHA"
        | "TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA"
        | "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA"
        | "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA"
        | "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256"
        | "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256"
        | "TLS_FALLBACK_SCSV" => return Err(TlsError::UnsupportedCipher(name.to_string())),
        _ => return Err(TlsError::UnknownCipher(name.to_string())),
    };
    Ok(suite)
}

/// Build the rustls server configuration for the frontend listener.
pub fn server_config(
    frontend: &FrontendConfig,
    cert_path: &Path,
    key_path: &Path,
) -> Result<rustls::ServerConfig, TlsError> {
    let versions = match frontend.tls_min_version.as_deref() {
        Some(name) => parse_min_version(name)?,
        None => rustls::DEFAULT_VERSIONS,
    };

    let mut provider = default_provider();
    if !frontend.tls_ciphers.is_empty() {
        provider = CryptoProvider {
            cipher_suites: parse_cipher_suites(&frontend.tls_ciphers)?,
            ..provider
        };
    }

    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let mut config = rustls::ServerConfig::builder_with_provider(Arc::new(provider))
        .with_protocol_versions(versions)?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(config)
}

/// Load TLS configuration for axum-server from the frontend settings.
pub fn load_tls_config(
    frontend: &FrontendConfig,
    cert_path: &Path,
    key_path: &Path,
) -> Result<RustlsConfig, TlsError> {
    let config = server_config(frontend, cert_path, key_path)?;
    tracing::info!(
        cert = %cert_path.display(),
        min_version = frontend.tls_min_version.as_deref().unwrap_or("default"),
        ciphers = frontend.tls_ciphers.len(),
        "TLS configuration loaded"
    );
    Ok(RustlsConfig::from_config(Arc::new(config)))
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path).map(BufReader::new).map_err(|source| TlsError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: path.display().to_string(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificate(path.display().to_string()));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| TlsError::Read {
            path: path.display().to_string(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(path.display().to_string()))
}
