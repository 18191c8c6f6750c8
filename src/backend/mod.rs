//! Patroni backend subsystem.
//!
//! # Data Flow
//! ```text
//! Status request (e.g. StatusKey::Replica)
//!     → client.rs: cache lookup
//!         hit  → cached bool
//!         miss → GET {scheme}://{host}:{port}/replica
//!              → 200 = true, anything else = false
//!              → cache store → bool
//! ```
//!
//! # Design Decisions
//! - At most one upstream request per resolution, never retried
//! - Only transport failures are errors; any HTTP status is an answer
//! - A failed cache write fails the resolution

pub mod client;
pub mod endpoint;

use std::fmt;
use std::str::FromStr;

use crate::cache::CacheError;

pub use client::HttpBackend;
pub use endpoint::BackendEndpoint;

/// The health facets exposed by the Patroni REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Primary,
    ReadWrite,
    Replica,
    ReadOnly,
}

impl StatusKey {
    pub const ALL: [StatusKey; 4] = [
        StatusKey::Primary,
        StatusKey::ReadWrite,
        StatusKey::Replica,
        StatusKey::ReadOnly,
    ];

    /// Name used both as the upstream path and as the cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Primary => "primary",
            StatusKey::ReadWrite => "read-write",
            StatusKey::Replica => "replica",
            StatusKey::ReadOnly => "read-only",
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKey {
    type Err = UnknownStatusKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" | "master" => Ok(StatusKey::Primary),
            "read-write" => Ok(StatusKey::ReadWrite),
            "replica" => Ok(StatusKey::Replica),
            "read-only" => Ok(StatusKey::ReadOnly),
            other => Err(UnknownStatusKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status key: {0}")]
pub struct UnknownStatusKey(pub String);

/// Error type for status resolution.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not get key {key} from cache: {source}")]
    CacheRead {
        key: StatusKey,
        #[source]
        source: CacheError,
    },

    #[error("could not request remote backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not save {key} key to cache: {source}")]
    CacheWrite {
        key: StatusKey,
        #[source]
        source: CacheError,
    },

    #[error("invalid backend endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
