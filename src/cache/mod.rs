//! Status cache subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver lookup:
//!     get(key) → Some(bool) → served without touching the backend
//!              → None       → backend probe → set(key, bool)
//!
//! Evictor (memory.rs):
//!     Periodic timer
//!     → sweep all entries
//!     → drop entries older than ttl
//! ```
//!
//! # Design Decisions
//! - One mutex guards the whole map; the evictor takes the same lock
//! - A ttl of zero or less disables the cache: lookups miss, stores are no-ops
//! - Concurrent misses on one key are not coalesced; last writer wins
//! - Readers may see values up to `ttl + interval` old

pub mod memory;

pub use memory::MemoryCache;

/// Error type for cache operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// A thread panicked while holding the cache lock.
    #[error("cache lock poisoned")]
    Poisoned,

    /// The store could not accept the entry.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for resolved statuses, shared by all request handlers.
pub trait StatusCache: Send + Sync {
    /// Look up a cached status.
    fn get(&self, key: &str) -> Result<Option<bool>, CacheError>;

    /// Store a status, resetting its age.
    fn set(&self, key: &str, value: bool) -> Result<(), CacheError>;
}
