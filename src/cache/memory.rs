//! In-memory status cache with background expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::cache::{CacheError, StatusCache};
use crate::config::CacheConfig;
use crate::observability::metrics;

/// A cached status and the time it was written.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: bool,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

/// Process-wide status cache.
///
/// Entries are not checked for age on read: the evictor sweeps them out
/// every `interval`, so a reader can see a value up to `ttl + interval` old.
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    enabled: bool,
    ttl: Duration,
    interval: Duration,
}

impl MemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled: config.enabled(),
            ttl: config.ttl(),
            interval: config.interval(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)
    }

    /// Remove every entry older than the ttl. Returns how many were removed.
    pub fn evict_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|key, entry| {
            let expired = entry.is_expired(self.ttl);
            if expired {
                tracing::debug!(key = %key, "Deleting key from cache");
            }
            !expired
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            metrics::record_cache_evictions(evicted);
        }
        Ok(evicted)
    }

    /// Sweep expired entries every `interval` until shutdown.
    ///
    /// Returns immediately when the cache is disabled.
    pub async fn run_evictor(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::debug!("Cache disabled, expire loop not started");
            return;
        }

        tracing::debug!(
            ttl = ?self.ttl,
            interval = ?self.interval,
            "Cache expire loop starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.evict_expired() {
                        tracing::error!(error = %e, "Cache sweep failed, stopping expire loop");
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Cache expire loop received shutdown signal");
                    break;
                }
            }
        }

        tracing::debug!("Cache expire loop ended");
    }

    /// Spawn the evictor on the current runtime.
    pub fn spawn_evictor(self: &Arc<Self>, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run_evictor(shutdown))
    }
}

impl StatusCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<bool>, CacheError> {
        if !self.enabled {
            return Ok(None);
        }
        let value = self.lock()?.get(key).map(|entry| entry.value);
        match value {
            Some(_) => tracing::debug!(key = %key, "Value found in cache"),
            None => tracing::debug!(key = %key, "Value not found in cache"),
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: bool) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        tracing::debug!(key = %key, value, "Setting value in cache");
        self.lock()?.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }
}
