//! Shared Cache Handle
//!
//! Thread-safe front for [`CacheStore`] that owns the background purge task.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::info;

use crate::cache::{CacheEntry, CacheStats, CacheStore, Measure, SetOutcome};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_purge_task, PurgeTask};

// == Cache ==
/// A cache whose operations each hold one lock for their whole duration,
/// eviction loop included. Share it across threads with `Arc<Cache<V>>`.
///
/// Dropping the cache stops its purge task.
#[derive(Debug)]
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    purge: Option<PurgeTask>,
    config: CacheConfig,
}

impl<V> Cache<V>
where
    V: Measure + PartialEq + Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and, if `purge_interval > 0`, starts the purge
    /// task right away.
    ///
    /// # Errors
    /// `NoRuntime` if a purge interval is set but no tokio runtime is running.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let store = Arc::new(Mutex::new(CacheStore::from_config(&config)));

        let purge = if config.purge_interval > 0 {
            Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
            Some(spawn_purge_task(Arc::downgrade(&store), config.purge_interval))
        } else {
            None
        };

        Ok(Self {
            store,
            purge,
            config,
        })
    }

    /// Returns a copy of the entry, refreshing its deadline unless `silent`.
    pub fn get(&self, key: &str, silent: bool) -> Option<CacheEntry<V>> {
        self.store.lock().get(key, silent).cloned()
    }

    /// Returns a copy of the stored value, refreshing its deadline.
    pub fn get_value(&self, key: &str) -> Option<V> {
        self.store.lock().get(key, false).map(|entry| entry.value.clone())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.store.lock().has_key(key)
    }

    /// Stores a value; false if it was rejected.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<u64>) -> bool {
        self.store.lock().set(key, value, ttl)
    }

    pub fn try_set(&self, key: impl Into<String>, value: V, ttl: Option<u64>) -> Result<SetOutcome> {
        self.store.lock().try_set(key, value, ttl)
    }

    pub fn remove(&self, key: &str) -> Option<CacheEntry<V>> {
        self.store.lock().remove(key)
    }

    pub fn items(&self) -> usize {
        self.store.lock().items()
    }

    pub fn reset(&self) {
        self.store.lock().reset();
    }

    /// Runs a purge pass immediately, independent of the background task.
    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    pub fn total_size(&self) -> usize {
        self.store.lock().total_size()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether a purge task is attached and still running.
    pub fn is_purging(&self) -> bool {
        self.purge.as_ref().is_some_and(|task| !task.is_finished())
    }

    // == Shutdown ==
    /// Stops the purge task and waits for it to exit. The cache stays usable.
    pub async fn shutdown(&mut self) {
        if let Some(task) = self.purge.take() {
            task.stop().await;
            info!("Cache purge task shut down");
        }
    }
}
