//! Session-scoped memoization of the two resolved lists
//!
//! Values are stored as comma-joined strings so they survive in a tab's
//! `sessionStorage` across page loads.

pub mod memory;
pub mod tab;

pub use memory::MemoryStore;
pub use tab::TabSessionStorage;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// String key/value store with the lifetime of one browsing session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Memoizes expensive list computations for the session
///
/// A non-empty stored value is returned without computing. An empty stored value is a
/// miss, so an empty result is recomputed on the next page load; within one
/// `SessionCache` it is still computed only once. Concurrent misses on the same key are
/// collapsed into a single computation.
pub struct SessionCache {
    store: Arc<dyn SessionStore>,
    memo: Mutex<HashMap<String, Vec<String>>>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store, memo: Mutex::new(HashMap::new()), in_flight: Mutex::new(HashMap::new()) }
    }

    fn memoized(&self, key: &str) -> Option<Vec<String>> {
        self.memo.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn remember(&self, key: &str, ids: &[String]) {
        self.memo.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), ids.to_vec());
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner()).entry(key.to_string()).or_default().clone()
    }

    /// Return the cached list under `key`, or run `compute` and cache its result
    ///
    /// A failed computation caches nothing and returns the error. A failed store write is
    /// logged; the computed list is still returned.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<Vec<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        if let Some(ids) = self.memoized(key) {
            return Ok(ids);
        }

        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        // Another caller may have finished while this one waited
        if let Some(ids) = self.memoized(key) {
            return Ok(ids);
        }

        match self.store.get(key).await {
            Ok(Some(raw)) if !raw.is_empty() => {
                let ids: Vec<String> = raw.split(',').map(str::to_string).collect();
                log::debug!("Session cache hit for {} ({} entries)", key, ids.len());
                self.remember(key, &ids);
                return Ok(ids);
            }
            Ok(_) => {}
            Err(e) => log::warn!("Could not read {} from session storage: {}", key, e),
        }

        log::debug!("Session cache miss for {}", key);
        let ids = compute().await?;

        if let Err(e) = self.store.set(key, &ids.join(",")).await {
            log::warn!("Could not write {} to session storage: {}", key, e);
        }
        self.remember(key, &ids);

        Ok(ids)
    }
}
