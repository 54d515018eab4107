//! Request execution with loading/error tracking and a TTL cache.

use color_eyre::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::cache::ResponseCache;

/// Shown when a failure carries no message of its own
const FALLBACK_ERROR: &str = "An error occurred";

/// Observable state of a [`RequestExecutor`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
  pub loading: bool,
  pub error: Option<String>,
}

/// Runs async producers, caching their results by key.
///
/// Cloning is cheap; clones share state and cache. Concurrent calls with the
/// same key are not coalesced: each runs its producer and the last one to
/// finish owns the cache entry.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
  state: Arc<Mutex<RequestState>>,
  cache: Arc<ResponseCache>,
  default_ttl: Duration,
}

impl RequestExecutor {
  pub fn new(default_ttl: Duration) -> Self {
    Self {
      state: Arc::default(),
      cache: Arc::new(ResponseCache::new()),
      default_ttl,
    }
  }

  fn lock(&self) -> MutexGuard<'_, RequestState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Run `producer`, or serve a fresh cached result for `cache_key`.
  pub async fn execute<T, F, Fut>(&self, producer: F, cache_key: Option<&str>) -> Result<T>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    self
      .execute_with_ttl(producer, cache_key, self.default_ttl)
      .await
  }

  /// Like [`execute`](Self::execute) with an explicit freshness window.
  ///
  /// A cache hit completes on first poll and never touches `loading`.
  pub async fn execute_with_ttl<T, F, Fut>(
    &self,
    producer: F,
    cache_key: Option<&str>,
    ttl: Duration,
  ) -> Result<T>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    if let Some(key) = cache_key {
      if let Some(hit) = self.cache.get::<T>(key, ttl) {
        debug!(key, "Cache hit");
        return Ok(hit);
      }
    }

    {
      let mut state = self.lock();
      state.loading = true;
      state.error = None;
    }

    let result = producer().await;

    let mut state = self.lock();
    state.loading = false;
    match result {
      Ok(data) => {
        if let Some(key) = cache_key {
          self.cache.insert(key, &data);
        }
        Ok(data)
      }
      Err(e) => {
        let message = e.to_string();
        state.error = Some(if message.trim().is_empty() {
          FALLBACK_ERROR.to_string()
        } else {
          message
        });
        Err(e)
      }
    }
  }

  /// Drop one cached entry, or all of them when `key` is `None`.
  pub fn clear_cache(&self, key: Option<&str>) {
    match key {
      Some(key) => self.cache.remove(key),
      None => self.cache.clear(),
    }
  }

  pub fn clear_error(&self) {
    self.lock().error = None;
  }

  pub fn loading(&self) -> bool {
    self.lock().loading
  }

  pub fn error(&self) -> Option<String> {
    self.lock().error.clone()
  }

  #[cfg(test)]
  pub fn state(&self) -> RequestState {
    self.lock().clone()
  }
}
