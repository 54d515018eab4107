//! In-memory response cache with per-lookup TTL.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A cached response and when it was stored.
#[derive(Debug, Clone)]
struct CacheEntry {
  data: serde_json::Value,
  cached_at: Instant,
}

impl CacheEntry {
  fn is_fresh(&self, ttl: Duration) -> bool {
    self.cached_at.elapsed() < ttl
  }
}

/// Response cache owned by a single request executor.
#[derive(Debug, Default)]
pub struct ResponseCache {
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Fresh cached value for `key`.
  ///
  /// Stale entries, and entries that no longer decode as `T`, are removed and
  /// reported as a miss.
  pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
    let mut entries = self.entries();
    let entry = entries.get(key)?;

    if !entry.is_fresh(ttl) {
      debug!(key, "Cache entry expired");
      entries.remove(key);
      return None;
    }

    match serde_json::from_value(entry.data.clone()) {
      Ok(value) => Some(value),
      Err(e) => {
        warn!(key, "Dropping undecodable cache entry: {}", e);
        entries.remove(key);
        None
      }
    }
  }

  /// Store `value` under `key`, stamped with the current time.
  pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
    match serde_json::to_value(value) {
      Ok(data) => {
        self.entries().insert(
          key.to_string(),
          CacheEntry {
            data,
            cached_at: Instant::now(),
          },
        );
      }
      Err(e) => warn!(key, "Response not cached, serialization failed: {}", e),
    }
  }

  pub fn remove(&self, key: &str) {
    self.entries().remove(key);
  }

  pub fn clear(&self) {
    self.entries().clear();
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.entries().len()
  }

  #[cfg(test)]
  pub fn contains(&self, key: &str) -> bool {
    self.entries().contains_key(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TTL: Duration = Duration::from_secs(300);

  #[tokio::test(start_paused = true)]
  async fn test_hit_before_ttl() {
    let cache = ResponseCache::new();
    cache.insert("profile", &vec![1, 2, 3]);

    tokio::time::advance(Duration::from_secs(299)).await;
    assert_eq!(cache.get::<Vec<i32>>("profile", TTL), Some(vec![1, 2, 3]));
  }

  #[tokio::test(start_paused = true)]
  async fn test_expired_entry_is_evicted() {
    let cache = ResponseCache::new();
    cache.insert("profile", &"data");

    tokio::time::advance(TTL).await;
    assert_eq!(cache.get::<String>("profile", TTL), None);
    assert!(!cache.contains("profile"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_zero_ttl_never_hits() {
    let cache = ResponseCache::new();
    cache.insert("k", &1);
    assert_eq!(cache.get::<i32>("k", Duration::ZERO), None);
  }

  #[test]
  fn test_type_mismatch_is_a_miss() {
    let cache = ResponseCache::new();
    cache.insert("k", &"not a number");
    assert_eq!(cache.get::<u32>("k", TTL), None);
    assert_eq!(cache.len(), 0);
  }

  #[test]
  fn test_remove_and_clear() {
    let cache = ResponseCache::new();
    cache.insert("a", &1);
    cache.insert("b", &2);

    cache.remove("a");
    assert!(!cache.contains("a"));
    assert!(cache.contains("b"));

    cache.clear();
    assert_eq!(cache.len(), 0);
  }
}
