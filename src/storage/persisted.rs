//! Typed value mirrored to a key-value store.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

use super::KeyValueStore;

/// Starting value for a [`Persisted`] cell whose stored copy is missing or
/// unreadable.
pub enum Initial<T> {
  Value(T),
  /// Produced on demand, only if the stored copy can't be used
  Lazy(Box<dyn FnOnce() -> T + Send>),
}

impl<T> Initial<T> {
  pub fn lazy(produce: impl FnOnce() -> T + Send + 'static) -> Self {
    Initial::Lazy(Box::new(produce))
  }

  fn materialize(self) -> T {
    match self {
      Initial::Value(value) => value,
      Initial::Lazy(produce) => produce(),
    }
  }
}

/// A value that survives restarts.
///
/// The in-memory copy is authoritative for the session: writes update it
/// first and then persist as JSON under `key`. Failed writes are logged and
/// leave the in-memory value in place.
pub struct Persisted<T> {
  store: Arc<dyn KeyValueStore>,
  key: String,
  value: T,
}

impl<T: Serialize + DeserializeOwned> Persisted<T> {
  /// Read `key` from `store`, falling back to `initial` when the entry is
  /// absent or can't be parsed. Loading never writes.
  pub fn load(
    store: Arc<dyn KeyValueStore>,
    key: impl Into<String>,
    initial: Initial<T>,
  ) -> Self {
    let key = key.into();

    let stored = match store.get(&key) {
      Ok(raw) => raw,
      Err(e) => {
        error!(key = %key, "Error reading from storage: {}", e);
        None
      }
    };

    let value = match stored.map(|raw| serde_json::from_str::<T>(&raw)) {
      Some(Ok(value)) => value,
      Some(Err(e)) => {
        warn!(key = %key, "Discarding unparsable stored value: {}", e);
        initial.materialize()
      }
      None => initial.materialize(),
    };

    Self { store, key, value }
  }

  pub fn get(&self) -> &T {
    &self.value
  }

  /// Replace the value.
  pub fn set(&mut self, value: T) {
    self.value = value;
    self.persist();
  }

  /// Replace the value with one computed from the current value.
  pub fn update(&mut self, next: impl FnOnce(&T) -> T) {
    let value = next(&self.value);
    self.set(value);
  }

  fn persist(&self) {
    let result = serde_json::to_string(&self.value)
      .map_err(color_eyre::Report::from)
      .and_then(|json| self.store.set(&self.key, &json));

    if let Err(e) = result {
      error!(key = %self.key, "Error saving to storage: {}", e);
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Persisted<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Persisted")
      .field("key", &self.key)
      .field("value", &self.value)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;
  use color_eyre::eyre::eyre;
  use serde::Deserialize;
  use std::sync::atomic::{AtomicBool, Ordering};

  /// Store whose writes always fail, like a full quota
  struct FullStore;

  impl KeyValueStore for FullStore {
    fn get(&self, _key: &str) -> color_eyre::Result<Option<String>> {
      Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> color_eyre::Result<()> {
      Err(eyre!("quota exceeded"))
    }
  }

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Settings {
    name: String,
    hobbies: Vec<String>,
    active: bool,
  }

  fn memory() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
  }

  #[test]
  fn test_missing_entry_uses_initial_without_writing() {
    let store = memory();
    let cell: Persisted<String> = Persisted::load(
      store.clone(),
      "test-key",
      Initial::Value("initial".to_string()),
    );

    assert_eq!(cell.get(), "initial");
    assert_eq!(store.get("test-key").unwrap(), None);
  }

  #[test]
  fn test_stored_value_wins_over_initial() {
    let store = memory();
    store.set("test-key", "\"stored value\"").unwrap();

    let cell: Persisted<String> =
      Persisted::load(store, "test-key", Initial::Value("initial".to_string()));
    assert_eq!(cell.get(), "stored value");
  }

  #[test]
  fn test_round_trip_complex_value() {
    let store = memory();
    let settings = Settings {
      name: "John".to_string(),
      hobbies: vec!["reading".to_string(), "coding".to_string()],
      active: true,
    };

    let mut cell: Persisted<Settings> = Persisted::load(
      store.clone(),
      "settings",
      Initial::lazy(|| Settings {
        name: String::new(),
        hobbies: Vec::new(),
        active: false,
      }),
    );
    cell.set(settings.clone());

    let fresh: Persisted<Settings> = Persisted::load(
      store,
      "settings",
      Initial::<Settings>::lazy(|| panic!("stored value should be used")),
    );
    assert_eq!(fresh.get(), &settings);
  }

  #[test]
  fn test_update_uses_latest_value() {
    let store = memory();
    store.set("counter", "5").unwrap();

    let mut cell: Persisted<i64> = Persisted::load(store.clone(), "counter", Initial::Value(0));
    cell.update(|n| n + 1);
    cell.update(|n| n + 1);

    assert_eq!(*cell.get(), 7);
    assert_eq!(store.get("counter").unwrap().as_deref(), Some("7"));
  }

  #[test]
  fn test_corrupt_entry_falls_back_and_is_left_alone() {
    let store = memory();
    store.set("test-key", "{not json").unwrap();

    let cell: Persisted<i64> = Persisted::load(store.clone(), "test-key", Initial::Value(42));

    assert_eq!(*cell.get(), 42);
    assert_eq!(store.get("test-key").unwrap().as_deref(), Some("{not json"));
  }

  #[test]
  fn test_lazy_initial_only_runs_when_needed() {
    let store = memory();
    store.set("flag", "true").unwrap();

    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let cell: Persisted<bool> = Persisted::load(
      store,
      "flag",
      Initial::lazy(move || {
        flag.store(true, Ordering::SeqCst);
        false
      }),
    );

    assert!(*cell.get());
    assert!(!called.load(Ordering::SeqCst));
  }

  #[test]
  fn test_failed_write_keeps_memory_value() {
    let mut cell: Persisted<bool> =
      Persisted::load(Arc::new(FullStore), "darkMode", Initial::Value(false));
    cell.set(true);
    assert!(*cell.get());
  }
}
