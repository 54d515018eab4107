//! Publish/subscribe cell shared by every consumer of one value.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::service::types::Profile;

/// Channel carrying the signed-in user's profile
pub type ProfileChannel = Broadcast<Profile>;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
  value: Option<T>,
  updated_at: Option<DateTime<Utc>>,
  /// Keyed by registration sequence, so iteration follows subscribe order
  listeners: BTreeMap<u64, Listener<T>>,
  next_id: u64,
}

/// Latest value plus the listeners that want to hear about the next one.
///
/// Clones refer to the same channel. Listeners run synchronously inside
/// [`publish`](Self::publish), in the order they subscribed, without the
/// channel lock held, so a listener may read the channel or drop its own
/// subscription.
pub struct Broadcast<T> {
  shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for Broadcast<T> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<T> Default for Broadcast<T> {
  fn default() -> Self {
    Self {
      shared: Arc::new(Mutex::new(Shared {
        value: None,
        updated_at: None,
        listeners: BTreeMap::new(),
        next_id: 0,
      })),
    }
  }
}

impl<T: Clone + Send + 'static> Broadcast<T> {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, Shared<T>> {
    lock_shared(&self.shared)
  }

  /// Register `listener` for future publishes until the returned
  /// [`Subscription`] is dropped.
  pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
    let mut shared = self.lock();
    let id = shared.next_id;
    shared.next_id += 1;
    shared.listeners.insert(id, Arc::new(listener));

    let registry: Weak<dyn Registry> = Arc::downgrade(&self.shared) as Weak<dyn Registry>;
    Subscription {
      id,
      registry: Some(registry),
    }
  }

  /// Store `value` and hand it to every current listener.
  pub fn publish(&self, value: T) {
    let listeners: Vec<Listener<T>> = {
      let mut shared = self.lock();
      shared.value = Some(value.clone());
      shared.updated_at = Some(Utc::now());
      shared.listeners.values().cloned().collect()
    };

    for listener in listeners {
      listener(&value);
    }
  }

  pub fn current(&self) -> Option<T> {
    self.lock().value.clone()
  }

  pub fn updated_at(&self) -> Option<DateTime<Utc>> {
    self.lock().updated_at
  }

  pub fn listener_count(&self) -> usize {
    self.lock().listeners.len()
  }
}

impl<T> fmt::Debug for Broadcast<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let shared = lock_shared(&self.shared);
    f.debug_struct("Broadcast")
      .field("has_value", &shared.value.is_some())
      .field("updated_at", &shared.updated_at)
      .field("listeners", &shared.listeners.len())
      .finish()
  }
}

fn lock_shared<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
  shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Type-erased listener removal, so [`Subscription`] needn't name `T`
trait Registry: Send + Sync {
  fn remove(&self, id: u64);
}

impl<T: Send> Registry for Mutex<Shared<T>> {
  fn remove(&self, id: u64) {
    lock_shared(self).listeners.remove(&id);
  }
}

/// Handle for one registered listener; dropping it unsubscribes.
pub struct Subscription {
  id: u64,
  registry: Option<Weak<dyn Registry>>,
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
      registry.remove(self.id);
    }
  }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("id", &self.id)
      .field("active", &self.registry.is_some())
      .finish()
  }
}
