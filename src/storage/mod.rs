//! Durable key-value storage for small client settings.
//!
//! Values are stored as JSON text under a string key, one entry per key. The
//! [`Persisted`] cell layers typed access on top and never surfaces storage
//! errors to its callers.

#[cfg(test)]
mod memory;
mod persisted;
mod sqlite;

use color_eyre::Result;

#[cfg(test)]
pub use memory::MemoryStore;
pub use persisted::{Initial, Persisted};
pub use sqlite::SqliteStore;

/// Keys written by the application
pub mod keys {
  pub const DARK_MODE: &str = "darkMode";
  pub const CHAT_MESSAGES: &str = "chatbot-messages";
}

/// Trait for key-value storage backends.
pub trait KeyValueStore: Send + Sync {
  /// Raw stored text for `key`, if any.
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> Result<()>;
}
