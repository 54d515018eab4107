//! Core traits for building cache keys.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Trait for values that identify a cacheable query.
pub trait QueryKey {
  /// Opaque, stable key under which the query result is cached
  fn cache_key(&self) -> String;

  /// Human-readable description for logs
  fn description(&self) -> String;
}

/// SHA256 hex digest of a value's JSON form.
///
/// Equal parameter sets produce equal digests; fixed-length keys keep log lines
/// and map keys short regardless of how many filters are set.
pub fn json_digest<T: Serialize + ?Sized>(value: &T) -> String {
  // Serialization of plain data structs can't fail; an empty input still hashes.
  let input = serde_json::to_vec(value).unwrap_or_default();

  let mut hasher = Sha256::new();
  hasher.update(&input);
  hex::encode(hasher.finalize())
}
