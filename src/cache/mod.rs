//! Time-boxed response cache for the request layer.
//!
//! This module provides the in-memory cache behind each request executor:
//! - Entries are stored as JSON under an opaque string key
//! - An entry is fresh while its age is below the caller's TTL
//! - Stale entries are evicted when they are looked up
//! - Keys for domain queries come from the [`QueryKey`] trait

mod layer;
mod traits;

pub use layer::ResponseCache;
pub use traits::{json_digest, QueryKey};
