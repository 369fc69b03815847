//! Cache Module
//!
//! In-memory store for parsed upstream responses with TTL expiration and LRU
//! eviction, plus the key derivation used to address it.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::cache_key;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
