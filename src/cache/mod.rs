//! In-process TTL caches.
//!
//! Expiry is checked lazily when an entry is read; nothing sweeps in the
//! background, so an expired entry may stay in storage until overwritten or
//! deleted, but it is never returned.

pub mod entry;
pub mod ttl_cache;

pub use entry::Expiring;
pub use ttl_cache::TtlCache;
