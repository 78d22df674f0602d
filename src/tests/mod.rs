pub mod common;
pub mod run_function;
pub mod ttl_cache_expiration;
