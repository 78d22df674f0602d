use tokio::time::{Duration, Instant};

use crate::helpers::time::get_instant;

/// Cached value together with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct Expiring<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> Expiring<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: get_instant() + ttl,
        }
    }

    /// An entry is dead from its expiry instant onwards.
    pub fn is_expired(&self) -> bool {
        get_instant() >= self.expires_at
    }
}
