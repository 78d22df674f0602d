use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Duration;
use tracing::trace;

use crate::cache::entry::Expiring;
use crate::observability::metrics::get_metrics;

const HIT: &str = "hit";
const MISS: &str = "miss";

/// Keyed store where every entry carries its own TTL.
///
/// Clones share the same storage.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    name: &'static str,
    inner: Arc<RwLock<HashMap<String, Expiring<V>>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get value if it exists and is not expired
    pub async fn get(&self, key: &str) -> Option<V> {
        let value = {
            let map = self.inner.read().await;
            map.get(key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone())
        };

        let outcome = if value.is_some() { HIT } else { MISS };
        trace!(cache = self.name, key, outcome, "cache lookup");
        get_metrics()
            .await
            .cache_lookups
            .with_label_values(&[self.name, outcome])
            .inc();
        value
    }

    pub async fn set(&self, key: &str, value: V, ttl: Duration) {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), Expiring::new(value, ttl));
    }

    pub async fn delete(&self, key: &str) {
        let mut map = self.inner.write().await;
        map.remove(key);
    }

    /// Number of stored entries, expired ones included until they are replaced.
    pub async fn stored(&self) -> usize {
        self.inner.read().await.len()
    }
}
